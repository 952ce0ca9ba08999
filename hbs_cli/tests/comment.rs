mod common;

use rstest::rstest;

#[rstest]
#[case::wraps("{{> card }}", "{{!-- {{> card }} --}}\n")]
#[case::unwraps("{{!-- {{> card }} --}}", "{{> card }}\n")]
#[case::unwraps_loose("{{!--<p>hi</p>   --}}", "<p>hi</p>\n")]
#[case::too_short("{{!--}}", "{{!-- {{!--}} --}}\n")]
fn comment_toggles_argument(#[case] text: &str, #[case] expected: &str) {
	common::hbs_cmd()
		.arg("comment")
		.arg(text)
		.assert()
		.success()
		.stdout(expected.to_string());
}

#[test]
fn comment_reads_stdin() {
	common::hbs_cmd()
		.arg("comment")
		.write_stdin("<p>hi</p>\n")
		.assert()
		.success()
		.stdout("{{!-- <p>hi</p> --}}\n");
}
