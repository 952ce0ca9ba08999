use std::path::Path;

use rstest::rstest;
use similar_asserts::assert_eq;
use tracing_test::traced_test;

use super::*;
use crate::comment;
use crate::patterns::Span;
use crate::patterns::TokenFamily;
use crate::patterns::find_all;
use crate::patterns::is_partial_name;

fn partial(name: &str, has_arguments: bool, start: usize, end: usize) -> Token {
	Token {
		kind: TokenKind::PartialReference {
			name: name.to_string(),
			has_arguments,
		},
		span: Span::new(start, end),
	}
}

fn variable(name: &str, start: usize, end: usize) -> Token {
	Token {
		kind: TokenKind::Variable {
			name: name.to_string(),
		},
		span: Span::new(start, end),
	}
}

fn value(literal: &str, start: usize, end: usize) -> Token {
	Token {
		kind: TokenKind::Value {
			literal: literal.to_string(),
		},
		span: Span::new(start, end),
	}
}

fn brace(kind: BraceKind, start: usize, end: usize) -> Token {
	Token {
		kind: TokenKind::Brace { kind },
		span: Span::new(start, end),
	}
}

fn write_file(path: &Path, content: &str) {
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create_dir_all: {e}"));
	}
	std::fs::write(path, content).unwrap_or_else(|e| panic!("write: {e}"));
}

// ---- Pattern matcher ----

#[test]
fn partial_reference_captures_name_and_remainder() {
	let text = "<p>{{> card title='Hello' }}</p>";
	let matches: Vec<_> = find_all(text, TokenFamily::PartialReference).collect();

	assert_eq!(matches.len(), 1);
	let reference = &matches[0];
	assert_eq!(reference.span, Span::new(3, 28));
	assert_eq!(reference.text, "{{> card title='Hello' }}");
	assert_eq!(reference.group(1).map(|group| group.text), Some("card"));
	assert_eq!(
		reference.group(2).map(|group| group.text),
		Some(" title='Hello' ")
	);
	assert_eq!(reference.group(2).map(|group| group.span), Some(Span::new(11, 26)));
}

#[test]
fn partial_references_are_found_left_to_right() {
	let text = "{{> a }}{{>b-c}}\n{{> $d_1 x=1}}";
	let names: Vec<_> = find_all(text, TokenFamily::PartialReference)
		.filter_map(|reference| reference.group(1).map(|group| group.text))
		.collect();

	assert_eq!(names, vec!["a", "b-c", "$d_1"]);
}

#[rstest]
#[case::no_name("{{> }}")]
#[case::digit_start("{{> 1abc }}")]
#[case::unclosed("{{> card title='x'")]
#[case::brace_inside("{{> card {x} }}")]
#[case::comment("{{!-- card --}}")]
fn partial_reference_rejects_malformed_input(#[case] text: &str) {
	assert_eq!(find_all(text, TokenFamily::PartialReference).count(), 0);
}

#[test]
fn binding_captures_each_literal_kind() {
	let text = r#"count=3 title='Hello' alt = "A b""#;
	let matches: Vec<_> = find_all(text, TokenFamily::Binding).collect();

	assert_eq!(matches.len(), 3);
	assert_eq!(matches[0].group(2).map(|group| group.text), Some("3"));
	assert_eq!(matches[1].group(3).map(|group| group.text), Some("Hello"));
	assert_eq!(matches[2].group(4).map(|group| group.text), Some("A b"));
	assert_eq!(matches[2].group(2), None);
	assert_eq!(matches[2].text, r#"alt = "A b""#);
}

#[test]
fn binding_uses_ascii_word_boundary() {
	let tokens = classify("{{> card éx=1 }}");
	let bindings: Vec<_> = tokens
		.into_iter()
		.filter(|token| {
			matches!(
				token.kind,
				TokenKind::Variable { .. } | TokenKind::Value { .. }
			)
		})
		.collect();

	assert_eq!(bindings, vec![variable("x", 11, 14), value("1", 13, 14)]);
}

#[test]
fn binding_requires_non_empty_quoted_value() {
	assert_eq!(find_all("title=''", TokenFamily::Binding).count(), 0);
	assert_eq!(find_all(r#"title="""#, TokenFamily::Binding).count(), 0);
}

#[rstest]
#[case::pair("{{}}", vec![Span::new(0, 2), Span::new(2, 4)])]
#[case::triple_open("{{{x}}}", vec![Span::new(0, 2), Span::new(4, 6)])]
#[case::single_braces("{ a } {b}", vec![])]
#[case::unicode("é{{ü}}", vec![Span::new(2, 4), Span::new(6, 8)])]
fn delimiters_are_matched_independently(#[case] text: &str, #[case] expected: Vec<Span>) {
	let spans: Vec<_> = find_all(text, TokenFamily::Delimiter)
		.map(|delimiter| delimiter.span)
		.collect();
	assert_eq!(spans, expected);
}

#[test]
fn shifted_match_moves_every_group() {
	let binding = find_all("a=1", TokenFamily::Binding)
		.next()
		.unwrap_or_else(|| panic!("expected a binding"))
		.shift(10);

	assert_eq!(binding.span, Span::new(10, 13));
	assert_eq!(binding.group(1).map(|group| group.span), Some(Span::new(10, 11)));
	assert_eq!(binding.group(2).map(|group| group.span), Some(Span::new(12, 13)));
}

#[rstest]
#[case("_header", true)]
#[case("banner-detail-page", true)]
#[case("$item", true)]
#[case("a-1", false)]
#[case("-a", false)]
#[case("a-", false)]
#[case("../etc", false)]
#[case("", false)]
fn validates_partial_names(#[case] name: &str, #[case] expected: bool) {
	assert_eq!(is_partial_name(name), expected);
}

// ---- Classifier ----

#[test]
fn classify_reference_without_arguments() {
	let tokens = classify("{{> _header }}");

	assert_eq!(
		tokens,
		vec![
			partial("_header", false, 3, 11),
			brace(BraceKind::Open, 0, 2),
			brace(BraceKind::Close, 12, 14),
		]
	);
}

#[test]
fn classify_reference_with_bindings() {
	let tokens = classify("{{> card title='Hello' count=3 }}");

	assert_eq!(
		tokens,
		vec![
			partial("card", true, 3, 8),
			variable("title", 9, 22),
			value("Hello", 15, 22),
			variable("count", 23, 30),
			value("3", 29, 30),
			brace(BraceKind::Open, 0, 2),
			brace(BraceKind::Close, 31, 33),
		]
	);
}

#[test]
fn value_span_includes_whitespace_after_equals() {
	let text = r#"{{> card title = "x" }}"#;
	let tokens = classify(text);

	assert_eq!(tokens[1], variable("title", 9, 20));
	assert_eq!(tokens[2], value("x", 16, 20));
	assert_eq!(&text[16..20], r#" "x""#);
}

#[rstest]
#[case::exact("{{>_header}}", NameSpanPolicy::ExactName, Span::new(3, 10))]
#[case::separator("{{>  _header}}", NameSpanPolicy::ThroughSeparator, Span::new(3, 12))]
#[case::trailing("{{>_header   x=1 }}", NameSpanPolicy::ExactName, Span::new(3, 10))]
fn name_span_stops_at_name_boundary(
	#[case] text: &str,
	#[case] policy: NameSpanPolicy,
	#[case] expected: Span,
) {
	let reference = find_all(text, TokenFamily::PartialReference)
		.next()
		.unwrap_or_else(|| panic!("expected a reference in {text:?}"));
	let name = reference
		.group(1)
		.unwrap_or_else(|| panic!("expected a name"));

	assert_eq!(
		NameSpanPolicy::for_name_offset(name.span.start - reference.span.start),
		policy
	);
	assert_eq!(classify(text)[0].span, expected);
	assert!(text[expected.start..expected.end].ends_with("_header"));
}

#[test]
fn braces_only_produce_brace_tokens() {
	let tokens = classify("{{ }} {{}} {{> }}");

	assert!(
		tokens
			.iter()
			.all(|token| matches!(token.kind, TokenKind::Brace { .. }))
	);
	assert_eq!(tokens.len(), 6);
}

#[test]
fn bindings_outside_references_are_ignored() {
	let tokens = classify(r#"<img alt="x"> {{ title='y' }}"#);

	assert!(
		tokens
			.iter()
			.all(|token| matches!(token.kind, TokenKind::Brace { .. }))
	);
}

#[test]
fn nested_search_does_not_disturb_outer_search() {
	let text = "{{> a x=1 y=2 }}{{> b z='3' }}{{> c }}";
	let names: Vec<_> = classify(text)
		.into_iter()
		.filter_map(|token| {
			match token.kind {
				TokenKind::PartialReference { name, .. } => Some(name),
				_ => None,
			}
		})
		.collect();

	assert_eq!(names, vec!["a", "b", "c"]);
}

#[rstest]
#[case::inside_name("{{> card x=1 }}", 6, Some("card"))]
#[case::inside_arguments("{{> card x=1 }}", 10, Some("card"))]
#[case::on_marker("{{> card x=1 }}", 0, Some("card"))]
#[case::bare_word("see _footer here", 7, Some("_footer"))]
#[case::hyphenated_word("use banner-top now", 8, Some("banner-top"))]
#[case::whitespace("a  b", 2, None)]
#[case::past_end("abc", 10, None)]
fn finds_partial_name_at_offset(
	#[case] text: &str,
	#[case] offset: usize,
	#[case] expected: Option<&str>,
) {
	assert_eq!(partial_name_at(text, offset).as_deref(), expected);
}

// ---- Line table ----

#[test]
fn line_table_handles_mixed_line_endings() {
	let table = LineTable::new("a\r\nb\rc\nd");

	assert_eq!(table.line_count(), 4);
	assert_eq!(table.point_at(0), Point::new(0, 0));
	assert_eq!(table.point_at(3), Point::new(1, 0));
	assert_eq!(table.point_at(5), Point::new(2, 0));
	assert_eq!(table.point_at(8), Point::new(3, 1));
	assert_eq!(table.line_span(0), Some(Span::new(0, 1)));
	assert_eq!(table.line_span(1), Some(Span::new(3, 4)));
	assert_eq!(table.line_span(3), Some(Span::new(7, 8)));
	assert_eq!(table.line_span(4), None);
}

#[test]
fn line_table_counts_utf16_code_units() {
	let text = "é😀x";
	let table = LineTable::new(text);

	assert_eq!(table.point_at(2), Point::new(0, 1));
	assert_eq!(table.point_at(6), Point::new(0, 3));
	assert_eq!(table.point_at(7), Point::new(0, 4));
	assert_eq!(table.offset_at(Point::new(0, 3)), Some(6));
	assert_eq!(table.offset_at(Point::new(0, 4)), Some(7));
	assert_eq!(table.offset_at(Point::new(0, 2)), Some(6));
	assert_eq!(table.offset_at(Point::new(0, 5)), Some(7));
}

#[test]
fn line_table_clamps_characters_past_line_end() {
	let table = LineTable::new("ab\r\ncd\nef");

	assert_eq!(table.offset_at(Point::new(0, 40)), Some(2));
	assert_eq!(table.offset_at(Point::new(1, 3)), Some(6));
	assert_eq!(table.offset_at(Point::new(2, 9)), Some(9));
	assert_eq!(
		table.span_of(Range::new(Point::new(0, 1), Point::new(0, 99))),
		Some(Span::new(1, 2))
	);
}

#[test]
fn line_table_clamps_out_of_range_offsets() {
	let table = LineTable::new("ab\ncd");

	assert_eq!(table.point_at(100), Point::new(1, 2));
	assert_eq!(table.offset_at(Point::new(5, 0)), None);
}

#[test]
fn line_table_round_trips_ranges() {
	let text = "<div>\n  {{> nav }}\n</div>";
	let table = LineTable::new(text);
	let span = Span::new(12, 15);
	let range = table.range_of(span);

	assert_eq!(range, Range::new(Point::new(1, 6), Point::new(1, 9)));
	assert_eq!(table.span_of(range), Some(span));
}

// ---- Decorations ----

#[test]
fn scan_fills_buckets_with_metadata() {
	let decorations = scan("{{> card title='Hello' count=3 }}", &Styles::default());

	assert_eq!(decorations.partial.len(), 1);
	assert_eq!(decorations.variable.len(), 2);
	assert_eq!(decorations.value.len(), 2);
	assert_eq!(decorations.brace.len(), 2);

	let name = &decorations.partial[0];
	assert_eq!(name.hover.as_deref(), Some("Click to open `card.html`"));
	assert_eq!(
		name.action,
		Some(Action::OpenPartial {
			name: "card".to_string()
		})
	);
	assert_eq!(decorations.variable[0].hover.as_deref(), Some("Variable: `title`"));
	assert!(decorations.value.iter().all(|d| d.hover.is_none() && d.action.is_none()));
	assert!(decorations.brace.iter().all(|d| d.hover.is_none() && d.action.is_none()));
}

#[test]
fn scan_projects_ranges_onto_lines() {
	let decorations = scan("<ul>\n  {{> item label=\"a\" }}\n</ul>\n", &Styles::default());

	assert_eq!(
		decorations.partial[0].range,
		Range::new(Point::new(1, 5), Point::new(1, 10))
	);
	assert_eq!(
		decorations.value[0].range,
		Range::new(Point::new(1, 17), Point::new(1, 20))
	);
}

#[test]
fn scan_tags_buckets_with_configured_colors() {
	let styles = Styles {
		partial: "#111".to_string(),
		..Styles::default()
	};
	let decorations = scan("{{> a }}", &styles);

	assert_eq!(decorations.partial.category, Category::Partial);
	assert_eq!(decorations.partial.color, "#111");
	assert_eq!(decorations.brace.color, "#43a9e8");
	assert_eq!(
		decorations
			.buckets()
			.map(|bucket| bucket.category),
		Category::ALL
	);
}

#[test]
fn scan_of_braces_only_fills_brace_bucket() {
	let decorations = scan("{{ }}\n{{}}", &Styles::default());

	assert_eq!(decorations.brace.len(), 4);
	assert!(decorations.partial.is_empty());
	assert!(decorations.variable.is_empty());
	assert!(decorations.value.is_empty());
}

#[rstest]
#[case("")]
#[case("plain text without directives")]
#[case("{{> _header }}")]
#[case("{{> card title='Hello' count=3 }}\r\n{{> footer year=2024 }}")]
#[case("{{{> broken x='1' }}}} {{> a b=1 c=\"2\" d='3' }} }} {{")]
#[case("😀 {{> emoji-card label='ü' }} 😀")]
fn scan_ranges_stay_in_bounds_and_never_overlap(#[case] text: &str) {
	let decorations = scan(text, &Styles::default());

	for bucket in decorations.buckets() {
		for decoration in bucket.iter() {
			assert!(decoration.span.start <= decoration.span.end);
			assert!(decoration.span.end <= text.len());
		}

		for pair in bucket.windows(2) {
			assert!(
				!pair[0].span.overlaps(&pair[1].span),
				"overlap in {} bucket: {:?}",
				bucket.category,
				pair
			);
		}
	}
}

#[test]
fn scan_is_idempotent() {
	let text = "{{> card title='Hello' }}\n{{> _footer }}";
	let styles = Styles::default();

	assert_eq!(scan(text, &styles), scan(text, &styles));
}

#[test]
fn decorations_serialize_without_empty_metadata() {
	let decorations = scan("{{> a }}", &Styles::default());
	let json = serde_json::to_value(&decorations.brace)
		.unwrap_or_else(|e| panic!("serialize: {e}"));

	assert_eq!(json["category"], serde_json::json!("brace"));
	assert!(json["decorations"][0].get("hover").is_none());
	assert!(json["decorations"][0].get("action").is_none());

	let json = serde_json::to_value(&decorations.partial)
		.unwrap_or_else(|e| panic!("serialize: {e}"));
	assert_eq!(json["decorations"][0]["action"]["kind"], serde_json::json!("openPartial"));
	assert_eq!(json["decorations"][0]["action"]["name"], serde_json::json!("a"));
}

#[test]
fn partial_hover_text_names_the_file() {
	insta::assert_snapshot!(partial_hover_text("_header"), @"Click to open `_header.html`");
}

#[rstest]
#[case("#42c684", Some((0x42, 0xc6, 0x84)))]
#[case("#fa0", Some((0xff, 0xaa, 0x00)))]
#[case("42c684", None)]
#[case("#12345", None)]
#[case("#ggg", None)]
fn parses_hex_colors(#[case] input: &str, #[case] expected: Option<(u8, u8, u8)>) {
	assert_eq!(parse_hex_color(input), expected);
}

// ---- Resolver ----

#[test]
fn resolve_finds_nested_partial() {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	write_file(&tmp.path().join("a/b/_footer.html"), "<footer></footer>");

	assert_eq!(
		resolve(tmp.path(), "_footer"),
		Some(tmp.path().join("a/b/_footer.html"))
	);
}

#[test]
fn resolve_prefers_the_root_directory() {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	write_file(&tmp.path().join("a/_card.html"), "nested");
	write_file(&tmp.path().join("_card.html"), "root");

	assert_eq!(
		resolve(tmp.path(), "_card"),
		Some(tmp.path().join("_card.html"))
	);
}

#[test]
fn resolve_searches_subdirectories_in_name_order() {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	write_file(&tmp.path().join("b/_card.html"), "b");
	write_file(&tmp.path().join("a/deep/_card.html"), "a");

	assert_eq!(
		resolve(tmp.path(), "_card"),
		Some(tmp.path().join("a/deep/_card.html"))
	);
}

#[traced_test]
#[test]
fn resolve_missing_partial_returns_none() {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	write_file(&tmp.path().join("a/_other.html"), "other");

	assert_eq!(resolve(tmp.path(), "_missing"), None);
	assert!(logs_contain("partial not found"));
}

#[test]
fn resolve_ignores_directories_named_like_partials() {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	std::fs::create_dir_all(tmp.path().join("_card.html"))
		.unwrap_or_else(|e| panic!("create_dir_all: {e}"));

	assert_eq!(resolve(tmp.path(), "_card"), None);
}

#[test]
fn resolve_with_missing_root_returns_none() {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));

	assert_eq!(resolve(&tmp.path().join("nope"), "_header"), None);
}

#[test]
fn resolve_rejects_names_that_escape_the_root() {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	write_file(&tmp.path().join("secret.html"), "secret");
	let root = tmp.path().join("partials");
	std::fs::create_dir_all(&root).unwrap_or_else(|e| panic!("create_dir_all: {e}"));

	assert_eq!(resolve(&root, "../secret"), None);
}

#[test]
fn resolve_respects_max_depth() {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	write_file(&tmp.path().join("a/b/c/_deep.html"), "deep");

	let shallow = PartialResolver::new(tmp.path()).with_max_depth(2);
	assert_eq!(shallow.resolve("_deep"), None);

	let deep = PartialResolver::new(tmp.path()).with_max_depth(3);
	assert_eq!(
		deep.resolve("_deep"),
		Some(tmp.path().join("a/b/c/_deep.html"))
	);
}

#[test]
fn resolve_sees_partials_created_after_a_miss() {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	let resolver = PartialResolver::new(tmp.path());

	assert_eq!(resolver.resolve("_late"), None);
	write_file(&tmp.path().join("x/_late.html"), "late");
	assert_eq!(resolver.resolve("_late"), Some(tmp.path().join("x/_late.html")));
}

#[cfg(unix)]
#[test]
fn resolve_terminates_on_symlink_loops() {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	let root = tmp.path().join("partials");
	std::fs::create_dir_all(root.join("a")).unwrap_or_else(|e| panic!("create_dir_all: {e}"));
	std::os::unix::fs::symlink(&root, root.join("a/loop"))
		.unwrap_or_else(|e| panic!("symlink: {e}"));

	assert_eq!(resolve(&root, "_missing"), None);
}

#[cfg(unix)]
#[test]
fn resolve_follows_directory_symlinks() {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	let shared = tmp.path().join("shared");
	write_file(&shared.join("_shared.html"), "shared");
	let root = tmp.path().join("partials");
	std::fs::create_dir_all(&root).unwrap_or_else(|e| panic!("create_dir_all: {e}"));
	std::os::unix::fs::symlink(&shared, root.join("linked"))
		.unwrap_or_else(|e| panic!("symlink: {e}"));

	assert_eq!(
		resolve(&root, "_shared"),
		Some(root.join("linked/_shared.html"))
	);
}

// ---- Comments ----

#[rstest]
#[case("<p>hi</p>", "{{!-- <p>hi</p> --}}")]
#[case("{{!-- <p>hi</p> --}}", "<p>hi</p>")]
#[case("{{!--   spaced   --}}", "spaced")]
#[case("{{!--}}", "{{!-- {{!--}} --}}")]
fn toggles_comments(#[case] input: &str, #[case] expected: &str) {
	assert_eq!(comment::toggle(input), expected);
}

#[rstest]
#[case("plain")]
#[case("  padded  ")]
#[case("")]
#[case("{{> card }}")]
fn unwrap_of_wrap_is_trimmed_input(#[case] input: &str) {
	assert_eq!(comment::unwrap(&comment::wrap(input)), input.trim());
}

#[rstest]
#[case("{{!-- x --}}")]
#[case("{{!-- {{> card title='a' }} --}}")]
fn wrap_of_unwrap_is_identity(#[case] input: &str) {
	assert_eq!(comment::wrap(&comment::unwrap(input)), input);
}

#[test]
fn unwrap_leaves_plain_text_alone() {
	assert_eq!(comment::unwrap("  not wrapped "), "  not wrapped ");
	assert!(!comment::is_wrapped("{{!--}}"));
	assert!(comment::is_wrapped("{{!----}}"));
}

// ---- Partial creation ----

#[test]
fn create_partial_writes_file_and_returns_reference() -> HbsResult<()> {
	let tmp = tempfile::tempdir()?;
	let partials_dir = tmp.path().join("src/partials");
	let created = create_partial(&partials_dir, " _header ", "<header></header>")?;

	assert_eq!(created.name, "_header");
	assert_eq!(created.reference, "{{> _header }}");
	assert_eq!(created.path, partials_dir.join("_header.html"));
	assert_eq!(std::fs::read_to_string(&created.path)?, "<header></header>");
	assert_eq!(resolve(&partials_dir, "_header"), Some(created.path));

	Ok(())
}

#[test]
fn create_partial_rejects_duplicates_without_writing() -> HbsResult<()> {
	let tmp = tempfile::tempdir()?;
	let existing = tmp.path().join("_header.html");
	std::fs::write(&existing, "original")?;

	let result = create_partial(tmp.path(), "_header", "replacement");
	assert!(matches!(result, Err(HbsError::DuplicatePartial { ref name, .. }) if name == "_header"));
	assert_eq!(std::fs::read_to_string(&existing)?, "original");

	Ok(())
}

#[rstest]
#[case::empty_selection("_header", "  \n", "EmptySelection")]
#[case::empty_name("  ", "<p></p>", "EmptyPartialName")]
#[case::invalid_name("../escape", "<p></p>", "InvalidPartialName")]
fn create_partial_validates_before_touching_disk(
	#[case] name: &str,
	#[case] content: &str,
	#[case] expected: &str,
) {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	let partials_dir = tmp.path().join("src/partials");
	let error = create_partial(&partials_dir, name, content)
		.err()
		.unwrap_or_else(|| panic!("expected an error"));

	assert!(format!("{error:?}").starts_with(expected), "{error:?}");
	assert!(!partials_dir.exists());
}

// ---- Config ----

#[test]
fn config_defaults_without_file() -> HbsResult<()> {
	let tmp = tempfile::tempdir()?;
	let config = HbsConfig::load_or_default(tmp.path())?;

	assert_eq!(config, HbsConfig::default());
	assert_eq!(config.partials_dir(tmp.path()), tmp.path().join("src/partials"));
	assert_eq!(config.resolver(tmp.path()).root(), tmp.path().join("src/partials"));

	Ok(())
}

#[test]
fn config_parses_partial_overrides() -> HbsResult<()> {
	let config = HbsConfig::parse(
		"[partials]\ndir = \"views/partials\"\n\n[styles]\nvalue = \"#abc\"\n",
	)?;

	assert_eq!(config.partials.dir, Path::new("views/partials"));
	assert_eq!(config.partials.max_depth, DEFAULT_MAX_DEPTH);
	assert_eq!(config.styles.value, "#abc");
	assert_eq!(config.styles.partial, Styles::default().partial);

	Ok(())
}

#[test]
fn config_is_discovered_in_dot_config() -> HbsResult<()> {
	let tmp = tempfile::tempdir()?;
	write_file(
		&tmp.path().join(".config/hbs.toml"),
		"[partials]\nmax_depth = 4\n",
	);

	let config = HbsConfig::load(tmp.path())?.unwrap_or_else(|| panic!("expected config"));
	assert_eq!(config.partials.max_depth, 4);

	Ok(())
}

#[test]
fn config_rejects_invalid_colors() {
	let result = HbsConfig::parse("[styles]\nbrace = \"blue\"\n");

	assert!(matches!(
		result,
		Err(HbsError::InvalidColor { ref category, ref value }) if category == "brace" && value == "blue"
	));
}

#[test]
fn config_rejects_invalid_toml() {
	assert!(matches!(
		HbsConfig::parse("[partials\n"),
		Err(HbsError::ConfigParse(_))
	));
}
