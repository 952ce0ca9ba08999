use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn hbs_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("hbs"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

#[allow(dead_code)]
pub fn write_file(path: &std::path::Path, content: &str) -> std::io::Result<()> {
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)
}
