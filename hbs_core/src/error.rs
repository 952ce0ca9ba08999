use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum HbsError {
	#[error(transparent)]
	#[diagnostic(code(hbs::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(hbs::config_parse),
		help("check that hbs.toml is valid TOML with [partials] and/or [styles] sections")
	)]
	ConfigParse(String),

	#[error("invalid color `{value}` for the `{category}` style")]
	#[diagnostic(
		code(hbs::invalid_color),
		help("use a hex color such as `#42c684` or `#fa0`")
	)]
	InvalidColor { category: String, value: String },

	#[error("no text selected to convert into a partial")]
	#[diagnostic(
		code(hbs::empty_selection),
		help("select the markup that should move into the new partial")
	)]
	EmptySelection,

	#[error("partial name cannot be empty")]
	#[diagnostic(code(hbs::empty_partial_name), help("use a name such as `_header`"))]
	EmptyPartialName,

	#[error("invalid partial name: `{0}`")]
	#[diagnostic(
		code(hbs::invalid_partial_name),
		help(
			"partial names start with a letter, `_` or `$`, followed by letters, digits, `_`, \
			 `$`, with optional `-` separated segments"
		)
	)]
	InvalidPartialName(String),

	#[error("a partial with the name `{name}` already exists: `{path}`")]
	#[diagnostic(
		code(hbs::duplicate_partial),
		help("choose a different name or edit the existing partial")
	)]
	DuplicatePartial { name: String, path: String },

	#[error("no workspace folder found")]
	#[diagnostic(
		code(hbs::missing_workspace),
		help("open a folder, or pass `--path` to point at the project root")
	)]
	MissingWorkspace,
}

pub type HbsResult<T> = Result<T, HbsError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
