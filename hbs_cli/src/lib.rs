use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Find, resolve, and extract handlebars partials.",
	long_about = "hbs highlights handlebars partial references such as `{{> card title='Hi' }}`, \
	              resolves partial names to files under the partials directory, and extracts \
	              markup into new partials.\n\nQuick start:\n  hbs scan index.html    List \
	              partials, bindings and delimiters\n  hbs resolve _header    Print the path of \
	              a partial\n  hbs new _footer        Create a partial from stdin\n  hbs lsp          \
	              Run the language server"
)]
pub struct HbsCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory. Relative file arguments are
	/// resolved against it.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Scan a template and print its decorations.
	///
	/// Lists every partial name, `{{`/`}}` delimiter, `name=value` binding and
	/// binding value found in the file, grouped by category, with one-based
	/// `line:column` ranges.
	Scan {
		/// The template file to scan.
		file: PathBuf,

		/// Output format. Use `text` for human-readable output or `json` for
		/// the decoration buckets as an editor would receive them.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,

		/// Watch the file and rescan whenever it changes.
		#[arg(long, default_value_t = false)]
		watch: bool,
	},
	/// Print the path of the partial file with the given name.
	///
	/// Looks for `<name>.html` in the partials directory, then depth-first in
	/// its subdirectories. Exits with status 1 when no file matches.
	Resolve {
		/// The partial name, e.g. `_header`.
		name: String,
	},
	/// Create a new partial file.
	///
	/// Writes `<partials dir>/<name>.html` and prints the directive that
	/// references it. The content is read from `--from` or from stdin.
	New {
		/// The partial name, e.g. `_footer`.
		name: String,

		/// Read the partial content from this file instead of stdin.
		#[arg(long)]
		from: Option<PathBuf>,
	},
	/// Toggle `{{!-- ... --}}` comment wrapping.
	///
	/// Unwraps the text when it is already a comment and wraps it otherwise.
	/// Reads stdin when no text is given.
	Comment {
		/// The text to toggle.
		text: Option<String>,
	},
	/// Start the hbs language server (LSP).
	///
	/// Communicates over stdin/stdout using the Language Server Protocol.
	/// Configure your editor to run `hbs lsp` for handlebars and html files.
	///
	/// Sends `handlebars/decorations` notifications for open documents and
	/// provides go-to-definition, document links and hovers for partials.
	Lsp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output with the file path and the four decoration buckets.
	Json,
}
