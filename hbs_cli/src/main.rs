use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use hbs_cli::Commands;
use hbs_cli::HbsCli;
use hbs_cli::OutputFormat;
use hbs_core::AnyEmptyResult;
use hbs_core::DecorationBucket;
use hbs_core::Decorations;
use hbs_core::HbsConfig;
use hbs_core::Point;
use hbs_core::comment;
use hbs_core::create_partial;
use hbs_core::parse_hex_color;
use hbs_core::partial_file_name;
use hbs_core::scan;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,dimmed) => {
		if color_enabled() {
			format!("{}", $text.dimmed())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = HbsCli::parse();

	// Respect NO_COLOR env var, --no-color flag, and terminals without color.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	// The language server installs its own plain stderr subscriber.
	if !matches!(args.command, Some(Commands::Lsp)) {
		init_tracing(args.verbose);
	}

	let result = match &args.command {
		Some(Commands::Scan {
			file,
			format,
			watch,
		}) => run_scan(&args, file, *format, *watch),
		Some(Commands::Resolve { name }) => run_resolve(&args, name),
		Some(Commands::New { name, from }) => run_new(&args, name, from.as_deref()),
		Some(Commands::Comment { text }) => run_comment(text.as_deref()),
		Some(Commands::Lsp) => run_lsp(),
		None => {
			eprintln!("No subcommand specified. Run `hbs --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<hbs_core::HbsError>() {
			Ok(hbs_err) => {
				let report: miette::Report = (*hbs_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn init_tracing(verbose: bool) {
	let default_directives = if verbose {
		"hbs=debug,hbs_core=debug"
	} else {
		"warn"
	};
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(default_directives));

	let _ = tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(filter)
		.with_ansi(color_enabled())
		.with_target(false)
		.try_init();
}

fn resolve_root(args: &HbsCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn run_scan(args: &HbsCli, file: &Path, format: OutputFormat, watch: bool) -> AnyEmptyResult {
	let root = resolve_root(args);
	let config = HbsConfig::load_or_default(&root)?;
	let path = root.join(file);

	scan_once(&path, &root, &config, format)?;

	if !watch {
		return Ok(());
	}

	println!("\nWatching for file changes... (press Ctrl+C to stop)");

	// Watch the parent directory so editors that save by renaming a temporary
	// file are still noticed.
	let watched_dir = path
		.parent()
		.filter(|parent| !parent.as_os_str().is_empty())
		.map_or_else(|| root.clone(), Path::to_path_buf);
	let file_name = path.file_name().map(std::ffi::OsStr::to_os_string);
	let (tx, rx) = mpsc::channel();

	let mut watcher =
		notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
			if let Ok(event) = res {
				let is_target = event
					.paths
					.iter()
					.any(|changed| changed.file_name() == file_name.as_deref());
				if is_target
					&& matches!(
						event.kind,
						notify::EventKind::Modify(_) | notify::EventKind::Create(_)
					) {
					let _ = tx.send(());
				}
			}
		})?;

	use notify::Watcher;
	watcher.watch(&watched_dir, notify::RecursiveMode::NonRecursive)?;

	loop {
		rx.recv()?;
		// Debounce: drain additional events within 200ms.
		while rx.recv_timeout(Duration::from_millis(200)).is_ok() {}

		println!("\nFile change detected, rescanning...");
		if let Err(e) = scan_once(&path, &root, &config, format) {
			eprintln!("{} {e}", colored!("error:", red));
		}
	}
}

#[derive(Serialize)]
struct ScanReport<'a> {
	file: String,
	buckets: [&'a DecorationBucket; 4],
}

fn scan_once(path: &Path, root: &Path, config: &HbsConfig, format: OutputFormat) -> AnyEmptyResult {
	let content = std::fs::read_to_string(path)?;
	let decorations = scan(&content, &config.styles);
	let file = make_relative(path, root);
	tracing::debug!(file, tokens = decorations.len(), "scanned template");

	match format {
		OutputFormat::Json => {
			let report = ScanReport {
				file,
				buckets: decorations.buckets(),
			};
			println!("{}", serde_json::to_string_pretty(&report)?);
		}
		OutputFormat::Text => print_decorations(&file, &content, &decorations),
	}

	Ok(())
}

fn print_decorations(file: &str, content: &str, decorations: &Decorations) {
	println!("{}", colored!(file, bold));

	if decorations.is_empty() {
		println!("  No partials or delimiters found.");
		return;
	}

	for bucket in decorations.buckets() {
		let label = paint(&format!("{:<8}", bucket.category.as_str()), &bucket.color);
		for decoration in bucket.iter() {
			let range = format!(
				"{}-{}",
				display_point(decoration.range.start),
				display_point(decoration.range.end)
			);
			let snippet = content
				.get(decoration.span.start..decoration.span.end)
				.unwrap_or_default();
			let mut line = format!("  {label} {range:<11} {snippet:?}");
			if let Some(hover) = &decoration.hover {
				line.push_str(&format!("  {}", colored!(hover, dimmed)));
			}
			println!("{line}");
		}
	}

	println!(
		"{} partial(s), {} brace(s), {} variable(s), {} value(s)",
		decorations.partial.len(),
		decorations.brace.len(),
		decorations.variable.len(),
		decorations.value.len()
	);
}

/// One-based `line:column` for display.
fn display_point(point: Point) -> String {
	format!("{}:{}", point.line + 1, point.character + 1)
}

/// Color `text` with a `#rgb`/`#rrggbb` style color when color is enabled.
fn paint(text: &str, color: &str) -> String {
	match parse_hex_color(color) {
		Some((r, g, b)) if color_enabled() => format!("{}", text.truecolor(r, g, b)),
		_ => text.to_string(),
	}
}

fn run_resolve(args: &HbsCli, name: &str) -> AnyEmptyResult {
	let root = resolve_root(args);
	let config = HbsConfig::load_or_default(&root)?;
	let resolver = config.resolver(&root);
	tracing::debug!(name, dir = %resolver.root().display(), "resolving partial");

	let Some(path) = resolver.resolve(name) else {
		eprintln!(
			"{} `{}` not found under {}",
			colored!("missing:", yellow),
			partial_file_name(name),
			make_relative(resolver.root(), &root)
		);
		process::exit(1);
	};

	println!("{}", path.display());
	Ok(())
}

fn run_new(args: &HbsCli, name: &str, from: Option<&Path>) -> AnyEmptyResult {
	let root = resolve_root(args);
	let config = HbsConfig::load_or_default(&root)?;
	let content = match from {
		Some(file) => std::fs::read_to_string(root.join(file))?,
		None => std::io::read_to_string(std::io::stdin())?,
	};

	let partials_dir = config.partials_dir(&root);
	tracing::debug!(
		name,
		dir = %partials_dir.display(),
		bytes = content.len(),
		"creating partial"
	);
	let created = create_partial(&partials_dir, name, &content)?;

	println!(
		"{} {}",
		colored!("Created partial:", green),
		make_relative(&created.path, &root)
	);
	println!("Reference it with: {}", created.reference);

	Ok(())
}

fn run_comment(text: Option<&str>) -> AnyEmptyResult {
	let text = match text {
		Some(text) => text.to_string(),
		None => std::io::read_to_string(std::io::stdin())?,
	};

	println!("{}", comment::toggle(text.trim_end_matches(['\r', '\n'])));
	Ok(())
}

fn run_lsp() -> AnyEmptyResult {
	let rt = tokio::runtime::Runtime::new()?;
	rt.block_on(hbs_lsp::run_server());
	Ok(())
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
