use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use crate::patterns::is_partial_name;

/// Partials directory relative to the workspace root.
pub const DEFAULT_PARTIALS_DIR: &str = "src/partials";

/// File extension of partial files.
pub const PARTIAL_EXTENSION: &str = "html";

/// Default limit on how many directories deep a lookup descends.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// The file name a partial called `name` is stored under.
pub fn partial_file_name(name: &str) -> String {
	format!("{name}.{PARTIAL_EXTENSION}")
}

/// Find the file for partial `name` under `root` using the default depth
/// limit. See [`PartialResolver::resolve`].
pub fn resolve(root: &Path, name: &str) -> Option<PathBuf> {
	PartialResolver::new(root).resolve(name)
}

/// Depth-first lookup of partial files in a directory tree.
///
/// Nothing is cached: every lookup reads the filesystem, so files created
/// after a failed lookup are found by the next one.
#[derive(Debug, Clone)]
pub struct PartialResolver {
	root: PathBuf,
	max_depth: usize,
}

impl PartialResolver {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self {
			root: root.into(),
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}

	#[must_use]
	pub fn with_max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Find `<name>.html` in the root directory or, failing that, in its
	/// subdirectories. Subdirectories are visited depth-first in file name
	/// order and the first match wins.
	///
	/// Returns `None` when the name is not a valid partial name, the root does
	/// not exist, or no file matches. Directories reachable more than once
	/// (through symlinks) are only searched the first time.
	pub fn resolve(&self, name: &str) -> Option<PathBuf> {
		if !is_partial_name(name) {
			tracing::debug!(name, "not a partial name");
			return None;
		}

		let file_name = partial_file_name(name);
		let mut visited = HashSet::new();
		let found = self.search(&self.root, &file_name, 0, &mut visited);

		match &found {
			Some(path) => tracing::debug!(name, path = %path.display(), "resolved partial"),
			None => tracing::debug!(name, root = %self.root.display(), "partial not found"),
		}

		found
	}

	fn search(
		&self,
		directory: &Path,
		file_name: &str,
		depth: usize,
		visited: &mut HashSet<PathBuf>,
	) -> Option<PathBuf> {
		let Ok(canonical) = directory.canonicalize() else {
			return None;
		};

		if !visited.insert(canonical) {
			tracing::debug!(directory = %directory.display(), "skipping directory visited already");
			return None;
		}

		let candidate = directory.join(file_name);
		if candidate.is_file() {
			return Some(candidate);
		}

		if depth >= self.max_depth {
			tracing::debug!(directory = %directory.display(), "maximum partial search depth reached");
			return None;
		}

		let entries = match std::fs::read_dir(directory) {
			Ok(entries) => entries,
			Err(e) => {
				tracing::warn!(directory = %directory.display(), "failed to read directory: {e}");
				return None;
			}
		};

		let mut subdirectories: Vec<PathBuf> = entries
			.filter_map(Result::ok)
			.map(|entry| entry.path())
			.filter(|path| path.is_dir())
			.collect();
		subdirectories.sort();

		subdirectories
			.iter()
			.find_map(|subdirectory| self.search(subdirectory, file_name, depth + 1, visited))
	}
}
