use std::path::Path;
use std::path::PathBuf;

use crate::HbsError;
use crate::HbsResult;
use crate::patterns::is_partial_name;
use crate::resolver::partial_file_name;

/// A partial file written by [`create_partial`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPartial {
	pub name: String,
	/// Where the partial was written.
	pub path: PathBuf,
	/// The directive that should replace the extracted markup.
	pub reference: String,
}

/// The directive referencing partial `name`, e.g. `{{> _header }}`.
pub fn partial_reference(name: &str) -> String {
	format!("{{{{> {name} }}}}")
}

/// Move `content` into a new partial file `<partials_dir>/<name>.html`.
///
/// Every check runs before anything touches the disk, so a failed call leaves
/// no file behind. The partials directory is created when missing.
pub fn create_partial(partials_dir: &Path, name: &str, content: &str) -> HbsResult<CreatedPartial> {
	if content.trim().is_empty() {
		return Err(HbsError::EmptySelection);
	}

	let name = name.trim();
	if name.is_empty() {
		return Err(HbsError::EmptyPartialName);
	}

	if !is_partial_name(name) {
		return Err(HbsError::InvalidPartialName(name.to_string()));
	}

	let path = partials_dir.join(partial_file_name(name));
	if path.exists() {
		return Err(HbsError::DuplicatePartial {
			name: name.to_string(),
			path: path.display().to_string(),
		});
	}

	std::fs::create_dir_all(partials_dir)?;
	std::fs::write(&path, content)?;
	tracing::debug!(name, path = %path.display(), "created partial");

	Ok(CreatedPartial {
		name: name.to_string(),
		path,
		reference: partial_reference(name),
	})
}
