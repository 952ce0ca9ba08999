use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::HbsError;
use crate::HbsResult;
use crate::decorations::Styles;
use crate::resolver::DEFAULT_MAX_DEPTH;
use crate::resolver::DEFAULT_PARTIALS_DIR;
use crate::resolver::PartialResolver;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["hbs.toml", ".hbs.toml", ".config/hbs.toml"];

/// Configuration loaded from an `hbs.toml` file.
///
/// ```toml
/// [partials]
/// dir = "src/partials"
/// max_depth = 32
///
/// [styles]
/// partial = "#42c684"
/// brace = "#43a9e8"
/// variable = "#FF0000"
/// value = "#FFA500"
/// ```
///
/// Every section and key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct HbsConfig {
	#[serde(default)]
	pub partials: PartialsConfig,
	#[serde(default)]
	pub styles: Styles,
}

/// Where partial files live and how deep lookups may go.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PartialsConfig {
	/// The partials directory, relative to the workspace root.
	pub dir: PathBuf,
	/// How many directories below `dir` a lookup descends.
	pub max_depth: usize,
}

impl Default for PartialsConfig {
	fn default() -> Self {
		Self {
			dir: PathBuf::from(DEFAULT_PARTIALS_DIR),
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}
}

impl HbsConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> HbsResult<Option<HbsConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	/// Like [`HbsConfig::load`], falling back to the defaults when no config
	/// file exists.
	pub fn load_or_default(root: &Path) -> HbsResult<HbsConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	/// Parse and validate config file contents.
	pub fn parse(content: &str) -> HbsResult<HbsConfig> {
		let config: HbsConfig =
			toml::from_str(content).map_err(|e| HbsError::ConfigParse(e.to_string()))?;
		config.styles.validate()?;

		Ok(config)
	}

	/// The absolute partials directory for the workspace at `root`.
	pub fn partials_dir(&self, root: &Path) -> PathBuf {
		root.join(&self.partials.dir)
	}

	/// A resolver searching this workspace's partials directory.
	pub fn resolver(&self, root: &Path) -> PartialResolver {
		PartialResolver::new(self.partials_dir(root)).with_max_depth(self.partials.max_depth)
	}
}
