use std::fmt::Display;

use derive_more::Deref;
use serde::Deserialize;
use serde::Serialize;

use crate::HbsError;
use crate::HbsResult;
use crate::classifier::Token;
use crate::classifier::TokenKind;
use crate::classifier::classify;
use crate::patterns::Span;
use crate::position::LineTable;
use crate::position::Range;
use crate::resolver::partial_file_name;

/// The command hosts bind to the navigation action on partial names.
pub const OPEN_PARTIAL_COMMAND: &str = "handlebars.navigateToPartialFile";

/// The four decoration categories. Every scan produces one bucket for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
	/// Partial names, e.g. `_header` in `{{> _header }}`.
	Partial,
	/// `{{` and `}}`.
	Brace,
	/// Whole `name=value` bindings.
	Variable,
	/// The value side of a binding.
	Value,
}

impl Category {
	pub const ALL: [Category; 4] = [
		Category::Partial,
		Category::Brace,
		Category::Variable,
		Category::Value,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Category::Partial => "partial",
			Category::Brace => "brace",
			Category::Variable => "variable",
			Category::Value => "value",
		}
	}
}

impl Display for Category {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// The color used for each decoration category.
///
/// ```toml
/// [styles]
/// partial = "#42c684"
/// brace = "#43a9e8"
/// variable = "#FF0000"
/// value = "#FFA500"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Styles {
	pub partial: String,
	pub brace: String,
	pub variable: String,
	pub value: String,
}

impl Default for Styles {
	fn default() -> Self {
		Self {
			partial: "#42c684".to_string(),
			brace: "#43a9e8".to_string(),
			variable: "#FF0000".to_string(),
			value: "#FFA500".to_string(),
		}
	}
}

impl Styles {
	pub fn color(&self, category: Category) -> &str {
		match category {
			Category::Partial => &self.partial,
			Category::Brace => &self.brace,
			Category::Variable => &self.variable,
			Category::Value => &self.value,
		}
	}

	/// Check that every color is a `#rgb` or `#rrggbb` hex color.
	pub fn validate(&self) -> HbsResult<()> {
		for category in Category::ALL {
			let value = self.color(category);
			if parse_hex_color(value).is_none() {
				return Err(HbsError::InvalidColor {
					category: category.to_string(),
					value: value.to_string(),
				});
			}
		}

		Ok(())
	}
}

/// Parse a `#rgb` or `#rrggbb` color into its components.
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
	let hex = value.strip_prefix('#')?;
	if !hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
		return None;
	}

	let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
	match hex.len() {
		3 => {
			let expand = |index: usize| channel(&hex[index..=index].repeat(2));
			Some((expand(0)?, expand(1)?, expand(2)?))
		}
		6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
		_ => None,
	}
}

/// An interaction attached to a decoration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Action {
	/// Open the partial file with the given name.
	OpenPartial { name: String },
}

impl Action {
	pub fn title(&self) -> &'static str {
		match self {
			Action::OpenPartial { .. } => "Navigate to Partial File",
		}
	}

	pub fn command(&self) -> &'static str {
		match self {
			Action::OpenPartial { .. } => OPEN_PARTIAL_COMMAND,
		}
	}
}

/// A single styled range, with optional hover text and action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoration {
	pub range: Range,
	pub span: Span,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub hover: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub action: Option<Action>,
}

/// All decorations of one category. A bucket replaces the previous bucket of
/// the same category wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Deref)]
pub struct DecorationBucket {
	pub category: Category,
	pub color: String,
	#[deref]
	pub decorations: Vec<Decoration>,
}

impl DecorationBucket {
	pub fn new(category: Category, styles: &Styles) -> Self {
		Self {
			category,
			color: styles.color(category).to_string(),
			decorations: Vec::new(),
		}
	}
}

/// The output of a scan: one bucket per [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decorations {
	pub partial: DecorationBucket,
	pub brace: DecorationBucket,
	pub variable: DecorationBucket,
	pub value: DecorationBucket,
}

impl Decorations {
	pub fn empty(styles: &Styles) -> Self {
		Self {
			partial: DecorationBucket::new(Category::Partial, styles),
			brace: DecorationBucket::new(Category::Brace, styles),
			variable: DecorationBucket::new(Category::Variable, styles),
			value: DecorationBucket::new(Category::Value, styles),
		}
	}

	pub fn bucket(&self, category: Category) -> &DecorationBucket {
		match category {
			Category::Partial => &self.partial,
			Category::Brace => &self.brace,
			Category::Variable => &self.variable,
			Category::Value => &self.value,
		}
	}

	fn bucket_mut(&mut self, category: Category) -> &mut DecorationBucket {
		match category {
			Category::Partial => &mut self.partial,
			Category::Brace => &mut self.brace,
			Category::Variable => &mut self.variable,
			Category::Value => &mut self.value,
		}
	}

	pub fn buckets(&self) -> [&DecorationBucket; 4] {
		[&self.partial, &self.brace, &self.variable, &self.value]
	}

	pub fn into_buckets(self) -> [DecorationBucket; 4] {
		[self.partial, self.brace, self.variable, self.value]
	}

	pub fn len(&self) -> usize {
		self.buckets().iter().map(|bucket| bucket.len()).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// The hover text shown on a partial name.
pub fn partial_hover_text(name: &str) -> String {
	format!("Click to open `{}`", partial_file_name(name))
}

/// Scan `text` and group every classified token into decoration buckets.
///
/// This is a pure function of its inputs: scanning the same text with the same
/// styles always produces the same decorations.
pub fn scan(text: &str, styles: &Styles) -> Decorations {
	let table = LineTable::new(text);
	let tokens = classify(text);
	tracing::debug!(tokens = tokens.len(), "scanned document");
	aggregate(&table, tokens, styles)
}

/// Group already classified tokens into buckets, projecting their spans
/// through `table`.
pub fn aggregate(table: &LineTable<'_>, tokens: Vec<Token>, styles: &Styles) -> Decorations {
	let mut decorations = Decorations::empty(styles);

	for token in tokens {
		let range = table.range_of(token.span);
		let (category, hover, action) = match token.kind {
			TokenKind::PartialReference { name, .. } => {
				(
					Category::Partial,
					Some(partial_hover_text(&name)),
					Some(Action::OpenPartial { name }),
				)
			}
			TokenKind::Variable { name } => (Category::Variable, Some(format!("Variable: `{name}`")), None),
			TokenKind::Value { .. } => (Category::Value, None, None),
			TokenKind::Brace { .. } => (Category::Brace, None, None),
		};

		decorations
			.bucket_mut(category)
			.decorations
			.push(Decoration {
				range,
				span: token.span,
				hover,
				action,
			});
	}

	decorations
}
