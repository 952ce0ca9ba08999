use std::sync::LazyLock;

use logos::Logos;
use regex::CaptureMatches;
use regex::Captures;
use regex::Regex;
use serde::Deserialize;
use serde::Serialize;

/// `{{`
pub const OPEN_MARKER: &str = "{{";
/// `}}`
pub const CLOSE_MARKER: &str = "}}";
/// `{{>`
pub const PARTIAL_OPEN_MARKER: &str = "{{>";

/// A partial name: an identifier optionally chained with `-` separated
/// identifier segments, e.g. `_banner-detail-page`.
const NAME: &str = r"[_a-zA-Z$][0-9A-Za-z_$]*(?:-[_a-zA-Z$][0-9A-Za-z_$]*)*";

static PARTIAL_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(&format!(r"\{{\{{>\s*({NAME})([^}}]*)\}}\}}"))
		.unwrap_or_else(|e| panic!("invalid partial reference pattern: {e}"))
});

// ASCII word boundary: `éx=1` still binds `x`.
static BINDING: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"(?-u:\b)([a-zA-Z_$][0-9A-Za-z_$]*)\s*=\s*(?:([0-9]+)|'([^']+)'|"([^"]+)")"#)
		.unwrap_or_else(|e| panic!("invalid binding pattern: {e}"))
});

static PARTIAL_NAME: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(&format!("^{NAME}$")).unwrap_or_else(|e| panic!("invalid name pattern: {e}"))
});

/// Check whether `name` is a valid partial name.
pub fn is_partial_name(name: &str) -> bool {
	PARTIAL_NAME.is_match(name)
}

/// The token families the scanner knows how to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenFamily {
	/// `{{> name args }}`. Group 1 is the name, group 2 the argument
	/// remainder.
	PartialReference,
	/// `name=value`. Group 1 is the identifier, groups 2-4 hold the integer,
	/// single quoted and double quoted value respectively.
	Binding,
	/// `{{` and `}}`, with no groups.
	Delimiter,
}

/// A half-open byte range into the scanned text.
#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Span {
	pub start: usize,
	pub end: usize,
}

impl Span {
	pub fn new(start: usize, end: usize) -> Self {
		Self { start, end }
	}

	pub fn len(&self) -> usize {
		self.end - self.start
	}

	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}

	/// Whether `offset` falls inside the span. The end is inclusive so a
	/// cursor placed right after a token still counts as on it.
	pub fn contains(&self, offset: usize) -> bool {
		self.start <= offset && offset <= self.end
	}

	pub fn overlaps(&self, other: &Span) -> bool {
		self.start < other.end && other.start < self.end
	}

	#[must_use]
	pub fn shift(self, by: usize) -> Self {
		Self {
			start: self.start + by,
			end: self.end + by,
		}
	}
}

impl From<std::ops::Range<usize>> for Span {
	fn from(range: std::ops::Range<usize>) -> Self {
		Self::new(range.start, range.end)
	}
}

/// A captured group inside a [`Match`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group<'t> {
	pub span: Span,
	pub text: &'t str,
}

/// A single occurrence of a token family in the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'t> {
	pub span: Span,
	pub text: &'t str,
	/// Captured groups in pattern order. Groups that did not participate in
	/// the match are `None`.
	pub groups: Vec<Option<Group<'t>>>,
}

impl<'t> Match<'t> {
	/// Get the captured group at `index` (1-based, like the pattern).
	pub fn group(&self, index: usize) -> Option<Group<'t>> {
		self.groups.get(index.checked_sub(1)?).copied().flatten()
	}

	/// Move every offset in this match forward by `by` bytes. Used when a
	/// match was found in a substring and must be expressed relative to the
	/// full document.
	#[must_use]
	pub fn shift(mut self, by: usize) -> Self {
		self.span = self.span.shift(by);
		for group in self.groups.iter_mut().flatten() {
			group.span = group.span.shift(by);
		}
		self
	}

	fn from_captures(captures: &Captures<'t>) -> Option<Self> {
		let whole = captures.get(0)?;
		let groups = captures
			.iter()
			.skip(1)
			.map(|group| {
				group.map(|group| {
					Group {
						span: group.range().into(),
						text: group.as_str(),
					}
				})
			})
			.collect();

		Some(Self {
			span: whole.range().into(),
			text: whole.as_str(),
			groups,
		})
	}
}

/// Delimiter tokens produced by logos. Everything that isn't a brace is
/// skipped in bulk; a lone `{` or `}` surfaces as a lexer error and is
/// ignored.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[^{}]+")]
enum DelimiterToken {
	#[token("{{")]
	Open,
	#[token("}}")]
	Close,
}

/// Lazy iterator over the matches of a single token family.
pub struct Matches<'t> {
	inner: MatchesInner<'t>,
}

enum MatchesInner<'t> {
	Pattern(CaptureMatches<'static, 't>),
	Delimiter {
		source: &'t str,
		lexer: logos::SpannedIter<'t, DelimiterToken>,
	},
}

impl<'t> Iterator for Matches<'t> {
	type Item = Match<'t>;

	fn next(&mut self) -> Option<Self::Item> {
		match &mut self.inner {
			MatchesInner::Pattern(captures) => {
				captures
					.next()
					.and_then(|captures| Match::from_captures(&captures))
			}
			MatchesInner::Delimiter { source, lexer } => {
				let source: &'t str = *source;
				lexer.find_map(|(token, range)| {
					token.ok()?;
					Some(Match {
						text: &source[range.clone()],
						span: range.into(),
						groups: Vec::new(),
					})
				})
			}
		}
	}
}

/// Find every occurrence of `family` in `text`, left to right and
/// non-overlapping. Each call creates an independent matcher, so nested
/// searches never share iteration state.
pub fn find_all(text: &str, family: TokenFamily) -> Matches<'_> {
	let inner = match family {
		TokenFamily::PartialReference => MatchesInner::Pattern(PARTIAL_REFERENCE.captures_iter(text)),
		TokenFamily::Binding => MatchesInner::Pattern(BINDING.captures_iter(text)),
		TokenFamily::Delimiter => {
			MatchesInner::Delimiter {
				source: text,
				lexer: DelimiterToken::lexer(text).spanned(),
			}
		}
	};

	Matches { inner }
}
