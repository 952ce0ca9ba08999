use serde::Deserialize;
use serde::Serialize;

use crate::patterns::Match;
use crate::patterns::PARTIAL_OPEN_MARKER;
use crate::patterns::Span;
use crate::patterns::TokenFamily;
use crate::patterns::find_all;
use crate::patterns::is_partial_name;

/// Which part of a partial reference gets decorated as the name.
///
/// The decorated span always stops at the end of the name, never at trailing
/// whitespace or arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSpanPolicy {
	/// The name follows `{{>` directly: decorate exactly the name.
	ExactName,
	/// Whitespace separates `{{>` from the name: decorate from the end of the
	/// marker through the separator up to the end of the name.
	ThroughSeparator,
}

impl NameSpanPolicy {
	/// Pick the policy for a reference whose name starts `name_offset` bytes
	/// into the matched text.
	pub fn for_name_offset(name_offset: usize) -> Self {
		if name_offset > PARTIAL_OPEN_MARKER.len() {
			Self::ThroughSeparator
		} else {
			Self::ExactName
		}
	}

	/// The decorated span for a name found at `name` inside a reference that
	/// starts at `reference_start`.
	pub fn span(self, reference_start: usize, name: Span) -> Span {
		match self {
			Self::ExactName => name,
			Self::ThroughSeparator => Span::new(reference_start + PARTIAL_OPEN_MARKER.len(), name.end),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BraceKind {
	/// `{{`
	Open,
	/// `}}`
	Close,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TokenKind {
	/// The name inside `{{> name ... }}`.
	#[serde(rename_all = "camelCase")]
	PartialReference { name: String, has_arguments: bool },
	/// A whole `name=value` binding.
	Variable { name: String },
	/// The value side of a binding. `literal` is the value without quotes.
	Value { literal: String },
	/// A `{{` or `}}` marker.
	Brace { kind: BraceKind },
}

/// A classified token and the byte span it decorates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
	pub kind: TokenKind,
	pub span: Span,
}

/// Classify every token of interest in `text`.
///
/// Each partial reference is followed by the variable and value tokens of its
/// bindings; brace tokens come last.
pub fn classify(text: &str) -> Vec<Token> {
	let mut tokens = Vec::new();

	for reference in find_all(text, TokenFamily::PartialReference) {
		classify_reference(&reference, &mut tokens);
	}

	tokens.extend(find_all(text, TokenFamily::Delimiter).map(|delimiter| {
		let kind = if delimiter.text == "{{" {
			BraceKind::Open
		} else {
			BraceKind::Close
		};

		Token {
			kind: TokenKind::Brace { kind },
			span: delimiter.span,
		}
	}));

	tokens
}

fn classify_reference(reference: &Match<'_>, tokens: &mut Vec<Token>) {
	let Some(name) = reference.group(1) else {
		return;
	};
	let arguments = reference.group(2);
	let has_arguments = arguments.is_some_and(|arguments| !arguments.text.trim().is_empty());

	let policy = NameSpanPolicy::for_name_offset(name.span.start - reference.span.start);
	tokens.push(Token {
		kind: TokenKind::PartialReference {
			name: name.text.to_string(),
			has_arguments,
		},
		span: policy.span(reference.span.start, name.span),
	});

	let Some(arguments) = arguments.filter(|_| has_arguments) else {
		return;
	};

	// The remainder is searched on its own, then shifted back into document
	// coordinates.
	for binding in find_all(arguments.text, TokenFamily::Binding) {
		let binding = binding.shift(arguments.span.start);
		classify_binding(&binding, tokens);
	}
}

fn classify_binding(binding: &Match<'_>, tokens: &mut Vec<Token>) {
	let Some(identifier) = binding.group(1) else {
		return;
	};
	let Some(literal) = (2..=4).find_map(|index| binding.group(index)) else {
		return;
	};
	let Some(equals) = binding.text.find('=') else {
		return;
	};

	tokens.push(Token {
		kind: TokenKind::Variable {
			name: identifier.text.to_string(),
		},
		span: binding.span,
	});
	tokens.push(Token {
		kind: TokenKind::Value {
			literal: literal.text.to_string(),
		},
		span: Span::new(binding.span.start + equals + 1, binding.span.end),
	});
}

/// Find the name of the partial the cursor at `offset` refers to.
///
/// A cursor anywhere inside a `{{> ... }}` reference selects that reference.
/// Otherwise the word under the cursor is used when it is a valid partial
/// name.
pub fn partial_name_at(text: &str, offset: usize) -> Option<String> {
	let reference = find_all(text, TokenFamily::PartialReference)
		.take_while(|reference| reference.span.start <= offset)
		.find(|reference| reference.span.contains(offset));

	if let Some(reference) = reference {
		return reference.group(1).map(|name| name.text.to_string());
	}

	let word = word_at(text, offset)?;
	is_partial_name(word).then(|| word.to_string())
}

fn is_word_char(ch: char) -> bool {
	ch.is_ascii_alphanumeric() || matches!(ch, '_' | '$' | '-')
}

fn word_at(text: &str, offset: usize) -> Option<&str> {
	if offset > text.len() || !text.is_char_boundary(offset) {
		return None;
	}

	let start = text[..offset]
		.char_indices()
		.rev()
		.take_while(|(_, ch)| is_word_char(*ch))
		.last()
		.map_or(offset, |(index, _)| index);
	let end = text[offset..]
		.char_indices()
		.find(|(_, ch)| !is_word_char(*ch))
		.map_or(text.len(), |(index, _)| offset + index);

	let word = text[start..end].trim_matches('-');
	(!word.is_empty()).then_some(word)
}
