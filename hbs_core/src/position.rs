use serde::Deserialize;
use serde::Serialize;

use crate::patterns::Span;

/// A zero-based location in a document. `character` is measured in UTF-16
/// code units, which is what editors speaking LSP expect.
#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Point {
	pub line: usize,
	pub character: usize,
}

impl Point {
	pub fn new(line: usize, character: usize) -> Self {
		Self { line, character }
	}
}

/// A half-open range between two [`Point`]s.
#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Range {
	pub start: Point,
	pub end: Point,
}

impl Range {
	pub fn new(start: Point, end: Point) -> Self {
		Self { start, end }
	}

	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}
}

/// Pre-computed table of line-start byte offsets for a document.
///
/// Building the table is `O(n)`; each lookup is a binary search over the line
/// starts followed by a walk of a single line. A line ends at `\n`, `\r\n` or
/// a lone `\r`.
#[derive(Debug, Clone)]
pub struct LineTable<'t> {
	text: &'t str,
	/// Byte offsets of the start of each line. `line_starts[0]` is always 0.
	line_starts: Vec<usize>,
}

impl<'t> LineTable<'t> {
	pub fn new(text: &'t str) -> Self {
		let bytes = text.as_bytes();
		let mut line_starts = vec![0];

		for (index, byte) in bytes.iter().enumerate() {
			match byte {
				b'\n' => line_starts.push(index + 1),
				b'\r' if bytes.get(index + 1) != Some(&b'\n') => line_starts.push(index + 1),
				_ => {}
			}
		}

		Self { text, line_starts }
	}

	pub fn text(&self) -> &'t str {
		self.text
	}

	pub fn line_count(&self) -> usize {
		self.line_starts.len()
	}

	/// Convert a byte offset into a [`Point`]. Offsets past the end of the
	/// text clamp to the end, offsets inside a multi-byte character snap back
	/// to the start of that character.
	pub fn point_at(&self, offset: usize) -> Point {
		let mut offset = offset.min(self.text.len());
		while !self.text.is_char_boundary(offset) {
			offset -= 1;
		}

		let line = match self.line_starts.binary_search(&offset) {
			Ok(exact) => exact,
			Err(insert) => insert.saturating_sub(1),
		};
		let line_start = self.line_starts[line];
		let character = self.text[line_start..offset].encode_utf16().count();

		Point { line, character }
	}

	/// Convert a byte span into a [`Range`].
	pub fn range_of(&self, span: Span) -> Range {
		Range {
			start: self.point_at(span.start),
			end: self.point_at(span.end),
		}
	}

	/// The byte span of a line's content, excluding its terminator.
	pub fn line_span(&self, line: usize) -> Option<Span> {
		let start = *self.line_starts.get(line)?;
		let end = match self.line_starts.get(line + 1) {
			Some(&next) => {
				let terminator = &self.text.as_bytes()[..next];
				if terminator.ends_with(b"\r\n") {
					next - 2
				} else {
					next - 1
				}
			}
			None => self.text.len(),
		};

		Some(Span::new(start, end))
	}

	/// Convert a [`Point`] back into a byte offset. Returns `None` when the
	/// line does not exist. A character beyond the end of the line clamps to
	/// the line end, and one inside a surrogate pair snaps to the next char.
	pub fn offset_at(&self, point: Point) -> Option<usize> {
		let line = self.line_span(point.line)?;
		let mut units = 0;

		for (index, ch) in self.text[line.start..line.end].char_indices() {
			if units >= point.character {
				return Some(line.start + index);
			}
			units += ch.len_utf16();
		}

		Some(line.end)
	}

	/// Convert a [`Range`] back into a byte span.
	pub fn span_of(&self, range: Range) -> Option<Span> {
		Some(Span::new(
			self.offset_at(range.start)?,
			self.offset_at(range.end)?,
		))
	}
}
