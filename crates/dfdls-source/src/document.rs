//! Line-oriented text buffers.
//!
//! [`LineSource`] is the only view of a document the tag resolver needs: a
//! line count and the text of each line. [`TextDocument`] is the owned
//! implementation used by the command line and the tests; an editor host
//! can implement the trait directly over its own buffer.

use crate::Position;
use crate::Range;
use crate::SourceError;

/// Line-indexed, read-only access to a document.
pub trait LineSource {
    /// Number of lines, counting a trailing empty line after a final newline.
    fn line_count(&self) -> u32;

    /// Text of `line` without its line terminator, or `None` past the end.
    fn line_text(&self, line: u32) -> Option<&str>;

    /// Text of `line`, reading lines past the end as empty.
    fn line_or_empty(&self, line: u32) -> &str {
        self.line_text(line).unwrap_or("")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<u32>,
    length: u32,
}

impl LineIndex {
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        let mut pos = 0;

        for c in text.chars() {
            pos += u32::try_from(c.len_utf8()).unwrap_or(0);
            if c == '\n' {
                line_starts.push(pos);
            }
        }

        Self {
            line_starts,
            length: pos,
        }
    }

    #[must_use]
    pub fn line_count(&self) -> u32 {
        u32::try_from(self.line_starts.len()).unwrap_or(u32::MAX)
    }

    /// Byte bounds of `line`, including its terminator.
    #[must_use]
    pub fn line_bounds(&self, line: u32) -> Option<(usize, usize)> {
        let start = *self.line_starts.get(line as usize)?;
        let end = self
            .line_starts
            .get(line as usize + 1)
            .copied()
            .unwrap_or(self.length);
        Some((start as usize, end as usize))
    }
}

/// An owned document with a pre-computed line index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextDocument {
    content: String,
    line_index: LineIndex,
}

impl TextDocument {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let line_index = LineIndex::new(&content);
        Self {
            content,
            line_index,
        }
    }

    /// Build a document by joining `lines` with `\n`.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = lines
            .into_iter()
            .map(|line| line.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        Self::new(joined)
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Fail if `position` names a line the document does not have.
    pub fn check_position(&self, position: Position) -> Result<(), SourceError> {
        let line_count = self.line_count();
        if position.line >= line_count {
            return Err(SourceError::LineOutOfRange {
                line: position.line,
                line_count,
            });
        }
        Ok(())
    }

    /// Convert a column counted in characters to a byte column on `line`.
    ///
    /// Columns past the end of the line clamp to the line length.
    #[must_use]
    pub fn byte_column(&self, line: u32, char_column: u32) -> u32 {
        let text = self.line_or_empty(line);
        let bytes: usize = text
            .chars()
            .take(char_column as usize)
            .map(char::len_utf8)
            .sum();
        u32::try_from(bytes).unwrap_or(u32::MAX)
    }

    /// Absolute byte offset of `position`, clamped to its line.
    #[must_use]
    pub fn offset(&self, position: Position) -> Option<usize> {
        let (start, _) = self.line_index.line_bounds(position.line)?;
        let text = self.line_text(position.line)?;
        let mut column = (position.character as usize).min(text.len());
        while !text.is_char_boundary(column) {
            column -= 1;
        }
        Some(start + column)
    }

    /// Replace the text covered by `range`, rebuilding the line index.
    pub fn replace(&mut self, range: Range, text: &str) -> Result<(), SourceError> {
        self.check_position(range.start)?;
        self.check_position(range.end)?;
        let (Some(start), Some(end)) = (self.offset(range.start), self.offset(range.end)) else {
            return Ok(());
        };
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        self.content.replace_range(start..end, text);
        self.line_index = LineIndex::new(&self.content);
        Ok(())
    }
}

impl LineSource for TextDocument {
    fn line_count(&self) -> u32 {
        self.line_index.line_count()
    }

    fn line_text(&self, line: u32) -> Option<&str> {
        let (start, end) = self.line_index.line_bounds(line)?;
        let text = &self.content[start..end];
        let text = text.strip_suffix('\n').unwrap_or(text);
        Some(text.strip_suffix('\r').unwrap_or(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_text_strips_terminators() {
        let doc = TextDocument::new("<xs:schema>\r\n<xs:element/>\n</xs:schema>");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.line_text(0), Some("<xs:schema>"));
        assert_eq!(doc.line_text(1), Some("<xs:element/>"));
        assert_eq!(doc.line_text(2), Some("</xs:schema>"));
        assert_eq!(doc.line_text(3), None);
    }

    #[test]
    fn test_trailing_newline_adds_empty_line() {
        let doc = TextDocument::new("a\n");
        assert_eq!(doc.line_count(), 2);
        assert_eq!(doc.line_text(1), Some(""));
    }

    #[test]
    fn test_line_or_empty_past_end() {
        let doc = TextDocument::from_lines(["only"]);
        assert_eq!(doc.line_or_empty(7), "");
    }

    #[test]
    fn test_from_lines_round_trips_lines() {
        let doc = TextDocument::from_lines(["<a>", "  <b/>", "</a>"]);
        assert_eq!(doc.content(), "<a>\n  <b/>\n</a>");
        assert_eq!(doc.line_text(1), Some("  <b/>"));
    }

    #[test]
    fn test_check_position_out_of_range() {
        let doc = TextDocument::from_lines(["one", "two"]);
        assert!(doc.check_position(Position::new(1, 0)).is_ok());
        assert_eq!(
            doc.check_position(Position::new(2, 0)),
            Err(SourceError::LineOutOfRange {
                line: 2,
                line_count: 2
            })
        );
    }

    #[test]
    fn test_byte_column_counts_multibyte_chars() {
        let doc = TextDocument::from_lines(["<xs:élément>"]);
        assert_eq!(doc.byte_column(0, 4), 4);
        assert_eq!(doc.byte_column(0, 5), 6);
        assert_eq!(doc.byte_column(0, 100), 14);
    }

    #[test]
    fn test_replace_single_line() {
        let mut doc = TextDocument::from_lines(["<xs:sequence>", "x"]);
        doc.replace(
            Range::new(Position::new(0, 12), Position::new(0, 13)),
            ">\n</xs:sequence>",
        )
        .unwrap();
        assert_eq!(doc.content(), "<xs:sequence>\n</xs:sequence>\nx");
        assert_eq!(doc.line_count(), 3);
    }

    #[test]
    fn test_replace_rejects_missing_line() {
        let mut doc = TextDocument::from_lines(["a"]);
        let result = doc.replace(
            Range::new(Position::new(4, 0), Position::new(4, 0)),
            "b",
        );
        assert!(result.is_err());
        assert_eq!(doc.content(), "a");
    }
}
