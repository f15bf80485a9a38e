use std::cmp::Ordering;

use serde::Serialize;

/// A cursor location within a document.
///
/// `character` is a UTF-8 byte column within the line. A position is only
/// meaningful for the document version it was captured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    #[must_use]
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }

    /// The position `columns` bytes to the left, saturating at the line start.
    #[must_use]
    pub fn back(self, columns: u32) -> Self {
        Self::new(self.line, self.character.saturating_sub(columns))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.line, self.character).cmp(&(other.line, other.character))
    }
}

/// A half-open range between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    #[must_use]
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ordering_is_line_major() {
        assert!(Position::new(1, 40) < Position::new(2, 0));
        assert!(Position::new(3, 2) < Position::new(3, 5));
        assert_eq!(
            Position::new(4, 4).cmp(&Position::new(4, 4)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_back_saturates() {
        assert_eq!(Position::new(2, 5).back(1), Position::new(2, 4));
        assert_eq!(Position::new(2, 1).back(3), Position::new(2, 0));
    }

    #[test]
    fn test_serializes_as_lsp_shape() {
        let json = serde_json::to_value(Position::new(3, 7)).unwrap();
        assert_eq!(json, serde_json::json!({"line": 3, "character": 7}));
    }
}
