use dfdls_source::Range;
use dfdls_source::SourceError;
use dfdls_source::TextDocument;
use serde::Serialize;

use crate::snippets::render_snippet;

/// Replace `range` with `snippet`, written in LSP snippet syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnippetEdit {
    pub range: Range,
    pub snippet: String,
}

/// Where snippet edits get applied. Editor hosts implement this over their
/// own buffers; the resolver and completion code only produce edits.
pub trait EditSink {
    type Error;

    fn apply(&mut self, edit: &SnippetEdit) -> Result<(), Self::Error>;
}

impl EditSink for TextDocument {
    type Error = SourceError;

    /// Insert the snippet's plain-text rendering.
    fn apply(&mut self, edit: &SnippetEdit) -> Result<(), SourceError> {
        self.replace(edit.range, &render_snippet(&edit.snippet))
    }
}

#[cfg(test)]
mod tests {
    use dfdls_source::Position;

    use super::*;

    #[test]
    fn test_apply_renders_snippet() {
        let mut doc = TextDocument::from_lines(["<xs:sequence>", "</xs:schema>"]);
        let edit = SnippetEdit {
            range: Range::new(Position::new(0, 12), Position::new(0, 13)),
            snippet: String::from(">\n\t$0\n</xs:sequence>"),
        };
        doc.apply(&edit).unwrap();
        assert_eq!(doc.content(), "<xs:sequence>\n\t\n</xs:sequence>\n</xs:schema>");
    }

    #[test]
    fn test_apply_out_of_range() {
        let mut doc = TextDocument::new("<xs:schema>");
        let edit = SnippetEdit {
            range: Range::new(Position::new(3, 0), Position::new(3, 1)),
            snippet: String::from(">"),
        };
        assert_eq!(
            doc.apply(&edit),
            Err(SourceError::LineOutOfRange {
                line: 3,
                line_count: 1
            })
        );
        assert_eq!(doc.content(), "<xs:schema>");
    }

    #[test]
    fn test_edit_serializes_range() {
        let edit = SnippetEdit {
            range: Range::new(Position::new(1, 4), Position::new(1, 5)),
            snippet: String::from("></xs:choice>$0"),
        };
        let json = serde_json::to_value(&edit).unwrap();
        assert_eq!(json["range"]["start"]["line"], 1);
        assert_eq!(json["range"]["end"]["character"], 5);
        assert_eq!(json["snippet"], "></xs:choice>$0");
    }
}
