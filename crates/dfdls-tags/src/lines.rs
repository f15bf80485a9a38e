//! Whole-document line access that carries comment state across lines.

use dfdls_source::LineSource;

use crate::density::count_items;
use crate::scanner::Construct;
use crate::scanner::LineScanner;
use crate::Density;

/// The lines of a document, each scanned with the comment state left by
/// the lines above it.
///
/// Markup inside a multi-line `<!-- ... -->` block comes back as part of a
/// comment construct, so it never counts as an opening or a close.
pub struct DocumentLines<'a> {
    document: &'a dyn LineSource,
    in_comment: Vec<bool>,
}

impl<'a> DocumentLines<'a> {
    #[must_use]
    pub fn new(document: &'a dyn LineSource) -> Self {
        let line_count = document.line_count();
        let mut in_comment = Vec::with_capacity(line_count as usize);
        let mut open = false;
        for line in 0..line_count {
            in_comment.push(open);
            open = LineScanner::resume(document.line_or_empty(line), open)
                .last()
                .is_some_and(|construct| construct.is_open_comment());
        }
        Self {
            document,
            in_comment,
        }
    }

    #[must_use]
    pub fn line_count(&self) -> u32 {
        self.document.line_count()
    }

    /// Text of `line`, empty past the end.
    #[must_use]
    pub fn text(&self, line: u32) -> &'a str {
        let document = self.document;
        document.line_or_empty(line)
    }

    /// Whether `line` begins inside a comment opened above it.
    #[must_use]
    pub fn starts_in_comment(&self, line: u32) -> bool {
        self.in_comment.get(line as usize).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn scan(&self, line: u32) -> LineScanner<'a> {
        LineScanner::resume(self.text(line), self.starts_in_comment(line))
    }

    #[must_use]
    pub fn constructs(&self, line: u32) -> Vec<Construct<'a>> {
        self.scan(line).collect()
    }

    #[must_use]
    pub fn density(&self, line: u32) -> Density {
        Density::from_items(count_items(self.text(line), self.scan(line)))
    }
}

#[cfg(test)]
mod tests {
    use dfdls_source::TextDocument;

    use super::*;
    use crate::scanner::ConstructKind;

    fn commented_doc() -> TextDocument {
        TextDocument::from_lines([
            "<xs:sequence>",
            "  <!--",
            r#"  <xs:element name="old"><xs:complexType>"#,
            "  -->",
            "  <xs:choice>",
        ])
    }

    #[test]
    fn test_comment_state_threads_through_lines() {
        let doc = commented_doc();
        let lines = DocumentLines::new(&doc);
        assert!(!lines.starts_in_comment(0));
        assert!(!lines.starts_in_comment(1));
        assert!(lines.starts_in_comment(2));
        assert!(lines.starts_in_comment(3));
        assert!(!lines.starts_in_comment(4));
        assert!(!lines.starts_in_comment(40));
    }

    #[test]
    fn test_commented_markup_is_not_an_opening() {
        let doc = commented_doc();
        let lines = DocumentLines::new(&doc);
        let inside = lines.constructs(2);
        assert_eq!(inside.len(), 1);
        assert_eq!(inside[0].kind, ConstructKind::Comment);
        assert_eq!(lines.density(2), Density::Sparse);
        assert_eq!(Density::of(lines.text(2)), Density::Dense);
        assert_eq!(lines.constructs(4)[0].name, "xs:choice");
    }

    #[test]
    fn test_single_line_comment_does_not_leak() {
        let doc = TextDocument::from_lines(["<!-- <xs:element> -->", "<xs:element>"]);
        let lines = DocumentLines::new(&doc);
        assert!(!lines.starts_in_comment(1));
        assert!(lines.constructs(1)[0].is_opening());
    }
}
