use dfdls_source::LineSource;

use crate::scanner::Construct;
use crate::scanner::ConstructKind;
use crate::DocumentLines;
use crate::NamespacePrefix;
use crate::TagLocation;
use crate::TagName;

/// Find the close matching the `tag` opened at `open_line`/`open_pos`.
///
/// The opening is the construct starting at `open_pos`, or failing that the
/// first opening of `tag` after it. A self-closing opening is its own close.
/// Otherwise the rest of the open line and then every following sparse line
/// are scanned, counting nested openings of the same tag, until the close
/// that brings the depth back to zero. Dense lines after the open line are
/// skipped, and so is anything inside a comment.
#[must_use]
pub fn close_tag(
    document: &dyn LineSource,
    prefix: &NamespacePrefix,
    tag: TagName,
    open_line: u32,
    open_pos: u32,
) -> Option<TagLocation> {
    if open_line >= document.line_count() {
        return None;
    }
    let lines = DocumentLines::new(document);
    let qualified = prefix.qualify(tag.local_name());
    let open_pos = open_pos as usize;

    let constructs = lines.constructs(open_line);
    let index = constructs
        .iter()
        .position(|construct| construct.start == open_pos && is_opening_of(construct, &qualified))
        .or_else(|| {
            constructs.iter().position(|construct| {
                construct.start >= open_pos && is_opening_of(construct, &qualified)
            })
        })?;

    let opening = constructs[index];
    if opening.kind == ConstructKind::SelfClosing {
        return Some(TagLocation::new(tag, open_line, opening.start));
    }

    let mut depth = Depth::new(&qualified);
    if let Some(close) = depth.find_close(&constructs[index + 1..]) {
        return Some(TagLocation::new(tag, open_line, close));
    }

    for line in open_line + 1..lines.line_count() {
        if lines.density(line).is_dense() {
            continue;
        }

        if let Some(close) = depth.find_close(&lines.constructs(line)) {
            tracing::trace!(%tag, line, close, "matching close");
            return Some(TagLocation::new(tag, line, close));
        }
    }

    None
}

fn is_opening_of(construct: &Construct<'_>, qualified: &str) -> bool {
    construct.is_opening() && construct.name == qualified
}

/// Nesting depth of one tag name, starting just inside its opening.
pub(crate) struct Depth<'q> {
    qualified: &'q str,
    depth: usize,
}

impl<'q> Depth<'q> {
    pub(crate) fn new(qualified: &'q str) -> Self {
        Self {
            qualified,
            depth: 1,
        }
    }

    /// Feed `constructs` in order, returning the start of the close that
    /// ends the tag. Self-closing tags leave the depth unchanged.
    pub(crate) fn find_close(&mut self, constructs: &[Construct<'_>]) -> Option<usize> {
        for construct in constructs {
            if construct.name != self.qualified {
                continue;
            }
            match construct.kind {
                ConstructKind::Open => self.depth += 1,
                ConstructKind::Close => {
                    self.depth -= 1;
                    if self.depth == 0 {
                        return Some(construct.start);
                    }
                }
                ConstructKind::SelfClosing | ConstructKind::Comment => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use dfdls_source::TextDocument;

    use super::*;

    fn xs() -> NamespacePrefix {
        NamespacePrefix::new("xs")
    }

    #[test]
    fn test_close_on_later_line() {
        let doc = TextDocument::from_lines([
            "<xs:schema>",
            r#"  <xs:element name="a">"#,
            "  </xs:element>",
            "</xs:schema>",
        ]);
        assert_eq!(
            close_tag(&doc, &xs(), TagName::Element, 1, 2),
            Some(TagLocation::new(TagName::Element, 2, 2))
        );
        assert_eq!(
            close_tag(&doc, &xs(), TagName::Schema, 0, 0),
            Some(TagLocation::new(TagName::Schema, 3, 0))
        );
    }

    #[test]
    fn test_nested_same_name_is_skipped() {
        let doc = TextDocument::from_lines([
            "<xs:sequence>",
            "  <xs:sequence>",
            r#"    <xs:element name="a"/>"#,
            "  </xs:sequence>",
            "</xs:sequence>",
        ]);
        assert_eq!(
            close_tag(&doc, &xs(), TagName::Sequence, 0, 0),
            Some(TagLocation::new(TagName::Sequence, 4, 0))
        );
        assert_eq!(
            close_tag(&doc, &xs(), TagName::Sequence, 1, 2),
            Some(TagLocation::new(TagName::Sequence, 3, 2))
        );
    }

    #[test]
    fn test_self_closing_is_its_own_close() {
        let doc = TextDocument::from_lines([r#"<xs:element ref="a"/><xs:element name="b">"#]);
        assert_eq!(
            close_tag(&doc, &xs(), TagName::ElementRef, 0, 0),
            Some(TagLocation::new(TagName::ElementRef, 0, 0))
        );
    }

    #[test]
    fn test_close_on_dense_open_line() {
        let doc = TextDocument::from_lines([
            r#"<xs:element name="a"><xs:complexType></xs:complexType></xs:element>"#,
        ]);
        assert_eq!(
            close_tag(&doc, &xs(), TagName::ComplexType, 0, 21),
            Some(TagLocation::new(TagName::ComplexType, 0, 37))
        );
        assert_eq!(
            close_tag(&doc, &xs(), TagName::Element, 0, 0),
            Some(TagLocation::new(TagName::Element, 0, 54))
        );
    }

    #[test]
    fn test_open_pos_falls_forward_to_next_opening() {
        let doc = TextDocument::from_lines(["  <xs:choice>", "  </xs:choice>"]);
        assert_eq!(
            close_tag(&doc, &xs(), TagName::Choice, 0, 0),
            Some(TagLocation::new(TagName::Choice, 1, 2))
        );
    }

    #[test]
    fn test_dense_lines_are_skipped() {
        let doc = TextDocument::from_lines([
            "<xs:choice>",
            "<xs:choice><xs:element ref=\"a\"/></xs:choice>",
            "</xs:choice>",
        ]);
        assert_eq!(
            close_tag(&doc, &xs(), TagName::Choice, 0, 0),
            Some(TagLocation::new(TagName::Choice, 2, 0))
        );
    }

    #[test]
    fn test_missing_close_or_open() {
        let doc = TextDocument::from_lines(["<xs:sequence>", r#"  <xs:element name="a">"#]);
        assert_eq!(close_tag(&doc, &xs(), TagName::Sequence, 0, 0), None);
        assert_eq!(close_tag(&doc, &xs(), TagName::Choice, 0, 0), None);
        assert_eq!(close_tag(&doc, &xs(), TagName::Sequence, 7, 0), None);
    }

    #[test]
    fn test_commented_close_is_not_a_match() {
        let doc = TextDocument::from_lines([
            "<xs:sequence>",
            "  <!--",
            "  </xs:sequence>",
            "  -->",
            "</xs:sequence>",
        ]);
        assert_eq!(
            close_tag(&doc, &xs(), TagName::Sequence, 0, 0),
            Some(TagLocation::new(TagName::Sequence, 4, 0))
        );
    }
}
