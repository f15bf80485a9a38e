use serde::Serialize;

use crate::scanner::scan;
use crate::scanner::Construct;

/// Whether a line holds one tag-opening construct or several.
///
/// Controls which scanning variant the resolver applies to a line. It is
/// recomputed from the line text on every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Density {
    /// Zero or one opening.
    Sparse,
    /// Two or more openings.
    Dense,
}

impl Density {
    #[must_use]
    pub fn of(text: &str) -> Self {
        Self::from_items(items_on_line(text))
    }

    pub(crate) fn from_items(items: usize) -> Self {
        if items > 1 {
            Density::Dense
        } else {
            Density::Sparse
        }
    }

    #[must_use]
    pub fn is_dense(self) -> bool {
        self == Density::Dense
    }
}

/// Count the tag-opening constructs that start on `text`.
///
/// Close tags and comments do not count; self-closing tags and tags left
/// unterminated at the end of the line count once each. Any line mentioning
/// `schema` counts as exactly one, so the schema root line is always sparse.
#[must_use]
pub fn items_on_line(text: &str) -> usize {
    count_items(text, scan(text))
}

/// [`items_on_line`] over constructs already scanned from `text`.
pub(crate) fn count_items<'a>(
    text: &str,
    constructs: impl Iterator<Item = Construct<'a>>,
) -> usize {
    if text.contains("schema") {
        return 1;
    }

    constructs.filter(Construct::is_opening).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_openings_is_dense() {
        let text = r#"<element name="a"><sequence>"#;
        assert_eq!(items_on_line(text), 2);
        assert_eq!(Density::of(text), Density::Dense);
    }

    #[test]
    fn test_single_opening_is_sparse() {
        let text = r#"<element name="a">"#;
        assert_eq!(items_on_line(text), 1);
        assert_eq!(Density::of(text), Density::Sparse);
    }

    #[test]
    fn test_close_tag_alone_counts_zero() {
        assert_eq!(items_on_line("</element>"), 0);
        assert_eq!(items_on_line("    </xs:sequence>"), 0);
    }

    #[test]
    fn test_comments_are_ignored() {
        assert_eq!(items_on_line("<!-- <xs:element> --> <xs:choice>"), 1);
        assert_eq!(items_on_line("<!-- a comment -->"), 0);
    }

    #[test]
    fn test_open_close_pair_on_one_line_is_sparse() {
        let text = r#"<xs:element name="a"></xs:element>"#;
        assert_eq!(items_on_line(text), 1);
        assert!(!Density::of(text).is_dense());
    }

    #[test]
    fn test_self_closing_tags_count() {
        let text = r#"<xs:element ref="a"/><xs:element ref="b"/>"#;
        assert_eq!(items_on_line(text), 2);
    }

    #[test]
    fn test_unterminated_tag_counts_once() {
        assert_eq!(items_on_line(r#"<xs:element name="a""#), 1);
        assert_eq!(items_on_line(r#"<xs:sequence><xs:element name="a""#), 2);
    }

    #[test]
    fn test_schema_mention_forces_one() {
        assert_eq!(
            items_on_line(r#"<xs:schema xmlns:xs="x"><xs:element/><xs:element/>"#),
            1
        );
        assert_eq!(items_on_line("</xs:schema>"), 1);
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(items_on_line(""), 0);
        assert_eq!(Density::of("   "), Density::Sparse);
    }
}
