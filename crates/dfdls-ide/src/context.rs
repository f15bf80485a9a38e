use std::sync::LazyLock;

use dfdls_source::LineSource;
use dfdls_source::Position;
use dfdls_tags::check_missing_close_tag;
use dfdls_tags::close_tag;
use dfdls_tags::is_between_open;
use dfdls_tags::items_on_line;
use dfdls_tags::nearest_open;
use dfdls_tags::nearest_tag;
use dfdls_tags::scanner::cursor_column;
use dfdls_tags::Density;
use dfdls_tags::NamespacePrefix;
use dfdls_tags::TagLocation;
use dfdls_tags::TagName;
use regex::Regex;
use serde::Serialize;
use serde::Serializer;

static DEFINE_VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<dfdl:defineVariable\b[^>]*?\bname\s*=\s*"([^"]*)""#)
        .expect("defineVariable pattern is valid")
});

/// The structural tag whose open and matching close surround the cursor.
///
/// Starts from the nearest structural opening before the cursor and, while
/// that tag closes before the cursor, searches again from just before it.
#[must_use]
pub fn find_enclosing_tag(
    document: &dyn LineSource,
    position: Position,
    prefix: &NamespacePrefix,
) -> Option<TagLocation> {
    let mut candidate = nearest_tag(document, prefix, position.line, position.character)?;

    while !is_between_open(document, position, prefix, &candidate) {
        tracing::trace!(tag = %candidate.tag, line = candidate.line, "closed before cursor");
        candidate = nearest_tag(document, prefix, candidate.line, candidate.character)?;
    }

    tracing::debug!(tag = %candidate.tag, line = candidate.line, "enclosing tag");
    Some(candidate)
}

/// Whether the cursor sits inside a `{ ... }` expression left open earlier
/// in the same tag.
///
/// Text before the cursor is read backwards, continuing onto earlier lines,
/// until a brace or a tag boundary decides it.
#[must_use]
pub fn is_brace_open(document: &dyn LineSource, position: Position) -> bool {
    let text = document.line_or_empty(position.line);
    let mut segment = &text[..cursor_column(text, position.character)];
    let mut line = position.line;

    loop {
        for c in segment.chars().rev() {
            match c {
                '{' => return true,
                '}' | '<' | '>' => return false,
                _ => {}
            }
        }

        if line == 0 {
            return false;
        }
        line -= 1;
        segment = document.line_or_empty(line);
    }
}

/// Names declared by `dfdl:defineVariable` anywhere in the document, in
/// order of first appearance.
#[must_use]
pub fn defined_variables(document: &dyn LineSource) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for line in 0..document.line_count() {
        for captures in DEFINE_VARIABLE.captures_iter(document.line_or_empty(line)) {
            let name = &captures[1];
            if !name.is_empty() && !names.iter().any(|known| known == name) {
                names.push(name.to_string());
            }
        }
    }

    names
}

/// Everything the resolver can say about one cursor position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CursorContext {
    pub position: Position,
    pub prefix: NamespacePrefix,
    pub items_on_line: usize,
    pub density: Density,
    #[serde(serialize_with = "tag_or_none")]
    pub nearest_open: Option<TagName>,
    pub enclosing: Option<TagLocation>,
    pub enclosing_close: Option<TagLocation>,
    #[serde(serialize_with = "tag_or_none")]
    pub unmatched: Option<TagName>,
    pub brace_open: bool,
}

impl CursorContext {
    #[must_use]
    pub fn analyze(document: &dyn LineSource, position: Position, prefix: NamespacePrefix) -> Self {
        let text = document.line_or_empty(position.line);
        let enclosing = find_enclosing_tag(document, position, &prefix);
        let enclosing_close = enclosing.and_then(|open| {
            close_tag(document, &prefix, open.tag, open.line, open.character)
        });

        Self {
            position,
            items_on_line: items_on_line(text),
            density: Density::of(text),
            nearest_open: nearest_open(document, position, &prefix),
            enclosing,
            enclosing_close,
            unmatched: check_missing_close_tag(document, position, &prefix),
            brace_open: is_brace_open(document, position),
            prefix,
        }
    }
}

#[allow(clippy::ref_option)]
fn tag_or_none<S: Serializer>(tag: &Option<TagName>, serializer: S) -> Result<S::Ok, S::Error> {
    match tag {
        Some(tag) => tag.serialize(serializer),
        None => serializer.serialize_str("none"),
    }
}
