use dfdls_source::LineSource;
use dfdls_source::Position;
use serde::Serialize;

use crate::scanner::cursor_column;
use crate::scanner::Construct;
use crate::scanner::ConstructKind;
use crate::DocumentLines;
use crate::NamespacePrefix;
use crate::TagName;
use crate::STRUCTURAL_TAGS;

/// A tag found at a line and byte column (the column of its `<`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TagLocation {
    pub tag: TagName,
    pub line: u32,
    pub character: u32,
}

impl TagLocation {
    #[must_use]
    pub fn new(tag: TagName, line: u32, character: usize) -> Self {
        Self {
            tag,
            line,
            character: u32::try_from(character).unwrap_or(u32::MAX),
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        Position::new(self.line, self.character)
    }
}

/// Find the nearest structural tag opened before `start_line`/`start_pos`.
///
/// On a dense start line the constructs before `start_pos` are walked right
/// to left, skipping close tags, self-closing tags and comments; the first
/// structural opening wins. Otherwise, and when the dense line has none,
/// lines are walked upward, skipping dense lines, until a line opens a
/// structural tag it does not also close.
///
/// Only constructs starting strictly before `start_pos` are considered on
/// the start line, so a caller can narrow the search by querying again from
/// a returned location. `None` once the walk passes the first line.
#[must_use]
pub fn nearest_tag(
    document: &dyn LineSource,
    prefix: &NamespacePrefix,
    start_line: u32,
    start_pos: u32,
) -> Option<TagLocation> {
    let lines = DocumentLines::new(document);
    let line_count = lines.line_count();
    if line_count == 0 {
        return None;
    }

    let start_line = start_line.min(line_count - 1);
    let limit = cursor_column(lines.text(start_line), start_pos);

    if lines.density(start_line).is_dense() {
        let preceding: Vec<Construct<'_>> = lines
            .scan(start_line)
            .take_while(|construct| construct.start < limit)
            .collect();

        let found = preceding
            .iter()
            .rev()
            .filter(|construct| construct.kind == ConstructKind::Open)
            .find_map(|construct| {
                TagName::find_qualified(STRUCTURAL_TAGS, prefix, construct.name)
                    .map(|tag| TagLocation::new(tag, start_line, construct.start))
            });

        if found.is_some() {
            return found;
        }

        return start_line
            .checked_sub(1)
            .and_then(|line| walk_sparse_lines(&lines, prefix, line, None));
    }

    walk_sparse_lines(&lines, prefix, start_line, Some(limit))
}

fn walk_sparse_lines(
    lines: &DocumentLines<'_>,
    prefix: &NamespacePrefix,
    from_line: u32,
    limit: Option<usize>,
) -> Option<TagLocation> {
    for line in (0..=from_line).rev() {
        if lines.density(line).is_dense() {
            continue;
        }

        let limit = if line == from_line { limit } else { None };
        let constructs = lines.scan(line);
        if let Some((tag, start)) = unclosed_structural_opening(constructs, prefix, limit) {
            tracing::trace!(%tag, line, start, "nearest structural tag");
            return Some(TagLocation::new(tag, line, start));
        }
    }

    None
}

/// The structural tag a sparse line opens and leaves open, looking only at
/// constructs that start before `limit`.
fn unclosed_structural_opening<'a>(
    constructs: impl Iterator<Item = Construct<'a>>,
    prefix: &NamespacePrefix,
    limit: Option<usize>,
) -> Option<(TagName, usize)> {
    let limit = limit.unwrap_or(usize::MAX);
    let constructs: Vec<Construct<'a>> = constructs
        .take_while(|construct| construct.start < limit)
        .collect();

    let index = constructs.iter().rposition(Construct::is_opening)?;
    let opening = constructs[index];
    if opening.kind == ConstructKind::SelfClosing {
        return None;
    }

    let tag = TagName::find_qualified(STRUCTURAL_TAGS, prefix, opening.name)?;
    let closed_on_line = constructs[index + 1..]
        .iter()
        .any(|construct| construct.kind == ConstructKind::Close && construct.name == opening.name);

    (!closed_on_line).then_some((tag, opening.start))
}
