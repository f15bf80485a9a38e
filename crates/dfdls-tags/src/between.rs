use dfdls_source::LineSource;
use dfdls_source::Position;

use crate::close::Depth;
use crate::close_tag;
use crate::scanner::cursor_column;
use crate::scanner::Construct;
use crate::scanner::ConstructKind;
use crate::DocumentLines;
use crate::NamespacePrefix;
use crate::TagLocation;
use crate::TagName;

/// Whether the cursor lies between the last `tag` opened on `start_line`
/// and its matching close.
///
/// When `start_line` is the cursor line, only openings before the cursor
/// are considered.
#[must_use]
pub fn is_between_open_close_tags(
    document: &dyn LineSource,
    position: Position,
    prefix: &NamespacePrefix,
    tag: TagName,
    start_line: u32,
) -> bool {
    if start_line >= document.line_count() {
        return false;
    }
    let lines = DocumentLines::new(document);
    let text = lines.text(start_line);
    let qualified = prefix.qualify(tag.local_name());
    let limit = if start_line == position.line {
        cursor_column(text, position.character)
    } else {
        text.len()
    };

    lines
        .scan(start_line)
        .filter(|construct| {
            construct.is_opening() && construct.name == qualified && construct.start < limit
        })
        .last()
        .is_some_and(|opening| {
            is_between_open(
                document,
                position,
                prefix,
                &TagLocation::new(tag, start_line, opening.start),
            )
        })
}

/// Whether the cursor lies after the opening tag at `open` and at or before
/// the start of its matching close.
///
/// On a dense line holding both the opening and the cursor, only that line
/// is considered: the cursor must be inside a self-closing tag, or past the
/// opening's `>` and not past the same-name close that ends it. Elsewhere a
/// self-closing tag encloses only its own span, and the matching close is
/// searched for across lines with [`close_tag`].
#[must_use]
pub fn is_between_open(
    document: &dyn LineSource,
    position: Position,
    prefix: &NamespacePrefix,
    open: &TagLocation,
) -> bool {
    if open.line >= document.line_count() {
        return false;
    }
    let lines = DocumentLines::new(document);
    let qualified = prefix.qualify(open.tag.local_name());
    let constructs: Vec<Construct<'_>> = lines.constructs(open.line);
    let Some(index) = constructs.iter().position(|construct| {
        construct.start == open.character as usize
            && construct.is_opening()
            && construct.name == qualified
    }) else {
        return false;
    };
    let opening = constructs[index];

    let cursor_text = lines.text(position.line);
    let cursor = cursor_column(cursor_text, position.character);
    let same_line = position.line == open.line;

    if same_line && lines.density(open.line).is_dense() {
        return match (opening.kind, opening.end) {
            (ConstructKind::SelfClosing, _) => opening.contains_cursor(cursor),
            (_, Some(end)) => {
                let close = Depth::new(&qualified).find_close(&constructs[index + 1..]);
                cursor > end && !close.is_some_and(|close| cursor > close)
            }
            (_, None) => false,
        };
    }

    if opening.kind == ConstructKind::SelfClosing {
        return same_line && opening.contains_cursor(cursor);
    }

    if position.line < open.line || (same_line && cursor <= opening.last_column()) {
        return false;
    }

    if position.line > open.line
        && lines.scan(position.line).any(|construct| {
            construct.kind == ConstructKind::Close
                && construct.name == qualified
                && construct.start >= cursor
        })
    {
        return true;
    }

    let cursor_position = Position::new(position.line, u32::try_from(cursor).unwrap_or(u32::MAX));
    close_tag(document, prefix, open.tag, open.line, open.character)
        .is_some_and(|close| cursor_position <= close.position())
}
