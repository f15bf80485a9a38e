use dfdls_source::LineSource;
use dfdls_source::Position;

use crate::scanner::cursor_column;
use crate::scanner::scan;
use crate::scanner::Construct;
use crate::DocumentLines;
use crate::NamespacePrefix;
use crate::TagName;
use crate::OPEN_PRIORITY;

/// Whether the cursor sits inside the opening tag of `tag`, i.e. somewhere in
/// its attribute list typed so far.
///
/// The last `<prefix:tag` written before the cursor on the cursor line is the
/// candidate. The cursor is inside it when it falls after the `<` and at or
/// before the tag's `>`. A tag with no `>` on the line continues to the end
/// of the line, unless another tag starts first; on dense lines that is what
/// keeps a later sibling from being mistaken for this tag's attributes.
///
/// When nothing starts on the cursor line before the cursor, the opening may
/// have wrapped: the tag left unterminated at the end of an earlier line,
/// with only attribute text in between, still holds the cursor until a `>`
/// outside quotes ends it.
#[must_use]
pub fn check_tag_open(
    document: &dyn LineSource,
    position: Position,
    prefix: &NamespacePrefix,
    tag: TagName,
) -> bool {
    let lines = DocumentLines::new(document);
    let text = lines.text(position.line);
    let cursor = cursor_column(text, position.character);
    let qualified = prefix.qualify(tag.local_name());

    let before_cursor: Vec<Construct<'_>> = lines
        .scan(position.line)
        .take_while(|construct| construct.start < cursor)
        .collect();
    if before_cursor.is_empty() {
        return continues_from_above(&lines, position.line, &text[..cursor], &qualified);
    }

    before_cursor
        .iter()
        .filter(|construct| {
            construct.is_opening()
                && construct.name == qualified
                && construct.start + 1 + qualified.len() <= cursor
        })
        .last()
        .is_some_and(|construct| construct.contains_cursor(cursor))
}

/// Whether an opening of `qualified` left unterminated at the end of a line
/// above `line` is still open after `typed`, the cursor line up to the
/// cursor. Lines in between must hold no constructs at all.
fn continues_from_above(
    lines: &DocumentLines<'_>,
    line: u32,
    typed: &str,
    qualified: &str,
) -> bool {
    if line >= lines.line_count() {
        return false;
    }

    let mut continuation = vec![typed];
    for above in (0..line).rev() {
        let constructs = lines.constructs(above);
        let Some(last) = constructs.last() else {
            continuation.push(lines.text(above));
            continue;
        };
        if !last.is_opening() || last.is_terminated() || last.name != qualified {
            return false;
        }

        // Rescan the tag as one piece so quoted attribute values spanning
        // lines keep their quote state.
        let mut joined = lines.text(above)[last.start..].to_string();
        for part in continuation.iter().rev() {
            joined.push('\n');
            joined.push_str(part);
        }
        return scan(&joined).next().is_some_and(|tag| {
            tag.is_opening() && !tag.is_terminated() && tag.extent == joined.len()
        });
    }

    false
}

/// The first tag, in [`OPEN_PRIORITY`] order, whose opening tag holds the
/// cursor. `None` when the cursor is not inside any opening tag.
#[must_use]
pub fn nearest_open(
    document: &dyn LineSource,
    position: Position,
    prefix: &NamespacePrefix,
) -> Option<TagName> {
    OPEN_PRIORITY
        .iter()
        .copied()
        .find(|&tag| check_tag_open(document, position, prefix, tag))
}
