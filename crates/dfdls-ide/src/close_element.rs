use dfdls_source::LineSource;
use dfdls_source::Position;
use dfdls_source::Range;
use dfdls_tags::check_missing_close_tag;
use dfdls_tags::items_on_line;
use dfdls_tags::scanner::cursor_column;
use dfdls_tags::scanner::scan;
use dfdls_tags::scanner::ConstructKind;
use dfdls_tags::NamespacePrefix;
use dfdls_tags::TagName;

use crate::edits::SnippetEdit;
use crate::snippets::generate_block_close;
use crate::snippets::generate_inline_close;
use crate::snippets::generate_self_close;
use crate::snippets::generate_variable_close;

/// Build the edit that closes the tag just finished with `>`.
///
/// Returns `None` unless the text before the cursor ends with `>` and the
/// balance check reports an unmatched tag worth closing. The edit replaces
/// the typed `>`.
#[must_use]
pub fn close_element(
    document: &dyn LineSource,
    position: Position,
    prefix: &NamespacePrefix,
) -> Option<SnippetEdit> {
    let text = document.line_or_empty(position.line);
    let cursor = cursor_column(text, position.character);
    let trigger = &text[..cursor];
    if !trigger.ends_with('>') {
        return None;
    }

    let tag = check_missing_close_tag(document, position, prefix)?;
    let openings = items_on_line(trigger);
    if !is_closable(tag) && openings != 0 {
        tracing::debug!(%tag, "unmatched tag is not auto-closed");
        return None;
    }

    let snippet = match openings {
        0 | 1 if trigger.contains("</") => None,
        0 => Some(generate_inline_close(prefix, tag)),
        1 => Some(single_opening_snippet(trigger, prefix, tag)),
        _ => multiple_openings_snippet(trigger, prefix, tag),
    }?;

    let end = Position::new(position.line, u32::try_from(cursor).unwrap_or(u32::MAX));
    tracing::debug!(%tag, openings, "auto-close");
    Some(SnippetEdit {
        range: Range::new(end.back(1), end),
        snippet,
    })
}

fn is_closable(tag: TagName) -> bool {
    matches!(
        tag,
        TagName::Element
            | TagName::Group
            | TagName::Sequence
            | TagName::SimpleType
            | TagName::Choice
            | TagName::DefineVariable
            | TagName::SetVariable
    )
}

fn single_opening_snippet(trigger: &str, prefix: &NamespacePrefix, tag: TagName) -> String {
    if is_reference(trigger, prefix, tag) {
        return generate_self_close();
    }

    match tag {
        TagName::DefineVariable | TagName::SetVariable => generate_variable_close(prefix, tag),
        _ => {
            let indent_len = trigger.len() - trigger.trim_start().len();
            generate_block_close(prefix, tag, &trigger[..indent_len])
        }
    }
}

/// Whether the line opens the `ref` form of `tag`.
fn is_reference(trigger: &str, prefix: &NamespacePrefix, tag: TagName) -> bool {
    let Some(variant) = tag.reference_variant() else {
        return false;
    };
    let qualified = prefix.qualify(variant.local_name());

    scan(trigger)
        .filter(|construct| construct.is_opening() && construct.name == qualified)
        .last()
        .is_some_and(|construct| {
            let end = construct.end.map_or(construct.extent, |end| end + 1);
            trigger[construct.start..end]
                .split_ascii_whitespace()
                .any(|attribute| attribute.starts_with("ref="))
        })
}

fn multiple_openings_snippet(
    trigger: &str,
    prefix: &NamespacePrefix,
    tag: TagName,
) -> Option<String> {
    let qualified = prefix.qualify(tag.local_name());
    let constructs: Vec<_> = scan(trigger).collect();
    let index = constructs
        .iter()
        .rposition(|construct| construct.is_opening() && construct.name == qualified)?;

    let opening = constructs[index];
    let closed_after = constructs[index + 1..].iter().any(|construct| {
        construct.kind == ConstructKind::Close && construct.name == qualified
    });

    (opening.kind == ConstructKind::Open && !closed_after)
        .then(|| generate_inline_close(prefix, tag))
}
