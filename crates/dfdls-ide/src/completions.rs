//! Element completion for DFDL schemas.
//!
//! Completion is driven by the structural tag enclosing the cursor: each
//! container tag offers the child elements it may hold.

use dfdls_source::LineSource;
use dfdls_source::Position;
use dfdls_tags::nearest_open;
use dfdls_tags::NamespacePrefix;
use dfdls_tags::TagName;
use serde::Serialize;

use crate::context::defined_variables;
use crate::context::find_enclosing_tag;
use crate::context::is_brace_open;
use crate::snippets::generate_snippet_for_item;

/// An element the completion catalog can insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildItem {
    Element,
    ElementRef,
    Sequence,
    Choice,
    Group,
    GroupRef,
    ComplexType,
    SimpleType,
    Restriction,
    Annotation,
    Appinfo,
    Assert,
    Discriminator,
    DefineVariable,
    SetVariable,
}

impl ChildItem {
    /// Completion label, e.g. `xs:element name` or `dfdl:assert`.
    #[must_use]
    pub fn label(self, prefix: &NamespacePrefix) -> String {
        match self {
            ChildItem::Element => prefix.qualify("element name"),
            ChildItem::ElementRef => prefix.qualify("element ref"),
            ChildItem::Sequence => prefix.qualify("sequence"),
            ChildItem::Choice => prefix.qualify("choice"),
            ChildItem::Group => prefix.qualify("group name"),
            ChildItem::GroupRef => prefix.qualify("group ref"),
            ChildItem::ComplexType => prefix.qualify("complexType"),
            ChildItem::SimpleType => prefix.qualify("simpleType"),
            ChildItem::Restriction => prefix.qualify("restriction"),
            ChildItem::Annotation => prefix.qualify("annotation"),
            ChildItem::Appinfo => prefix.qualify("appinfo"),
            ChildItem::Assert => String::from("dfdl:assert"),
            ChildItem::Discriminator => String::from("dfdl:discriminator"),
            ChildItem::DefineVariable => String::from("dfdl:defineVariable"),
            ChildItem::SetVariable => String::from("dfdl:setVariable"),
        }
    }

    #[must_use]
    pub fn documentation(self) -> &'static str {
        match self {
            ChildItem::Element => "Declare a named element.",
            ChildItem::ElementRef => "Reference a global element declaration.",
            ChildItem::Sequence => "Children appear in order.",
            ChildItem::Choice => "Exactly one of the children appears.",
            ChildItem::Group => "Declare a named model group.",
            ChildItem::GroupRef => "Reference a global group definition.",
            ChildItem::ComplexType => "Content model of an element with children.",
            ChildItem::SimpleType => "Value space of a simple element.",
            ChildItem::Restriction => "Restrict a built-in or named simple type.",
            ChildItem::Annotation => "Attach DFDL properties to the enclosing component.",
            ChildItem::Appinfo => "DFDL annotation container.",
            ChildItem::Assert => "Fail the parse unless the expression or pattern holds.",
            ChildItem::Discriminator => "Resolve a point of uncertainty when the test holds.",
            ChildItem::DefineVariable => "Declare a DFDL variable.",
            ChildItem::SetVariable => "Set the value of a declared DFDL variable.",
        }
    }
}

/// Child items offered inside each structural tag, in display order.
#[must_use]
pub fn child_items(tag: TagName) -> &'static [ChildItem] {
    match tag {
        TagName::Element | TagName::ElementRef => &[
            ChildItem::ComplexType,
            ChildItem::SimpleType,
            ChildItem::Annotation,
            ChildItem::Appinfo,
            ChildItem::Discriminator,
            ChildItem::Assert,
        ],
        TagName::Sequence => &[
            ChildItem::Element,
            ChildItem::ElementRef,
            ChildItem::Sequence,
            ChildItem::Choice,
            ChildItem::Annotation,
            ChildItem::Appinfo,
            ChildItem::Discriminator,
            ChildItem::Assert,
        ],
        TagName::Choice => &[ChildItem::Element, ChildItem::ElementRef, ChildItem::GroupRef],
        TagName::Group | TagName::GroupRef | TagName::ComplexType => &[ChildItem::Sequence],
        TagName::SimpleType => &[ChildItem::Restriction],
        TagName::Schema => &[
            ChildItem::Element,
            ChildItem::Group,
            ChildItem::ComplexType,
            ChildItem::SimpleType,
            ChildItem::Annotation,
            ChildItem::Appinfo,
            ChildItem::DefineVariable,
            ChildItem::SetVariable,
        ],
        TagName::Annotation
        | TagName::Appinfo
        | TagName::Assert
        | TagName::Discriminator
        | TagName::DefineVariable
        | TagName::SetVariable => &[],
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionItem {
    pub label: String,
    /// LSP snippet syntax.
    pub snippet: String,
    pub documentation: &'static str,
}

/// Completion items for the cursor, or nothing when the cursor is inside an
/// opening tag, inside a `{ ... }` expression, or outside every structural
/// tag.
#[must_use]
pub fn element_completions(
    document: &dyn LineSource,
    position: Position,
    prefix: &NamespacePrefix,
) -> Vec<CompletionItem> {
    if is_brace_open(document, position) {
        tracing::debug!(line = position.line, "cursor inside an open expression");
        return Vec::new();
    }

    if let Some(open) = nearest_open(document, position, prefix) {
        tracing::debug!(%open, "cursor inside an opening tag");
        return Vec::new();
    }

    let Some(enclosing) = find_enclosing_tag(document, position, prefix) else {
        return Vec::new();
    };

    let items = child_items(enclosing.tag);
    let variables = if items.contains(&ChildItem::SetVariable) {
        defined_variables(document)
    } else {
        Vec::new()
    };

    tracing::debug!(tag = %enclosing.tag, count = items.len(), "element completions");
    items
        .iter()
        .map(|&item| CompletionItem {
            label: item.label(prefix),
            snippet: generate_snippet_for_item(item, prefix, &variables),
            documentation: item.documentation(),
        })
        .collect()
}
