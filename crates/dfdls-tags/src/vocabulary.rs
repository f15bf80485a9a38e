use std::fmt;

use serde::Serialize;
use serde::Serializer;

use crate::NamespacePrefix;

/// The closed set of schema tags the resolver knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagName {
    Schema,
    Element,
    /// `<element ref="..."/>`, matched as `element`
    ElementRef,
    Sequence,
    Choice,
    Group,
    /// `<group ref="..."/>`, matched as `group`
    GroupRef,
    SimpleType,
    ComplexType,
    Annotation,
    Appinfo,
    Assert,
    Discriminator,
    DefineVariable,
    SetVariable,
}

/// Tags whose open span can hold the cursor, most deeply nested first.
pub const OPEN_PRIORITY: &[TagName] = &[
    TagName::Element,
    TagName::Sequence,
    TagName::Choice,
    TagName::Group,
    TagName::SimpleType,
    TagName::ComplexType,
    TagName::DefineVariable,
    TagName::SetVariable,
    TagName::Schema,
];

/// Container tags used as completion-context anchors.
pub const STRUCTURAL_TAGS: &[TagName] = &[
    TagName::Element,
    TagName::Sequence,
    TagName::Choice,
    TagName::Group,
    TagName::SimpleType,
    TagName::ComplexType,
    TagName::Schema,
];

/// Tags checked for an unmatched open, in reporting order.
pub const BALANCE_ORDER: &[TagName] = &[
    TagName::Annotation,
    TagName::Appinfo,
    TagName::Schema,
    TagName::Element,
    TagName::Sequence,
    TagName::Choice,
    TagName::Group,
    TagName::SimpleType,
    TagName::ComplexType,
    TagName::Assert,
    TagName::Discriminator,
    TagName::DefineVariable,
    TagName::SetVariable,
];

impl TagName {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TagName::Schema => "schema",
            TagName::Element => "element",
            TagName::ElementRef => "element ref",
            TagName::Sequence => "sequence",
            TagName::Choice => "choice",
            TagName::Group => "group",
            TagName::GroupRef => "group ref",
            TagName::SimpleType => "simpleType",
            TagName::ComplexType => "complexType",
            TagName::Annotation => "annotation",
            TagName::Appinfo => "appinfo",
            TagName::Assert => "assert",
            TagName::Discriminator => "discriminator",
            TagName::DefineVariable => "defineVariable",
            TagName::SetVariable => "setVariable",
        }
    }

    /// The element name as written in markup, without any prefix.
    #[must_use]
    pub const fn local_name(self) -> &'static str {
        match self {
            TagName::ElementRef => "element",
            TagName::GroupRef => "group",
            other => other.as_str(),
        }
    }

    /// The `ref` pseudo-variant of this tag, if it has one.
    #[must_use]
    pub const fn reference_variant(self) -> Option<TagName> {
        match self {
            TagName::Element => Some(TagName::ElementRef),
            TagName::Group => Some(TagName::GroupRef),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_reference(self) -> bool {
        matches!(self, TagName::ElementRef | TagName::GroupRef)
    }

    /// Find the tag in `vocabulary` whose qualified name is `qualified_name`.
    #[must_use]
    pub fn find_qualified(
        vocabulary: &[TagName],
        prefix: &NamespacePrefix,
        qualified_name: &str,
    ) -> Option<TagName> {
        let local = qualified_name.strip_prefix(prefix.as_str())?;
        vocabulary
            .iter()
            .copied()
            .find(|tag| tag.local_name() == local)
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TagName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
