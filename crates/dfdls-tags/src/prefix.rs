use std::fmt;
use std::sync::LazyLock;

use dfdls_source::LineSource;
use dfdls_source::Position;
use regex::Regex;
use serde::Serialize;

/// Prefix assumed when no schema tag appears above the cursor.
pub const DEFAULT_PREFIX: &str = "xs";

static SCHEMA_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("</?(|[^ ]+:)schema").expect("schema prefix pattern is valid")
});

/// The namespace prefix applied to every tag comparison of one request.
///
/// Either empty or a prefix followed by `:`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NamespacePrefix(String);

impl NamespacePrefix {
    /// Build a prefix from `xs`, `xs:` or the empty string.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        let prefix = prefix.trim();
        if prefix.is_empty() || prefix.ends_with(':') {
            Self(prefix.to_string())
        } else {
            Self(format!("{prefix}:"))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `xs:` + `local`
    #[must_use]
    pub fn qualify(&self, local: &str) -> String {
        format!("{}{local}", self.0)
    }
}

impl Default for NamespacePrefix {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl fmt::Display for NamespacePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve the prefix in use at `position`, defaulting to `xs:`.
#[must_use]
pub fn resolve_prefix(document: &dyn LineSource, position: Position) -> NamespacePrefix {
    resolve_prefix_or(document, position, DEFAULT_PREFIX)
}

/// Resolve the prefix in use at `position` from the first schema tag found
/// scanning down from the top of the document to the cursor line.
///
/// Falls back to `default` when the cursor is on the first line or no
/// schema tag precedes it.
#[must_use]
pub fn resolve_prefix_or(
    document: &dyn LineSource,
    position: Position,
    default: &str,
) -> NamespacePrefix {
    let line_count = document.line_count();
    if position.line == 0 || line_count == 0 {
        return NamespacePrefix::new(default);
    }

    let last = position.line.min(line_count - 1);
    for line in 0..=last {
        if let Some(captures) = SCHEMA_PREFIX.captures(document.line_or_empty(line)) {
            let prefix = captures.get(1).map_or("", |m| m.as_str());
            tracing::trace!(line, prefix, "resolved namespace prefix");
            return NamespacePrefix::new(prefix);
        }
    }

    NamespacePrefix::new(default)
}
