//! LSP snippet text: generation for completion items and auto-close edits,
//! and rendering to plain text for hosts without snippet support.

use dfdls_tags::NamespacePrefix;
use dfdls_tags::TagName;

use crate::completions::ChildItem;

const DFDL_SOURCE: &str = "http://www.ogf.org/dfdl/";
const BUILTIN_TYPES: &[&str] = &["string", "int", "decimal", "boolean", "hexBinary", "dateTime"];

/// Replacement for a typed `>` when the unmatched tag opened on an earlier
/// line or the typed tag shares its line with others.
#[must_use]
pub fn generate_inline_close(prefix: &NamespacePrefix, tag: TagName) -> String {
    format!("></{}>$0", prefix.qualify(tag.local_name()))
}

/// Close a variable tag right after its `>`, cursor in between.
#[must_use]
pub fn generate_variable_close(prefix: &NamespacePrefix, tag: TagName) -> String {
    format!(">$0</{}>", prefix.qualify(tag.local_name()))
}

/// Turn a reference tag into a self-closing one.
#[must_use]
pub fn generate_self_close() -> String {
    String::from(" />\n$0")
}

/// Close a container tag on its own line, cursor on an indented line between.
#[must_use]
pub fn generate_block_close(prefix: &NamespacePrefix, tag: TagName, indent: &str) -> String {
    format!(
        ">\n{indent}\t$0\n{indent}</{}>",
        prefix.qualify(tag.local_name())
    )
}

/// Generate the snippet a completion item inserts.
#[must_use]
pub fn generate_snippet_for_item(
    item: ChildItem,
    prefix: &NamespacePrefix,
    variables: &[String],
) -> String {
    let p = prefix.as_str();
    match item {
        ChildItem::Element => format!("<{p}element name=\"${{1:name}}\">\n\t$0\n</{p}element>"),
        ChildItem::ElementRef => format!("<{p}element ref=\"${{1:name}}\"/>$0"),
        ChildItem::Sequence => container(p, "sequence"),
        ChildItem::Choice => container(p, "choice"),
        ChildItem::Group => format!("<{p}group name=\"${{1:name}}\">\n\t$0\n</{p}group>"),
        ChildItem::GroupRef => format!("<{p}group ref=\"${{1:name}}\"/>$0"),
        ChildItem::ComplexType => container(p, "complexType"),
        ChildItem::SimpleType => container(p, "simpleType"),
        ChildItem::Restriction => {
            let types: Vec<String> = BUILTIN_TYPES.iter().map(|t| format!("{p}{t}")).collect();
            format!("<{p}restriction base=\"{}\"/>$0", choice(1, &types))
        }
        ChildItem::Annotation => format!(
            "<{p}annotation>\n\t<{p}appinfo source=\"{DFDL_SOURCE}\">\n\t\t$0\n\t</{p}appinfo>\n</{p}annotation>"
        ),
        ChildItem::Appinfo => {
            format!("<{p}appinfo source=\"{DFDL_SOURCE}\">\n\t$0\n</{p}appinfo>")
        }
        ChildItem::Assert => String::from(
            "<dfdl:assert testKind=\"${1|expression,pattern|}\" test=\"{ $2 }\" message=\"$3\"/>$0",
        ),
        ChildItem::Discriminator => String::from("<dfdl:discriminator test=\"{ $1 }\"/>$0"),
        ChildItem::DefineVariable => {
            let types: Vec<String> = BUILTIN_TYPES.iter().map(|t| format!("{p}{t}")).collect();
            format!(
                "<dfdl:defineVariable name=\"${{1:name}}\" type=\"{}\"/>$0",
                choice(2, &types)
            )
        }
        ChildItem::SetVariable => {
            let reference = if variables.is_empty() {
                String::from("${1:name}")
            } else {
                choice(1, variables)
            };
            format!("<dfdl:setVariable ref=\"{reference}\" value=\"$2\"/>$0")
        }
    }
}

fn container(prefix: &str, local: &str) -> String {
    format!("<{prefix}{local}>\n\t$0\n</{prefix}{local}>")
}

/// `${n|a,b,c|}`, escaping the characters choice syntax reserves.
fn choice(tabstop: u32, values: &[String]) -> String {
    let escaped: Vec<String> = values
        .iter()
        .map(|value| {
            let mut out = String::with_capacity(value.len());
            for c in value.chars() {
                if matches!(c, '\\' | ',' | '|' | '$' | '}') {
                    out.push('\\');
                }
                out.push(c);
            }
            out
        })
        .collect();
    format!("${{{tabstop}|{}|}}", escaped.join(","))
}

/// Render snippet syntax to the text an editor would show before the user
/// edits any field: placeholders become their default text, choices their
/// first option, and tab stops disappear.
#[must_use]
pub fn render_snippet(snippet: &str) -> String {
    SnippetRenderer::new(snippet).render(None)
}

struct SnippetRenderer<'a> {
    source: &'a str,
    current: usize,
}

impl<'a> SnippetRenderer<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, current: 0 }
    }

    fn render(&mut self, terminator: Option<char>) -> String {
        let mut out = String::new();

        while let Some(c) = self.consume() {
            match c {
                _ if Some(c) == terminator => break,
                '\\' => {
                    if let Some(escaped) = self.consume() {
                        out.push(escaped);
                    }
                }
                '$' => self.render_field(&mut out),
                _ => out.push(c),
            }
        }

        out
    }

    fn render_field(&mut self, out: &mut String) {
        match self.peek() {
            Some(c) if c.is_ascii_digit() => self.consume_digits(),
            Some('{') => {
                self.consume();
                self.consume_digits();
                match self.consume() {
                    Some(':') => out.push_str(&self.render(Some('}'))),
                    Some('|') => out.push_str(&self.render_choice()),
                    _ => {}
                }
            }
            _ => out.push('$'),
        }
    }

    /// Keep the first option of `a,b|}` and skip the rest.
    fn render_choice(&mut self) -> String {
        let mut first = String::new();
        let mut in_first = true;

        while let Some(c) = self.consume() {
            match c {
                '\\' => {
                    if let Some(escaped) = self.consume() {
                        if in_first {
                            first.push(escaped);
                        }
                    }
                }
                '|' if self.peek() == Some('}') => {
                    self.consume();
                    break;
                }
                ',' => in_first = false,
                _ if in_first => first.push(c),
                _ => {}
            }
        }

        first
    }

    fn consume_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.consume();
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.current..].chars().next()
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.current += c.len_utf8();
        Some(c)
    }
}
