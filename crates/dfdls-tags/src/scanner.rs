//! Single-line lexical scanner for tag-like constructs.
//!
//! The scanner is a small state machine over one line of text. It never
//! looks at neighbouring lines and never fails: a tag or comment still open
//! at the end of the line comes back unterminated. A comment left open by an
//! earlier line is resumed with [`LineScanner::resume`].

use serde::Serialize;

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";
const CLOSE_TAG_START: &str = "</";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    InOpenTag { quote: Option<u8> },
    InCloseTag,
    InComment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructKind {
    /// `<name ...>`
    Open,
    /// `<name .../>`
    SelfClosing,
    /// `</name>`
    Close,
    /// `<!-- ... -->`
    Comment,
}

/// A tag-like construct found on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Construct<'a> {
    pub kind: ConstructKind,
    /// Qualified name as written, e.g. `xs:element`. Empty for comments.
    pub name: &'a str,
    /// Byte offset of the leading `<`.
    pub start: usize,
    /// Byte offset of the terminating `>`, if the construct ends on this line.
    pub end: Option<usize>,
    /// Byte offset just past the last byte the construct owns.
    pub extent: usize,
}

impl Construct<'_> {
    /// Open and self-closing tags.
    #[must_use]
    pub fn is_opening(&self) -> bool {
        matches!(self.kind, ConstructKind::Open | ConstructKind::SelfClosing)
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.end.is_some()
    }

    /// A `<!--` still open at the end of its line.
    #[must_use]
    pub fn is_open_comment(&self) -> bool {
        self.kind == ConstructKind::Comment && !self.is_terminated()
    }

    /// Whether a cursor at byte column `cursor` sits inside this construct,
    /// after its `<` and at or before its `>`.
    #[must_use]
    pub fn contains_cursor(&self, cursor: usize) -> bool {
        cursor > self.start && cursor <= self.end.unwrap_or(self.extent)
    }

    /// Last byte column considered part of the tag: its `>`, or where the
    /// scanner left it when unterminated.
    #[must_use]
    pub fn last_column(&self) -> usize {
        self.end.unwrap_or(self.extent)
    }
}

/// Iterator over the constructs of one line, left to right.
pub struct LineScanner<'a> {
    text: &'a str,
    current: usize,
    in_comment: bool,
}

impl<'a> LineScanner<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self::resume(text, false)
    }

    /// Scan `text`, starting inside a comment when `in_comment` is set. The
    /// text up to the first `-->` then comes back as a comment at column 0.
    #[must_use]
    pub fn resume(text: &'a str, in_comment: bool) -> Self {
        Self {
            text,
            current: 0,
            in_comment,
        }
    }

    fn read_name(&self, from: usize) -> &'a str {
        let rest = &self.text[from..];
        let len = rest
            .bytes()
            .position(|b| b.is_ascii_whitespace() || matches!(b, b'>' | b'/' | b'<' | b'"' | b'\'' | b'='))
            .unwrap_or(rest.len());
        &rest[..len]
    }
}

impl<'a> Iterator for LineScanner<'a> {
    type Item = Construct<'a>;

    fn next(&mut self) -> Option<Construct<'a>> {
        let bytes = self.text.as_bytes();
        let mut state = if std::mem::take(&mut self.in_comment) {
            State::InComment
        } else {
            State::Outside
        };
        let mut start = self.current;
        let mut name = "";

        while self.current < bytes.len() {
            let i = self.current;
            let b = bytes[i];

            match state {
                State::Outside => {
                    if b == b'<' {
                        start = i;
                        let rest = &self.text[i..];
                        if rest.starts_with(COMMENT_START) {
                            state = State::InComment;
                            self.current = i + COMMENT_START.len();
                        } else if rest.starts_with(CLOSE_TAG_START) {
                            name = self.read_name(i + CLOSE_TAG_START.len());
                            state = State::InCloseTag;
                            self.current = i + CLOSE_TAG_START.len() + name.len();
                        } else {
                            name = self.read_name(i + 1);
                            state = State::InOpenTag { quote: None };
                            self.current = i + 1 + name.len();
                        }
                        continue;
                    }
                }
                State::InComment => {
                    if self.text[i..].starts_with(COMMENT_END) {
                        let end = i + COMMENT_END.len() - 1;
                        self.current = end + 1;
                        return Some(Construct {
                            kind: ConstructKind::Comment,
                            name: "",
                            start,
                            end: Some(end),
                            extent: end + 1,
                        });
                    }
                }
                State::InOpenTag { quote: Some(q) } => {
                    if b == q {
                        state = State::InOpenTag { quote: None };
                    }
                }
                State::InOpenTag { quote: None } => match b {
                    b'"' | b'\'' => state = State::InOpenTag { quote: Some(b) },
                    b'>' => {
                        self.current = i + 1;
                        let kind = if i > start + 1 && bytes[i - 1] == b'/' {
                            ConstructKind::SelfClosing
                        } else {
                            ConstructKind::Open
                        };
                        return Some(Construct {
                            kind,
                            name,
                            start,
                            end: Some(i),
                            extent: i + 1,
                        });
                    }
                    // A new tag starts before this one ended; leave the `<`
                    // for the next call.
                    b'<' => {
                        return Some(Construct {
                            kind: ConstructKind::Open,
                            name,
                            start,
                            end: None,
                            extent: i,
                        });
                    }
                    _ => {}
                },
                State::InCloseTag => match b {
                    b'>' => {
                        self.current = i + 1;
                        return Some(Construct {
                            kind: ConstructKind::Close,
                            name,
                            start,
                            end: Some(i),
                            extent: i + 1,
                        });
                    }
                    b'<' => {
                        return Some(Construct {
                            kind: ConstructKind::Close,
                            name,
                            start,
                            end: None,
                            extent: i,
                        });
                    }
                    _ => {}
                },
            }

            self.current += 1;
        }

        let kind = match state {
            State::Outside => return None,
            State::InOpenTag { .. } => ConstructKind::Open,
            State::InCloseTag => ConstructKind::Close,
            State::InComment => ConstructKind::Comment,
        };

        Some(Construct {
            kind,
            name,
            start,
            end: None,
            extent: bytes.len(),
        })
    }
}

/// Scan `text` for tag-like constructs.
#[must_use]
pub fn scan(text: &str) -> LineScanner<'_> {
    LineScanner::new(text)
}

/// Clamp a cursor column to `text`, landing on a char boundary.
#[must_use]
pub fn cursor_column(text: &str, character: u32) -> usize {
    let mut column = (character as usize).min(text.len());
    while !text.is_char_boundary(column) {
        column -= 1;
    }
    column
}
