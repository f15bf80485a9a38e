use dfdls_source::LineSource;
use dfdls_source::Position;

use crate::scanner::cursor_column;
use crate::scanner::Construct;
use crate::scanner::ConstructKind;
use crate::DocumentLines;
use crate::NamespacePrefix;
use crate::TagName;
use crate::BALANCE_ORDER;

/// Open and close counts of one tag name. Self-closing tags count as
/// neither.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Tally {
    opens: usize,
    closes: usize,
}

impl Tally {
    fn add_line<'a>(&mut self, constructs: impl Iterator<Item = Construct<'a>>, qualified: &str) {
        for construct in constructs.filter(|construct| construct.name == qualified) {
            match construct.kind {
                ConstructKind::Open => self.opens += 1,
                ConstructKind::Close => self.closes += 1,
                ConstructKind::SelfClosing | ConstructKind::Comment => {}
            }
        }
    }

    fn is_unmatched(self) -> bool {
        self.opens > self.closes
    }
}

/// Report the first tag in [`BALANCE_ORDER`] that is opened more often than
/// it is closed around the cursor.
///
/// When the cursor line is dense only that line is counted, and only tags
/// opened on it before the cursor are candidates. Otherwise a tag is a
/// candidate when a sparse line at or above the cursor opens it, and its
/// opens and closes are counted over every sparse line of the document.
/// Markup inside comments, including multi-line ones, is never counted.
#[must_use]
pub fn check_missing_close_tag(
    document: &dyn LineSource,
    position: Position,
    prefix: &NamespacePrefix,
) -> Option<TagName> {
    let lines = DocumentLines::new(document);
    let text = lines.text(position.line);
    let unmatched = if lines.density(position.line).is_dense() {
        let cursor = cursor_column(text, position.character);
        BALANCE_ORDER.iter().copied().find(|tag| {
            let qualified = prefix.qualify(tag.local_name());
            let opened_before_cursor = lines.scan(position.line).any(|construct| {
                construct.is_opening() && construct.name == qualified && construct.start < cursor
            });
            if !opened_before_cursor {
                return false;
            }
            let mut tally = Tally::default();
            tally.add_line(lines.scan(position.line), &qualified);
            tally.is_unmatched()
        })
    } else {
        BALANCE_ORDER.iter().copied().find(|tag| {
            let qualified = prefix.qualify(tag.local_name());
            if !opened_at_or_above(&lines, position.line, &qualified) {
                return false;
            }
            let mut tally = Tally::default();
            for line in 0..lines.line_count() {
                if !lines.density(line).is_dense() {
                    tally.add_line(lines.scan(line), &qualified);
                }
            }
            tally.is_unmatched()
        })
    };

    tracing::debug!(
        line = position.line,
        character = position.character,
        unmatched = ?unmatched,
        "balance check"
    );
    unmatched
}

fn opened_at_or_above(lines: &DocumentLines<'_>, line: u32, qualified: &str) -> bool {
    let last = line.min(lines.line_count().saturating_sub(1));
    (0..=last).rev().any(|line| {
        !lines.density(line).is_dense()
            && lines
                .scan(line)
                .any(|construct| construct.is_opening() && construct.name == qualified)
    })
}
