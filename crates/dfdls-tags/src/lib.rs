//! Lexical tag-context resolution for DFDL/XSD schema markup.
//!
//! Every routine here works from raw line text and a cursor position, with
//! no parse tree. Documents are expected to be incomplete while the user is
//! typing, so nothing in this crate fails: a search that finds nothing
//! returns `None`, and out-of-range lines or columns read as empty text.

mod balance;
mod between;
mod close;
mod density;
mod lines;
mod nearest;
mod open;
mod prefix;
pub mod scanner;
mod vocabulary;

pub use balance::check_missing_close_tag;
pub use between::is_between_open;
pub use between::is_between_open_close_tags;
pub use close::close_tag;
pub use density::items_on_line;
pub use density::Density;
pub use lines::DocumentLines;
pub use nearest::nearest_tag;
pub use nearest::TagLocation;
pub use open::check_tag_open;
pub use open::nearest_open;
pub use prefix::resolve_prefix;
pub use prefix::resolve_prefix_or;
pub use prefix::NamespacePrefix;
pub use prefix::DEFAULT_PREFIX;
pub use vocabulary::TagName;
pub use vocabulary::BALANCE_ORDER;
pub use vocabulary::OPEN_PRIORITY;
pub use vocabulary::STRUCTURAL_TAGS;
