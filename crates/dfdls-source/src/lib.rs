mod document;
mod error;
mod position;

pub use document::LineIndex;
pub use document::LineSource;
pub use document::TextDocument;
pub use error::SourceError;
pub use position::Position;
pub use position::Range;
