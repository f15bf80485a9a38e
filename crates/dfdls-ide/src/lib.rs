//! Editor features for DFDL schemas
//!
//! Completion assembly on top of the lexical tag resolver: element
//! completion, auto-close edits and snippet text, plus the edit port that
//! hosts implement to apply them.

pub mod close_element;
pub mod completions;
pub mod context;
pub mod edits;
pub mod snippets;

pub use close_element::close_element;
pub use completions::child_items;
pub use completions::element_completions;
pub use completions::ChildItem;
pub use completions::CompletionItem;
pub use context::defined_variables;
pub use context::find_enclosing_tag;
pub use context::is_brace_open;
pub use context::CursorContext;
pub use edits::EditSink;
pub use edits::SnippetEdit;
pub use snippets::render_snippet;
