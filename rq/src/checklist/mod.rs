//! Checklist types and parsing
//!
//! A checklist is the ordered plan the engine executes: one TaskItem per
//! checkbox line of the generated TODO text.

mod parser;

pub use parser::parse_checklist;

/// A single checklist item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    /// What to do, e.g. a document to review
    pub description: String,

    /// Why, or what to look for
    pub note: String,

    /// Flipped exactly once by the progress tracker, never reverted
    pub done: bool,
}

impl TaskItem {
    /// Create a pending item
    pub fn new(description: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            note: note.into(),
            done: false,
        }
    }
}
