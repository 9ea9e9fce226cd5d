//! Tool system for capability invocations
//!
//! Tools are how the external capability reads the document corpus and
//! reports outcomes. Each analysis request gets a `ToolContext` scoped to
//! its own progress tracker and document source - tools cannot reach any
//! other request's state.

mod context;
pub mod conversation;
mod error;
mod executor;
pub mod source;
mod traits;

pub mod builtin;

pub use context::{DEFAULT_SEARCH_TOP_N, ToolContext};
pub use error::ToolError;
pub use executor::{ToolExecutor, ToolProfile};
pub use source::{DocumentSource, SqliteDocumentSource};
pub use traits::{Tool, ToolResult};
