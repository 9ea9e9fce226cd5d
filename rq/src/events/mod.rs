//! Analysis event streaming
//!
//! The session emits human-readable progress events at checklist
//! generation, per-item start/retry/forced-skip/completion, and summary
//! boundaries. Consumers subscribe through the EventBus.

mod bus;
mod types;

pub use bus::{DEFAULT_CHANNEL_CAPACITY, EventBus, EventEmitter};
pub use types::{AnalysisEvent, EventLogEntry};
