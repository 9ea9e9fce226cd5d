//! ReqMind - document-grounded requirement analysis engine
//!
//! ReqMind turns a free-text requirement into a checklist of document
//! review tasks, then drives every task to a recorded outcome through an
//! external LLM capability. The engine is deterministic about control flow
//! even though the capability is not: retries are capped per item, stalled
//! items are force-skipped, and every loop carries a hard iteration bound.
//!
//! # Core Concepts
//!
//! - **One item at a time**: a single cursor walks the checklist; the
//!   capability only ever sees the current item
//! - **Outcomes over promises**: progress advances only when an outcome is
//!   recorded, by the capability or by the watchdog
//! - **Bounded everything**: 3 attempts per item, capped passes per loop -
//!   no run is unbounded
//! - **Request-scoped state**: each analysis owns its tracker and tool
//!   context; concurrent requests are isolated by construction
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait and OpenAI-compatible implementation
//! - [`ranking`] - BM25 ranking with the negative-IDF floor
//! - [`checklist`] - TODO text parsing into task items
//! - [`progress`] - the per-request checklist state machine
//! - [`r#loop`] - bounded loop contract and the per-item iteration engine
//! - [`planning`] - checklist generation with the critique/refine loop
//! - [`execution`] - markdown-checklist execution with work/judge/verify
//! - [`session`] - one analysis request end to end
//! - [`tools`] - document and progress tools exposed to the capability
//! - [`events`] - progress event stream

pub mod checklist;
pub mod cli;
pub mod config;
pub mod events;
pub mod execution;
pub mod llm;
pub mod planning;
pub mod progress;
pub mod prompts;
pub mod ranking;
pub mod session;
pub mod tools;

// Note: 'loop' is a reserved keyword, so we use r#loop
#[path = "loop/mod.rs"]
pub mod r#loop;

// Re-export commonly used types
pub use checklist::{TaskItem, parse_checklist};
pub use config::{AnalysisConfig, Config, LlmConfig, StorageConfig};
pub use events::{AnalysisEvent, EventBus, EventEmitter};
pub use execution::{ChecklistExecutor, ExecutionResult};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient, create_client};
pub use planning::{COMPLETION_PHRASE, ChecklistPlanner};
pub use progress::{Outcome, ProgressTracker};
pub use r#loop::{BoundedLoop, ExitHandle, ItemEngine, LoopConfig, LoopOutcome, Stage, StageState};
pub use ranking::{CorpusEntry, rank};
pub use session::{AnalysisReport, AnalysisSession};
pub use tools::{DocumentSource, SqliteDocumentSource, Tool, ToolContext, ToolExecutor, ToolProfile, ToolResult};
