//! Loop machinery
//!
//! `bounded` is the reusable repeat-until-exit-or-cap contract; `engine`
//! is the per-item iteration controller that drives a checklist through the
//! external capability with retry and stall recovery.

mod bounded;
mod config;
mod engine;

pub use bounded::{BoundedLoop, ExitHandle, LoopOutcome, Stage, StageState};
pub use config::LoopConfig;
pub use engine::{ItemEngine, STALL_RATIONALE};
