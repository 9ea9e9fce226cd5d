//! Checklist execution over the bounded loop
//!
//! The markdown-checklist execution flow: the worker performs one step per
//! pass, a judge audits the report and rewrites the checklist, and the
//! verifier ends the loop once every item is checked off. The pass cap
//! bounds the loop when the checklist never converges.

mod stages;

pub use stages::{JudgeStage, VerifyStage, WorkStage};

use std::sync::Arc;

use eyre::Result;
use tracing::info;

use crate::llm::LlmClient;
use crate::r#loop::{BoundedLoop, LoopOutcome, StageState};
use crate::tools::ToolContext;

/// Shared-state key holding the markdown checklist
pub const CHECKLIST_KEY: &str = "checklist";

/// Shared-state keys and stage names used by the execute loop
pub(crate) mod state_keys {
    pub const REPORT: &str = "report";

    pub const WORK: &str = "work";
    pub const JUDGE: &str = "judge";
    pub const VERIFY: &str = "verify";
}

/// Result of a checklist execution run
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Final state of the markdown checklist
    pub checklist: String,
    /// How the loop ended
    pub outcome: LoopOutcome,
}

/// Drives a markdown checklist through the work/judge/verify loop
pub struct ChecklistExecutor {
    llm: Arc<dyn LlmClient>,
    tool_ctx: ToolContext,
    max_passes: u32,
}

impl ChecklistExecutor {
    /// Create an executor; `max_passes` caps the loop
    pub fn new(llm: Arc<dyn LlmClient>, tool_ctx: ToolContext, max_passes: u32) -> Self {
        Self {
            llm,
            tool_ctx,
            max_passes,
        }
    }

    /// Execute the checklist; returns its final state and how the loop ended
    pub async fn run(&self, checklist: &str) -> Result<ExecutionResult> {
        info!(max_passes = self.max_passes, "Executing checklist");

        let mut state = StageState::with_value(CHECKLIST_KEY, checklist);

        let execute_loop = BoundedLoop::new(
            vec![
                Box::new(WorkStage::new(self.llm.clone(), self.tool_ctx.clone())),
                Box::new(JudgeStage::new(self.llm.clone())),
                Box::new(VerifyStage),
            ],
            self.max_passes,
            state_keys::VERIFY,
        );

        let outcome = execute_loop.run(&mut state).await?;

        Ok(ExecutionResult {
            checklist: state.get(CHECKLIST_KEY).unwrap_or_default().to_string(),
            outcome,
        })
    }
}
