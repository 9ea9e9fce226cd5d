//! Checklist planning
//!
//! Generates the TODO checklist for a requirement: a propose stage drafts
//! it grounded in the document corpus, then a bounded critique/refine loop
//! polishes it until the critic agrees or the pass cap is reached.

mod refine;

pub use refine::{CritiqueStage, ProposeStage, RefineStage};

use std::sync::Arc;

use eyre::Result;
use tracing::{debug, info};

use crate::llm::LlmClient;
use crate::r#loop::{BoundedLoop, StageState};
use crate::tools::ToolContext;

/// Agreement marker the critic emits when the plan passes review
pub const COMPLETION_PHRASE: &str = "PLAN_APPROVED";

/// Shared-state key holding the checklist draft
pub const DRAFT_KEY: &str = "draft";

/// Shared-state keys and stage names used by the refine loop
pub(crate) mod state_keys {
    pub const REQUIREMENT: &str = "requirement";
    pub const CRITICISM: &str = "criticism";

    pub const PROPOSE: &str = "propose";
    pub const CRITIQUE: &str = "critique";
    pub const REFINE: &str = "refine";
}

/// Generates and refines a checklist for a requirement
pub struct ChecklistPlanner {
    llm: Arc<dyn LlmClient>,
    tool_ctx: ToolContext,
    max_passes: u32,
}

impl ChecklistPlanner {
    /// Create a planner; `max_passes` caps the critique/refine loop
    pub fn new(llm: Arc<dyn LlmClient>, tool_ctx: ToolContext, max_passes: u32) -> Self {
        Self {
            llm,
            tool_ctx,
            max_passes,
        }
    }

    /// Produce the raw checklist text for a requirement
    pub async fn generate(&self, requirement: &str) -> Result<String> {
        info!(max_passes = self.max_passes, "Generating checklist");

        let mut state = StageState::with_value(state_keys::REQUIREMENT, requirement);

        let refine_loop = BoundedLoop::new(
            vec![
                Box::new(ProposeStage::new(self.llm.clone(), self.tool_ctx.clone())),
                Box::new(CritiqueStage::new(self.llm.clone())),
                Box::new(RefineStage::new(self.llm.clone())),
            ],
            self.max_passes,
            state_keys::REFINE,
        );

        let outcome = refine_loop.run(&mut state).await?;
        debug!(?outcome, "ChecklistPlanner::generate: refine loop finished");

        Ok(state.get(DRAFT_KEY).unwrap_or_default().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::MockLlmClient;
    use crate::llm::CompletionResponse;
    use crate::progress::ProgressTracker;
    use crate::tools::source::mock::MockDocumentSource;
    use tokio::sync::Mutex;

    fn tool_ctx() -> ToolContext {
        ToolContext::new(
            "plan-test",
            Arc::new(Mutex::new(ProgressTracker::new("req"))),
            Arc::new(MockDocumentSource::with_documents(vec![(
                "3.進貨管理模組",
                "3.1入庫單維護",
                "# 入庫單",
            )])),
        )
    }

    const DRAFT: &str = "TODO\n- [ ] 查閱「3.1入庫單維護」| 了解欄位";

    #[tokio::test]
    async fn test_agreed_plan_exits_on_first_pass() {
        // propose drafts, critique agrees, refine exits
        let llm = Arc::new(MockLlmClient::with_responses(vec![
            CompletionResponse::text(DRAFT),
            CompletionResponse::text(COMPLETION_PHRASE),
        ]));

        let planner = ChecklistPlanner::new(llm.clone(), tool_ctx(), 3);
        let checklist = planner.generate("加入品質檢驗功能").await.unwrap();

        assert_eq!(checklist, DRAFT);
        assert_eq!(llm.call_count(), 2, "refine must not call the LLM once agreed");
    }

    #[tokio::test]
    async fn test_criticism_triggers_rewrite_then_exit() {
        let revised = "TODO\n- [ ] 查閱「3.1入庫單維護」| 了解欄位\n- [ ] 查閱「3.2入庫驗收作業」| 驗收邏輯";
        let llm = Arc::new(MockLlmClient::with_responses(vec![
            CompletionResponse::text(DRAFT),                // propose
            CompletionResponse::text("missing the inspection step"), // critique pass 1
            CompletionResponse::text(revised),              // refine rewrites
            CompletionResponse::text(COMPLETION_PHRASE),    // critique pass 2 agrees
        ]));

        let planner = ChecklistPlanner::new(llm.clone(), tool_ctx(), 3);
        let checklist = planner.generate("加入品質檢驗功能").await.unwrap();

        assert_eq!(checklist, revised);
        assert_eq!(llm.call_count(), 4);
    }

    #[tokio::test]
    async fn test_pass_cap_bounds_refinement() {
        // The critic never agrees; the loop must stop at the cap with the
        // latest draft
        let llm = Arc::new(MockLlmClient::with_responses(vec![
            CompletionResponse::text(DRAFT),       // propose
            CompletionResponse::text("nope 1"),    // critique 1
            CompletionResponse::text("draft v2"),  // refine 1
            CompletionResponse::text("nope 2"),    // critique 2
            CompletionResponse::text("draft v3"),  // refine 2
        ]));

        let planner = ChecklistPlanner::new(llm.clone(), tool_ctx(), 2);
        let checklist = planner.generate("req").await.unwrap();

        assert_eq!(checklist, "draft v3");
        assert_eq!(llm.call_count(), 5);
    }
}
