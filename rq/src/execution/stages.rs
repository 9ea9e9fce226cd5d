//! Work / judge / verify stages
//!
//! The execute loop instantiation of the bounded loop contract. The
//! checklist lives as markdown in shared state: work performs the first
//! unchecked item, judge rewrites the checklist with the result, verify
//! exits once nothing is left unchecked.

use std::sync::Arc;

use async_trait::async_trait;
use eyre::{Result, WrapErr};
use tracing::{debug, info};

use crate::llm::{CompletionRequest, LlmClient, Message};
use crate::prompts;
use crate::r#loop::{ExitHandle, Stage, StageState};
use crate::tools::conversation::{ConversationBudget, run_conversation};
use crate::tools::{ToolContext, ToolExecutor, ToolProfile};

use super::{CHECKLIST_KEY, state_keys};

/// Marker of a still-unchecked checklist item
const UNCHECKED_MARKER: &str = "[ ]";

/// Perform the first unchecked checklist item
pub struct WorkStage {
    llm: Arc<dyn LlmClient>,
    ctx: ToolContext,
    budget: ConversationBudget,
}

impl WorkStage {
    pub fn new(llm: Arc<dyn LlmClient>, ctx: ToolContext) -> Self {
        Self {
            llm,
            ctx,
            budget: ConversationBudget::default(),
        }
    }
}

#[async_trait]
impl Stage for WorkStage {
    fn name(&self) -> &str {
        state_keys::WORK
    }

    async fn run(&self, state: &mut StageState, _exit: &ExitHandle) -> Result<()> {
        let checklist = state.get(CHECKLIST_KEY).unwrap_or_default();
        let instruction = prompts::render(prompts::WORKER_INSTRUCTION_TEMPLATE, &[("checklist", checklist)])?;

        let executor = ToolExecutor::with_profile(ToolProfile::Planner);
        let report = run_conversation(
            &self.llm,
            prompts::WORKER_SYSTEM_PROMPT,
            &instruction,
            &executor,
            &self.ctx,
            self.budget,
        )
        .await?;

        debug!(report_len = report.len(), "WorkStage: worker reported");
        state.set(state_keys::REPORT, report);
        Ok(())
    }
}

/// Judge the worker's report and rewrite the checklist
pub struct JudgeStage {
    llm: Arc<dyn LlmClient>,
    max_tokens: u32,
}

impl JudgeStage {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            max_tokens: ConversationBudget::default().max_tokens,
        }
    }
}

#[async_trait]
impl Stage for JudgeStage {
    fn name(&self) -> &str {
        state_keys::JUDGE
    }

    async fn run(&self, state: &mut StageState, _exit: &ExitHandle) -> Result<()> {
        let checklist = state.get(CHECKLIST_KEY).unwrap_or_default();
        let report = state.get(state_keys::REPORT).unwrap_or_default();

        let instruction = prompts::render(
            prompts::JUDGE_INSTRUCTION_TEMPLATE,
            &[("checklist", checklist), ("report", report)],
        )?;

        let request = CompletionRequest {
            system_prompt: prompts::JUDGE_SYSTEM_PROMPT.to_string(),
            messages: vec![Message::user(instruction)],
            tools: vec![],
            max_tokens: self.max_tokens,
        };
        let response = self.llm.complete(request).await.wrap_err("Judge invocation faulted")?;

        // The judge's output replaces the stored checklist verbatim
        if let Some(updated) = response.content {
            state.set(CHECKLIST_KEY, updated);
        }
        Ok(())
    }
}

/// Exit the loop once every item is checked
pub struct VerifyStage;

#[async_trait]
impl Stage for VerifyStage {
    fn name(&self) -> &str {
        state_keys::VERIFY
    }

    async fn run(&self, state: &mut StageState, exit: &ExitHandle) -> Result<()> {
        let checklist = state.get(CHECKLIST_KEY).unwrap_or_default();

        if !checklist.contains(UNCHECKED_MARKER) {
            info!("All checklist items checked, exiting execute loop");
            exit.request_exit();
        }
        Ok(())
    }
}
