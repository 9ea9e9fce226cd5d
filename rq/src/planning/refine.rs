//! Propose / critique / refine stages
//!
//! The refine loop instantiation of the bounded loop contract: propose
//! drafts a checklist once, critique reviews it and writes the agreement
//! marker into shared state when satisfied, refine exits the loop when it
//! observes the marker and rewrites the draft otherwise.

use std::sync::Arc;

use async_trait::async_trait;
use eyre::{Result, WrapErr};
use tracing::{debug, info};

use crate::llm::{CompletionRequest, LlmClient, Message};
use crate::prompts;
use crate::r#loop::{ExitHandle, Stage, StageState};
use crate::tools::conversation::{ConversationBudget, run_conversation};
use crate::tools::{ToolContext, ToolExecutor, ToolProfile};

use super::{COMPLETION_PHRASE, DRAFT_KEY, state_keys};

/// Draft the initial checklist, grounded via the document tools
///
/// Only runs when no draft exists yet; later passes leave the draft to the
/// refine stage.
pub struct ProposeStage {
    llm: Arc<dyn LlmClient>,
    ctx: ToolContext,
    budget: ConversationBudget,
}

impl ProposeStage {
    pub fn new(llm: Arc<dyn LlmClient>, ctx: ToolContext) -> Self {
        Self {
            llm,
            ctx,
            budget: ConversationBudget::default(),
        }
    }
}

#[async_trait]
impl Stage for ProposeStage {
    fn name(&self) -> &str {
        state_keys::PROPOSE
    }

    async fn run(&self, state: &mut StageState, _exit: &ExitHandle) -> Result<()> {
        if state.contains(DRAFT_KEY) {
            debug!("ProposeStage: draft already present, skipping");
            return Ok(());
        }

        let requirement = state.get(state_keys::REQUIREMENT).unwrap_or_default().to_string();
        info!("Drafting checklist for requirement");

        let executor = ToolExecutor::with_profile(ToolProfile::Planner);
        let draft = run_conversation(
            &self.llm,
            prompts::PLANNER_SYSTEM_PROMPT,
            &requirement,
            &executor,
            &self.ctx,
            self.budget,
        )
        .await?;

        state.set(DRAFT_KEY, draft);
        Ok(())
    }
}

/// Review the draft; writes the agreement marker when the plan is acceptable
pub struct CritiqueStage {
    llm: Arc<dyn LlmClient>,
    max_tokens: u32,
}

impl CritiqueStage {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            max_tokens: ConversationBudget::default().max_tokens,
        }
    }
}

#[async_trait]
impl Stage for CritiqueStage {
    fn name(&self) -> &str {
        state_keys::CRITIQUE
    }

    async fn run(&self, state: &mut StageState, _exit: &ExitHandle) -> Result<()> {
        let requirement = state.get(state_keys::REQUIREMENT).unwrap_or_default();
        let draft = state.get(DRAFT_KEY).unwrap_or_default();

        let system_prompt = prompts::render(
            prompts::CRITIC_SYSTEM_PROMPT,
            &[("completion_phrase", COMPLETION_PHRASE)],
        )?;
        let instruction = prompts::render(
            prompts::CRITIC_INSTRUCTION_TEMPLATE,
            &[("requirement", requirement), ("draft", draft)],
        )?;

        let request = CompletionRequest {
            system_prompt,
            messages: vec![Message::user(instruction)],
            tools: vec![],
            max_tokens: self.max_tokens,
        };
        let response = self.llm.complete(request).await.wrap_err("Critique invocation faulted")?;

        let criticism = response.content.unwrap_or_default();
        debug!(agreed = criticism.contains(COMPLETION_PHRASE), "CritiqueStage: review complete");
        state.set(state_keys::CRITICISM, criticism);
        Ok(())
    }
}

/// Exit on the agreement marker, otherwise rewrite the draft
pub struct RefineStage {
    llm: Arc<dyn LlmClient>,
    max_tokens: u32,
}

impl RefineStage {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            max_tokens: ConversationBudget::default().max_tokens,
        }
    }
}

#[async_trait]
impl Stage for RefineStage {
    fn name(&self) -> &str {
        state_keys::REFINE
    }

    async fn run(&self, state: &mut StageState, exit: &ExitHandle) -> Result<()> {
        let criticism = state.get(state_keys::CRITICISM).unwrap_or_default().to_string();

        if criticism.contains(COMPLETION_PHRASE) {
            info!("Plan agreed, exiting refine loop");
            exit.request_exit();
            return Ok(());
        }

        let requirement = state.get(state_keys::REQUIREMENT).unwrap_or_default();
        let draft = state.get(DRAFT_KEY).unwrap_or_default();
        let instruction = prompts::render(
            prompts::REFINER_INSTRUCTION_TEMPLATE,
            &[("requirement", requirement), ("criticism", &criticism), ("draft", draft)],
        )?;

        let request = CompletionRequest {
            system_prompt: prompts::REFINER_SYSTEM_PROMPT.to_string(),
            messages: vec![Message::user(instruction)],
            tools: vec![],
            max_tokens: self.max_tokens,
        };
        let response = self.llm.complete(request).await.wrap_err("Refine invocation faulted")?;

        if let Some(revised) = response.content {
            state.set(DRAFT_KEY, revised);
        }
        Ok(())
    }
}
