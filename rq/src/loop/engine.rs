//! ItemEngine - drives one checklist to completion
//!
//! For each pending item the engine invokes the external capability with a
//! fresh instruction, retrying faulted invocations up to the attempt cap.
//! A hard fault on the final attempt aborts the whole run: the capability
//! itself is broken. An invocation that completes without reporting an
//! outcome is mere non-cooperation: the watchdog records a forced-skip
//! outcome and moves on, so total work is bounded by
//! `items * max_attempts` invocations.

use std::sync::Arc;

use eyre::Result;
use tracing::{debug, info, warn};

use crate::events::EventEmitter;
use crate::llm::{
    CompletionRequest, CompletionResponse, ContentBlock, LlmClient, LlmError, Message, StopReason,
};
use crate::progress::Outcome;
use crate::prompts;
use crate::tools::{ToolContext, ToolError, ToolExecutor, ToolProfile, ToolResult};

use super::LoopConfig;

/// Rationale recorded on a forced skip
pub const STALL_RATIONALE: &str = "execution failed or produced no result";

/// Placeholder for the first item's "previous item" slot
const NO_PREVIOUS_ITEM: &str = "none (this is the first item)";

/// Why a single capability invocation failed
enum InvocationFault {
    /// The capability faulted; retried up to the attempt cap
    Execution(LlmError),
    /// The document store is unusable; aborts immediately, no retry
    Store(ToolError),
}

/// Per-item iteration engine
pub struct ItemEngine {
    session_id: String,
    config: LoopConfig,
    llm: Arc<dyn LlmClient>,
    tool_executor: ToolExecutor,
    tool_ctx: ToolContext,
    emitter: Option<EventEmitter>,
}

impl ItemEngine {
    /// Create a new engine over a seeded tool context
    pub fn new(config: LoopConfig, llm: Arc<dyn LlmClient>, tool_ctx: ToolContext) -> Self {
        let session_id = tool_ctx.session_id.clone();
        debug!(%session_id, "ItemEngine::new: called");
        Self {
            session_id,
            config,
            llm,
            tool_executor: ToolExecutor::with_profile(ToolProfile::Processor),
            tool_ctx,
            emitter: None,
        }
    }

    /// Attach a progress event emitter
    pub fn with_emitter(mut self, emitter: EventEmitter) -> Self {
        self.emitter = Some(emitter);
        self
    }

    /// Drive the checklist to completion
    ///
    /// Returns Ok once every item carries an outcome (reported or forced).
    /// Propagates the fault when the capability faults on the final attempt
    /// for an item, or when a store query fails; in both cases no outcome is
    /// recorded for the in-flight item and the cursor does not advance.
    pub async fn run(&mut self) -> Result<()> {
        debug!(session_id = %self.session_id, "run: called");
        let mut last_done = NO_PREVIOUS_ITEM.to_string();

        while let Some(current) = self.tool_ctx.current_item().await {
            let start_cursor = self.tool_ctx.cursor().await;
            let progress = self.tool_ctx.progress().await;

            info!(
                session_id = %self.session_id,
                %progress,
                description = %current.description,
                "Processing checklist item"
            );
            if let Some(emitter) = &self.emitter {
                emitter.item_started(&progress, &current.description);
            }

            self.run_item_attempts(&current.description, &last_done).await?;

            // Watchdog: an invocation that completed without reporting an
            // outcome must not stall the run
            if self.tool_ctx.cursor().await == start_cursor {
                warn!(
                    session_id = %self.session_id,
                    description = %current.description,
                    "Capability produced no outcome, forcing skip"
                );
                if let Some(emitter) = &self.emitter {
                    emitter.item_forced_skip(&current.description);
                }
                self.tool_ctx
                    .report_outcome(Outcome::new(&current.description, false, STALL_RATIONALE))
                    .await;
            } else {
                last_done = current.description.clone();
            }

            if let Some(emitter) = &self.emitter {
                if let Some(outcome) = self.tool_ctx.last_outcome().await {
                    emitter.item_completed(&outcome.subject, outcome.is_target);
                }
            }
        }

        debug!(session_id = %self.session_id, "run: checklist complete");
        Ok(())
    }

    /// The bounded retry block for one item
    ///
    /// Each attempt gets a freshly built, immutable instruction; a faulted
    /// attempt leaves nothing behind to erase.
    async fn run_item_attempts(&self, description: &str, last_done: &str) -> Result<()> {
        let max_attempts = self.config.max_attempts_per_item;

        for attempt in 1..=max_attempts {
            let instruction = self.build_instruction(description, last_done, attempt)?;

            match self.run_invocation(&instruction).await {
                Ok(()) => {
                    debug!(session_id = %self.session_id, attempt, "run_item_attempts: invocation completed");
                    return Ok(());
                }
                Err(InvocationFault::Store(err)) => {
                    // An unusable store is not the capability's fault; no retry
                    if let Some(emitter) = &self.emitter {
                        emitter.fatal_fault("document-store", &err.to_string());
                    }
                    return Err(eyre::Report::new(err).wrap_err("document store query failed"));
                }
                Err(InvocationFault::Execution(err)) if attempt < max_attempts => {
                    warn!(
                        session_id = %self.session_id,
                        attempt,
                        max_attempts,
                        error = %err,
                        "Capability invocation faulted, retrying"
                    );
                    if let Some(emitter) = &self.emitter {
                        emitter.item_retry(attempt, max_attempts, &err.to_string());
                    }
                    // Honor a server-requested backoff before the next attempt
                    if let Some(backoff) = err.retry_after() {
                        tokio::time::sleep(backoff).await;
                    }
                }
                Err(InvocationFault::Execution(err)) => {
                    // Final attempt: the capability itself is broken, abort the run
                    if let Some(emitter) = &self.emitter {
                        emitter.fatal_fault("capability", &err.to_string());
                    }
                    return Err(eyre::Report::new(err).wrap_err(format!(
                        "capability faulted on all {} attempts for item '{}'",
                        max_attempts, description
                    )));
                }
            }
        }

        Ok(())
    }

    /// Build the immutable instruction for one attempt
    fn build_instruction(&self, description: &str, last_done: &str, attempt: u32) -> Result<String> {
        if attempt > 1 {
            return Ok(prompts::ITEM_RETRY_INSTRUCTION.to_string());
        }
        prompts::render(
            prompts::ITEM_INSTRUCTION_TEMPLATE,
            &[("last_done", last_done), ("current", description)],
        )
    }

    /// One capability invocation: an LLM + tool turn loop until EndTurn
    async fn run_invocation(&self, instruction: &str) -> std::result::Result<(), InvocationFault> {
        let tool_defs = self.tool_executor.definitions();
        let mut messages = vec![Message::user(instruction)];
        let mut turn = 0;

        loop {
            turn += 1;
            if turn > self.config.max_turns_per_invocation {
                warn!(
                    session_id = %self.session_id,
                    max_turns = self.config.max_turns_per_invocation,
                    "run_invocation: max turns reached"
                );
                break;
            }

            let request = CompletionRequest {
                system_prompt: prompts::PROCESSOR_SYSTEM_PROMPT.to_string(),
                messages: messages.clone(),
                tools: tool_defs.clone(),
                max_tokens: self.config.max_tokens,
            };

            let response = self.llm.complete(request).await.map_err(InvocationFault::Execution)?;
            messages.push(build_assistant_message(&response));

            match response.stop_reason {
                StopReason::EndTurn | StopReason::StopSequence => {
                    debug!(session_id = %self.session_id, turn, "run_invocation: turn ended");
                    break;
                }
                StopReason::ToolUse => {
                    let results = self
                        .tool_executor
                        .execute_all(&response.tool_calls, &self.tool_ctx)
                        .await
                        .map_err(InvocationFault::Store)?;
                    messages.push(build_tool_result_message(&results));
                }
                StopReason::MaxTokens => {
                    messages.push(Message::user(
                        "Continue from where you left off. Your previous response was truncated.",
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Build the assistant message from a completion response
fn build_assistant_message(response: &CompletionResponse) -> Message {
    let mut blocks = Vec::new();

    if let Some(text) = &response.content {
        blocks.push(ContentBlock::text(text));
    }

    for call in &response.tool_calls {
        blocks.push(ContentBlock::ToolUse {
            id: call.id.clone(),
            name: call.name.clone(),
            input: call.input.clone(),
        });
    }

    Message::assistant_blocks(blocks)
}

/// Build the user message carrying tool results
fn build_tool_result_message(results: &[(String, ToolResult)]) -> Message {
    let blocks: Vec<ContentBlock> = results
        .iter()
        .map(|(id, result)| ContentBlock::tool_result(id, &result.content, result.is_error))
        .collect();

    Message::user_blocks(blocks)
}
