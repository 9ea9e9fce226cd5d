//! Tool-dispatching conversation runner
//!
//! Drives one LLM conversation with tool dispatch until the model ends its
//! turn, returning the accumulated assistant text. Used by the planning and
//! execution stages; the item engine carries its own loop because its fault
//! handling differs.

use std::sync::Arc;

use eyre::{Result, WrapErr};
use tracing::debug;

use crate::llm::{
    CompletionRequest, CompletionResponse, ContentBlock, LlmClient, Message, StopReason, ToolDefinition,
};

use super::{ToolContext, ToolExecutor};

/// Turn/token budget for one conversation
#[derive(Debug, Clone, Copy)]
pub struct ConversationBudget {
    pub max_turns: u32,
    pub max_tokens: u32,
}

impl Default for ConversationBudget {
    fn default() -> Self {
        Self {
            max_turns: 8,
            max_tokens: 4096,
        }
    }
}

/// Run a conversation until EndTurn; returns the accumulated assistant text
pub async fn run_conversation(
    llm: &Arc<dyn LlmClient>,
    system_prompt: &str,
    instruction: &str,
    executor: &ToolExecutor,
    ctx: &ToolContext,
    budget: ConversationBudget,
) -> Result<String> {
    let tool_defs: Vec<ToolDefinition> = executor.definitions();
    let mut messages = vec![Message::user(instruction)];
    let mut text = String::new();
    let mut turn = 0;

    loop {
        turn += 1;
        if turn > budget.max_turns {
            debug!(max_turns = budget.max_turns, "run_conversation: max turns reached");
            break;
        }

        let request = CompletionRequest {
            system_prompt: system_prompt.to_string(),
            messages: messages.clone(),
            tools: tool_defs.clone(),
            max_tokens: budget.max_tokens,
        };

        let response = llm.complete(request).await.wrap_err("Capability invocation faulted")?;
        if let Some(content) = &response.content {
            text.push_str(content);
        }
        messages.push(assistant_message(&response));

        match response.stop_reason {
            StopReason::EndTurn | StopReason::StopSequence => break,
            StopReason::ToolUse => {
                let results = executor
                    .execute_all(&response.tool_calls, ctx)
                    .await
                    .wrap_err("Store query failed")?;
                let blocks: Vec<ContentBlock> = results
                    .iter()
                    .map(|(id, result)| ContentBlock::tool_result(id, &result.content, result.is_error))
                    .collect();
                messages.push(Message::user_blocks(blocks));
            }
            StopReason::MaxTokens => {
                messages.push(Message::user(
                    "Continue from where you left off. Your previous response was truncated.",
                ));
            }
        }
    }

    Ok(text)
}

fn assistant_message(response: &CompletionResponse) -> Message {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::TokenUsage;
    use crate::llm::ToolCall;
    use crate::llm::client::mock::MockLlmClient;
    use crate::progress::ProgressTracker;
    use crate::tools::ToolProfile;
    use crate::tools::source::mock::MockDocumentSource;
    use tokio::sync::Mutex;

    fn ctx() -> ToolContext {
        ToolContext::new(
            "conv-test",
            Arc::new(Mutex::new(ProgressTracker::new("req"))),
            Arc::new(MockDocumentSource::with_documents(vec![("m", "f", "doc body")])),
        )
    }

    #[tokio::test]
    async fn test_plain_text_conversation() {
        let llm: Arc<dyn LlmClient> = Arc::new(MockLlmClient::with_responses(vec![CompletionResponse::text("hello")]));
        let executor = ToolExecutor::with_profile(ToolProfile::Planner);

        let text = run_conversation(&llm, "sys", "hi", &executor, &ctx(), ConversationBudget::default())
            .await
            .unwrap();
        assert_eq!(text, "hello");
    }

    #[tokio::test]
    async fn test_tool_roundtrip_accumulates_text() {
        let llm: Arc<dyn LlmClient> = Arc::new(MockLlmClient::with_responses(vec![
            CompletionResponse {
                content: Some("checking the corpus. ".to_string()),
                tool_calls: vec![ToolCall {
                    id: "call_1".to_string(),
                    name: "read_document".to_string(),
                    input: serde_json::json!({"file_name": "f"}),
                }],
                stop_reason: StopReason::ToolUse,
                usage: TokenUsage::default(),
            },
            CompletionResponse::text("found it"),
        ]));
        let executor = ToolExecutor::with_profile(ToolProfile::Planner);

        let text = run_conversation(&llm, "sys", "go", &executor, &ctx(), ConversationBudget::default())
            .await
            .unwrap();
        assert_eq!(text, "checking the corpus. found it");
    }

    #[tokio::test]
    async fn test_turn_budget_bounds_conversation() {
        // The model keeps asking for tools; the budget must cut it off
        let responses: Vec<_> = (0..10)
            .map(|i| CompletionResponse {
                content: None,
                tool_calls: vec![ToolCall {
                    id: format!("call_{i}"),
                    name: "list_modules".to_string(),
                    input: serde_json::json!({}),
                }],
                stop_reason: StopReason::ToolUse,
                usage: TokenUsage::default(),
            })
            .collect();
        let llm: Arc<dyn LlmClient> = Arc::new(MockLlmClient::with_responses(responses));
        let executor = ToolExecutor::with_profile(ToolProfile::Planner);

        let budget = ConversationBudget {
            max_turns: 3,
            max_tokens: 1024,
        };
        run_conversation(&llm, "sys", "go", &executor, &ctx(), budget).await.unwrap();
    }
}
