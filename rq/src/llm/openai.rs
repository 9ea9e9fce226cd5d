//! OpenAI-compatible API client implementation
//!
//! Implements the LlmClient trait for any OpenAI-compatible chat-completions
//! endpoint. The default deployment drives a locally hosted model through
//! such an endpoint, so the API key is optional.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{
    CompletionRequest, CompletionResponse, ContentBlock, LlmClient, LlmError, Message, MessageContent, Role,
    StopReason, TokenUsage, ToolCall,
};
use crate::config::LlmConfig;

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

/// OpenAI-compatible API client
pub struct OpenAIClient {
    model: String,
    api_key: Option<String>,
    base_url: String,
    http: Client,
    max_tokens: u32,
}

impl OpenAIClient {
    /// Create a new client from configuration
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, base_url = %config.base_url, "from_config: called");
        let api_key = std::env::var(&config.api_key_env).ok().filter(|k| !k.is_empty());

        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the request body for the chat-completions API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");

        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": request.system_prompt,
        })];

        messages.extend(self.convert_messages(&request.messages));

        let max_tokens = request.max_tokens.min(self.max_tokens);

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": max_tokens,
        });

        if !request.tools.is_empty() {
            body["tools"] = serde_json::json!(
                request.tools.iter().map(|t| t.to_openai_schema()).collect::<Vec<_>>()
            );
            body["tool_choice"] = serde_json::json!("auto");
        }

        body
    }

    /// Convert internal Message types to the wire format
    ///
    /// The wire protocol wants one message per tool result, so a single
    /// internal message can expand into several wire messages.
    fn convert_messages(&self, messages: &[Message]) -> Vec<serde_json::Value> {
        debug!(message_count = %messages.len(), "convert_messages: called");
        messages.iter().flat_map(wire_messages).collect()
    }

    /// Parse the API response
    fn parse_response(&self, api_response: ChatResponse) -> CompletionResponse {
        let choice = api_response.choices.into_iter().next();

        let (content, tool_calls, stop_reason) = match choice {
            Some(c) => {
                let content = c.message.content;
                let tool_calls = c
                    .message
                    .tool_calls
                    .unwrap_or_default()
                    .into_iter()
                    .map(|tc| ToolCall {
                        id: tc.id,
                        name: tc.function.name,
                        input: serde_json::from_str(&tc.function.arguments).unwrap_or(serde_json::json!({})),
                    })
                    .collect();
                let stop_reason = c
                    .finish_reason
                    .as_deref()
                    .map(StopReason::from_finish_reason)
                    .unwrap_or(StopReason::EndTurn);
                (content, tool_calls, stop_reason)
            }
            None => (None, vec![], StopReason::EndTurn),
        };

        CompletionResponse {
            content,
            tool_calls,
            stop_reason,
            usage: TokenUsage {
                input_tokens: api_response.usage.prompt_tokens,
                output_tokens: api_response.usage.completion_tokens,
            },
        }
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, %request.max_tokens, "complete: called");
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(&request);

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.send_once(&url, &body).await {
                SendOutcome::Done(parsed) => return Ok(self.parse_response(parsed)),
                SendOutcome::Fatal(err) => return Err(err),
                SendOutcome::Transient(err) => {
                    if attempt > MAX_RETRIES {
                        return Err(err);
                    }
                    let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                    warn!(attempt, backoff_ms = backoff, error = %err, "complete: transient error, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                }
            }
        }
    }
}

/// Classification of one HTTP round trip
enum SendOutcome {
    /// A well-formed completion arrived
    Done(ChatResponse),
    /// Worth another attempt after backoff
    Transient(LlmError),
    /// Retrying cannot help; surface immediately
    Fatal(LlmError),
}

impl OpenAIClient {
    /// Issue one HTTP round trip and classify the result
    async fn send_once(&self, url: &str, body: &serde_json::Value) -> SendOutcome {
        let mut req = self.http.post(url).header("content-type", "application/json");
        if let Some(key) = &self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }

        let response = match req.json(body).send().await {
            Ok(r) => r,
            Err(e) => return SendOutcome::Transient(LlmError::Network(e)),
        };

        let status = response.status().as_u16();
        if status == 429 {
            // Surfaced as-is; the retry policy upstream owns the backoff
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return SendOutcome::Fatal(LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            let err = LlmError::ApiError { status, message };
            return if is_retryable_status(status) {
                SendOutcome::Transient(err)
            } else {
                SendOutcome::Fatal(err)
            };
        }

        match response.json::<ChatResponse>().await {
            Ok(parsed) => SendOutcome::Done(parsed),
            Err(e) => SendOutcome::Fatal(LlmError::InvalidResponse(e.to_string())),
        }
    }
}

/// Expand one internal message into its wire representation
///
/// Tool results each become their own "tool" message; an assistant turn
/// with tool calls carries them in a single message.
fn wire_messages(msg: &Message) -> Vec<serde_json::Value> {
    let role = match msg.role {
        Role::User => "user",
        Role::Assistant => "assistant",
    };

    let blocks = match &msg.content {
        MessageContent::Text(text) => {
            return vec![serde_json::json!({ "role": role, "content": text })];
        }
        MessageContent::Blocks(blocks) => blocks,
    };

    let tool_results: Vec<serde_json::Value> = blocks
        .iter()
        .filter_map(|block| match block {
            ContentBlock::ToolResult {
                tool_use_id, content, ..
            } => Some(serde_json::json!({
                "role": "tool",
                "tool_call_id": tool_use_id,
                "content": content,
            })),
            _ => None,
        })
        .collect();
    if !tool_results.is_empty() {
        return tool_results;
    }

    let mut text = String::new();
    let mut tool_calls = Vec::new();
    for block in blocks {
        match block {
            ContentBlock::Text { text: t } => text.push_str(t),
            ContentBlock::ToolUse { id, name, input } => tool_calls.push(serde_json::json!({
                "id": id,
                "type": "function",
                "function": {
                    "name": name,
                    "arguments": input.to_string(),
                }
            })),
            ContentBlock::ToolResult { .. } => {}
        }
    }

    if tool_calls.is_empty() {
        return vec![serde_json::json!({ "role": role, "content": text })];
    }

    let mut wire = serde_json::json!({ "role": "assistant", "tool_calls": tool_calls });
    if !text.is_empty() {
        wire["content"] = serde_json::json!(text);
    }
    vec![wire]
}

// Wire response types

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: ChatUsage,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ChatToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ChatToolCall {
    id: String,
    function: ChatFunction,
}

#[derive(Debug, Deserialize)]
struct ChatFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}
