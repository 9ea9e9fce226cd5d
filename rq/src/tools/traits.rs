//! Tool trait definition

use async_trait::async_trait;
use serde_json::Value;

use super::ToolError;
use super::context::ToolContext;

/// A tool that can be called by the LLM
///
/// `execute` distinguishes two failure planes: a model-visible problem
/// (bad arguments, unknown document) comes back as `Ok(ToolResult::error)`
/// and is fed to the model to correct; an infrastructure fault (a failing
/// store query) comes back as `Err` and aborts the run.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (matches LLM tool_use name)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> Value;

    /// Execute the tool
    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<ToolResult, ToolError>;
}

/// Result of a tool execution
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    /// Create an error result
    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("Outcome recorded");
        assert!(!result.is_error);
        assert_eq!(result.content, "Outcome recorded");
    }

    #[test]
    fn test_tool_result_error() {
        let result = ToolResult::error("Document not found");
        assert!(result.is_error);
        assert_eq!(result.content, "Document not found");
    }
}
