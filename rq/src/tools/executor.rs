//! ToolExecutor - manages tool execution for a capability invocation

use std::collections::HashMap;
use tracing::debug;

use crate::llm::{ToolCall, ToolDefinition};

use super::builtin::{
    CurrentItemTool, ListFilesTool, ListModulesTool, ModuleDocumentsTool, ReadDocumentTool, ReportOutcomeTool,
    SearchDocumentsTool,
};
use super::{Tool, ToolContext, ToolError, ToolResult};

/// Tool profiles define which tools a flow exposes to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolProfile {
    /// Corpus research: catalog, content and ranked search (planning and
    /// checklist execution)
    #[default]
    Planner,
    /// Single-item processing: current item, document content, report action
    Processor,
}

/// Manages tool execution
pub struct ToolExecutor {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolExecutor {
    /// Create executor with a specific tool profile
    pub fn with_profile(profile: ToolProfile) -> Self {
        debug!(?profile, "ToolExecutor::with_profile: called");
        let mut tools: HashMap<String, Box<dyn Tool>> = HashMap::new();

        match profile {
            ToolProfile::Planner => {
                tools.insert("list_modules".into(), Box::new(ListModulesTool));
                tools.insert("list_files".into(), Box::new(ListFilesTool));
                tools.insert("read_document".into(), Box::new(ReadDocumentTool));
                tools.insert("module_documents".into(), Box::new(ModuleDocumentsTool));
                tools.insert("search_documents".into(), Box::new(SearchDocumentsTool));
            }
            ToolProfile::Processor => {
                tools.insert("current_item".into(), Box::new(CurrentItemTool));
                tools.insert("read_document".into(), Box::new(ReadDocumentTool));
                tools.insert("report_outcome".into(), Box::new(ReportOutcomeTool));
            }
        }

        Self { tools }
    }

    /// Create an empty executor (for testing)
    pub fn empty() -> Self {
        Self { tools: HashMap::new() }
    }

    /// Add a tool to the executor
    pub fn add_tool(&mut self, tool: Box<dyn Tool>) {
        debug!(tool_name = %tool.name(), "ToolExecutor::add_tool: called");
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get tool definitions for the LLM
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect()
    }

    /// Execute a tool call
    ///
    /// An unknown tool name is a model mistake and comes back as a
    /// model-visible error result; an `Err` is an infrastructure fault.
    pub async fn execute(&self, tool_call: &ToolCall, ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        debug!(tool_name = %tool_call.name, tool_id = %tool_call.id, "ToolExecutor::execute: called");
        match self.tools.get(&tool_call.name) {
            Some(tool) => tool.execute(tool_call.input.clone(), ctx).await,
            None => Ok(ToolResult::error(format!("Unknown tool: {}", tool_call.name))),
        }
    }

    /// Execute multiple tool calls in order
    pub async fn execute_all(
        &self,
        tool_calls: &[ToolCall],
        ctx: &ToolContext,
    ) -> Result<Vec<(String, ToolResult)>, ToolError> {
        debug!(count = %tool_calls.len(), "ToolExecutor::execute_all: called");
        let mut results = Vec::with_capacity(tool_calls.len());

        for call in tool_calls {
            let result = self.execute(call, ctx).await?;
            results.push((call.id.clone(), result));
        }

        Ok(results)
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get tool names
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::with_profile(ToolProfile::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressTracker;
    use crate::tools::source::mock::MockDocumentSource;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    fn ctx() -> ToolContext {
        ToolContext::new(
            "test",
            Arc::new(Mutex::new(ProgressTracker::new("req"))),
            Arc::new(MockDocumentSource::default()),
        )
    }

    #[test]
    fn test_planner_profile_tools() {
        let executor = ToolExecutor::with_profile(ToolProfile::Planner);
        assert!(executor.has_tool("list_modules"));
        assert!(executor.has_tool("list_files"));
        assert!(executor.has_tool("search_documents"));
        assert!(executor.has_tool("read_document"));
        assert!(!executor.has_tool("report_outcome"));
    }

    #[test]
    fn test_processor_profile_tools() {
        let executor = ToolExecutor::with_profile(ToolProfile::Processor);
        assert!(executor.has_tool("current_item"));
        assert!(executor.has_tool("read_document"));
        assert!(executor.has_tool("report_outcome"));
        assert!(!executor.has_tool("search_documents"));
    }

    #[test]
    fn test_definitions_cover_all_tools() {
        let executor = ToolExecutor::with_profile(ToolProfile::Processor);
        let defs = executor.definitions();
        assert_eq!(defs.len(), 3);
        assert!(defs.iter().any(|d| d.name == "report_outcome"));
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let executor = ToolExecutor::with_profile(ToolProfile::Planner);
        let call = ToolCall {
            id: "call_1".to_string(),
            name: "unknown_tool".to_string(),
            input: serde_json::json!({}),
        };

        let result = executor.execute(&call, &ctx()).await.unwrap();
        assert!(result.is_error);
        assert!(result.content.contains("Unknown tool"));
    }

    #[tokio::test]
    async fn test_execute_all_propagates_store_fault() {
        let executor = ToolExecutor::with_profile(ToolProfile::Planner);
        let ctx = ToolContext::new(
            "test",
            Arc::new(Mutex::new(ProgressTracker::new("req"))),
            Arc::new(MockDocumentSource::failing()),
        );
        let call = ToolCall {
            id: "call_1".to_string(),
            name: "list_modules".to_string(),
            input: serde_json::json!({}),
        };

        let result = executor.execute_all(&[call], &ctx).await;
        assert!(matches!(result, Err(ToolError::Store(_))));
    }
}
