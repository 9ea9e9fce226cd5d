//! ModuleDocuments tool - fetch every document of one module

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::tools::{Tool, ToolContext, ToolError, ToolResult};

/// Read all documents of a module at once
pub struct ModuleDocumentsTool;

#[async_trait]
impl Tool for ModuleDocumentsTool {
    fn name(&self) -> &'static str {
        "module_documents"
    }

    fn description(&self) -> &'static str {
        "Read every document of a module as (file name, content) pairs."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "module": {
                    "type": "string",
                    "description": "Module name, e.g. '3.進貨管理模組'"
                }
            },
            "required": ["module"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        let module = match input.get("module").and_then(|v| v.as_str()) {
            Some(m) => m,
            None => return Ok(ToolResult::error("Missing required parameter: module")),
        };

        let documents = ctx.source().module_documents(module).await.map_err(ToolError::Store)?;
        if documents.is_empty() {
            return Ok(ToolResult::success(format!("No documents in module {}", module)));
        }

        let listing = documents
            .iter()
            .map(|(file_name, content)| format!("## {}\n{}", file_name, content))
            .collect::<Vec<_>>()
            .join("\n\n");
        Ok(ToolResult::success(listing))
    }
}
