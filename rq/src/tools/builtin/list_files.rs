//! ListFiles tool - enumerate the documents of one module

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::tools::{Tool, ToolContext, ToolError, ToolResult};

/// List the file names of a module
pub struct ListFilesTool;

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &'static str {
        "list_files"
    }

    fn description(&self) -> &'static str {
        "List the document file names of a module, ascending. Empty modules have no files."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "module": {
                    "type": "string",
                    "description": "Module name, e.g. '1.商品管理模組'"
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

        let files = ctx.source().files_for_module(module).await.map_err(ToolError::Store)?;
        if files.is_empty() {
            return Ok(ToolResult::success(format!("No files in module {}", module)));
        }
        Ok(ToolResult::success(files.join("\n")))
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
            Arc::new(MockDocumentSource::with_documents(vec![
                ("3.進貨管理模組", "3.1入庫單維護", "x"),
                ("3.進貨管理模組", "3.2入庫驗收作業", "y"),
            ])),
        )
    }

    #[tokio::test]
    async fn test_lists_module_files() {
        let result = ListFilesTool
            .execute(json!({"module": "3.進貨管理模組"}), &ctx())
            .await
            .unwrap();
        assert!(!result.is_error);
        assert!(result.content.contains("3.1入庫單維護"));
        assert!(result.content.contains("3.2入庫驗收作業"));
    }

    #[tokio::test]
    async fn test_unknown_module_reports_empty() {
        let result = ListFilesTool
            .execute(json!({"module": "9.不存在模組"}), &ctx())
            .await
            .unwrap();
        assert!(!result.is_error);
        assert!(result.content.contains("No files"));
    }

    #[tokio::test]
    async fn test_missing_module_param() {
        let result = ListFilesTool.execute(json!({}), &ctx()).await.unwrap();
        assert!(result.is_error);
        assert!(result.content.contains("Missing required parameter"));
    }
}
