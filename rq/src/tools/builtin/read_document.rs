//! ReadDocument tool - fetch a document's full content

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::tools::{Tool, ToolContext, ToolError, ToolResult};

/// Read a document by exact file name
pub struct ReadDocumentTool;

#[async_trait]
impl Tool for ReadDocumentTool {
    fn name(&self) -> &'static str {
        "read_document"
    }

    fn description(&self) -> &'static str {
        "Read the full content of a document by its exact file name, without quote brackets."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_name": {
                    "type": "string",
                    "description": "Document file name, e.g. '3.1入庫單維護'"
                }
            },
            "required": ["file_name"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        let file_name = match input.get("file_name").and_then(|v| v.as_str()) {
            Some(f) => f,
            None => return Ok(ToolResult::error("Missing required parameter: file_name")),
        };

        let content = ctx
            .source()
            .document_content(file_name)
            .await
            .map_err(ToolError::Store)?;

        match content {
            Some(content) => Ok(ToolResult::success(content)),
            None => Ok(ToolResult::error(format!("Document not found: {}", file_name))),
        }
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
            Arc::new(MockDocumentSource::with_documents(vec![(
                "3.進貨管理模組",
                "3.1入庫單維護",
                "# 入庫單維護\n欄位: 單號, 日期",
            )])),
        )
    }

    #[tokio::test]
    async fn test_reads_existing_document() {
        let result = ReadDocumentTool
            .execute(json!({"file_name": "3.1入庫單維護"}), &ctx())
            .await
            .unwrap();
        assert!(!result.is_error);
        assert!(result.content.contains("欄位"));
    }

    #[tokio::test]
    async fn test_missing_document_is_model_visible_error() {
        let result = ReadDocumentTool
            .execute(json!({"file_name": "9.9不存在"}), &ctx())
            .await
            .unwrap();
        assert!(result.is_error);
        assert!(result.content.contains("not found"));
    }
}
