//! ListModules tool - enumerate the corpus modules

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::tools::{Tool, ToolContext, ToolError, ToolResult};

/// List every module in the document corpus
pub struct ListModulesTool;

#[async_trait]
impl Tool for ListModulesTool {
    fn name(&self) -> &'static str {
        "list_modules"
    }

    fn description(&self) -> &'static str {
        "List all module names in the document corpus, ascending."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _input: Value, ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        let modules = ctx.source().modules().await.map_err(ToolError::Store)?;
        if modules.is_empty() {
            return Ok(ToolResult::success("No modules in the corpus"));
        }
        Ok(ToolResult::success(modules.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressTracker;
    use crate::tools::source::mock::MockDocumentSource;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    fn ctx_with(source: MockDocumentSource) -> ToolContext {
        ToolContext::new(
            "test",
            Arc::new(Mutex::new(ProgressTracker::new("req"))),
            Arc::new(source),
        )
    }

    #[tokio::test]
    async fn test_lists_modules_ascending() {
        let ctx = ctx_with(MockDocumentSource::with_documents(vec![
            ("3.進貨管理模組", "3.1入庫單維護", "x"),
            ("1.商品管理模組", "1.1商品類別維護", "y"),
        ]));

        let result = ListModulesTool.execute(json!({}), &ctx).await.unwrap();
        assert!(!result.is_error);
        assert_eq!(result.content, "1.商品管理模組\n3.進貨管理模組");
    }

    #[tokio::test]
    async fn test_store_fault_propagates() {
        let ctx = ctx_with(MockDocumentSource::failing());
        let result = ListModulesTool.execute(json!({}), &ctx).await;
        assert!(matches!(result, Err(ToolError::Store(_))));
    }
}
