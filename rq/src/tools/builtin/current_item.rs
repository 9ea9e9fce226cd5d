//! CurrentItem tool - fetch the checklist item under the cursor

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::tools::{Tool, ToolContext, ToolError, ToolResult};

/// Sentinel text returned once every item has been processed
pub const ALL_ITEMS_DONE: &str = "All items already processed";

/// Fetch the current checklist item
///
/// The capability works on exactly one item per invocation; this tool is
/// how it learns which one.
pub struct CurrentItemTool;

#[async_trait]
impl Tool for CurrentItemTool {
    fn name(&self) -> &'static str {
        "current_item"
    }

    fn description(&self) -> &'static str {
        "Get the current checklist item to work on. Work only on this item, never on later ones."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _input: Value, ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        match ctx.current_item().await {
            Some(item) => {
                let requirement = ctx.requirement().await;
                Ok(ToolResult::success(format!(
                    "Current item: {}\nNote: {}\nRequirement: {}",
                    item.description, item.note, requirement
                )))
            }
            None => Ok(ToolResult::success(ALL_ITEMS_DONE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::TaskItem;
    use crate::progress::{Outcome, ProgressTracker};
    use crate::tools::source::mock::MockDocumentSource;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    fn ctx() -> ToolContext {
        let mut tracker = ProgressTracker::new("加入品質檢驗功能");
        tracker.seed(vec![TaskItem::new("查閱「3.1入庫單維護」", "欄位定義")]);
        ToolContext::new(
            "test",
            Arc::new(Mutex::new(tracker)),
            Arc::new(MockDocumentSource::default()),
        )
    }

    #[tokio::test]
    async fn test_returns_current_item_with_context() {
        let result = CurrentItemTool.execute(json!({}), &ctx()).await.unwrap();
        assert!(!result.is_error);
        assert!(result.content.contains("查閱「3.1入庫單維護」"));
        assert!(result.content.contains("欄位定義"));
        assert!(result.content.contains("加入品質檢驗功能"));
    }

    #[tokio::test]
    async fn test_sentinel_when_complete() {
        let ctx = ctx();
        ctx.report_outcome(Outcome::new("查閱「3.1入庫單維護」", true, "ok")).await;

        let result = CurrentItemTool.execute(json!({}), &ctx).await.unwrap();
        assert!(!result.is_error);
        assert_eq!(result.content, ALL_ITEMS_DONE);
    }
}
