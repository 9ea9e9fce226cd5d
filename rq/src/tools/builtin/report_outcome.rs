//! ReportOutcome tool - the capability's single report action

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::info;

use crate::progress::Outcome;
use crate::tools::{Tool, ToolContext, ToolError, ToolResult};

/// Record the judgment for the current checklist item and advance progress
///
/// Must be called exactly once per item. An invocation that returns without
/// calling it is treated as non-cooperation by the controller.
pub struct ReportOutcomeTool;

#[async_trait]
impl Tool for ReportOutcomeTool {
    fn name(&self) -> &'static str {
        "report_outcome"
    }

    fn description(&self) -> &'static str {
        "Record the analysis outcome for the current item: the subject judged, whether it is a target, and why. Call exactly once."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "subject": {
                    "type": "string",
                    "description": "What was judged, usually the document name from current_item"
                },
                "is_target": {
                    "type": "boolean",
                    "description": "Whether the subject is a target for the requirement"
                },
                "rationale": {
                    "type": "string",
                    "description": "Why"
                }
            },
            "required": ["subject", "is_target", "rationale"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        let subject = match input.get("subject").and_then(|v| v.as_str()) {
            Some(s) => s,
            None => return Ok(ToolResult::error("Missing required parameter: subject")),
        };
        let is_target = match input.get("is_target").and_then(|v| v.as_bool()) {
            Some(b) => b,
            None => return Ok(ToolResult::error("Missing required parameter: is_target")),
        };
        let rationale = input.get("rationale").and_then(|v| v.as_str()).unwrap_or("");

        if ctx.current_item().await.is_none() {
            return Ok(ToolResult::error("No pending item to report an outcome for"));
        }

        info!(
            session_id = %ctx.session_id,
            %subject,
            %is_target,
            "Outcome reported"
        );

        let progress = ctx.report_outcome(Outcome::new(subject, is_target, rationale)).await;
        Ok(ToolResult::success(format!("Outcome recorded. Progress: {}", progress)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::TaskItem;
    use crate::progress::ProgressTracker;
    use crate::tools::source::mock::MockDocumentSource;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    fn ctx() -> ToolContext {
        let mut tracker = ProgressTracker::new("req");
        tracker.seed(vec![TaskItem::new("查閱「3.1入庫單維護」", "")]);
        ToolContext::new(
            "test",
            Arc::new(Mutex::new(tracker)),
            Arc::new(MockDocumentSource::default()),
        )
    }

    #[tokio::test]
    async fn test_records_outcome_and_advances() {
        let ctx = ctx();
        let result = ReportOutcomeTool
            .execute(
                json!({"subject": "查閱「3.1入庫單維護」", "is_target": true, "rationale": "直接相關"}),
                &ctx,
            )
            .await
            .unwrap();

        assert!(!result.is_error);
        assert!(result.content.contains("1/1"));
        assert_eq!(ctx.cursor().await, 1);
    }

    #[tokio::test]
    async fn test_missing_parameters_rejected() {
        let ctx = ctx();
        let result = ReportOutcomeTool
            .execute(json!({"subject": "x"}), &ctx)
            .await
            .unwrap();
        assert!(result.is_error);
        assert_eq!(ctx.cursor().await, 0, "a rejected report must not advance the cursor");
    }

    #[tokio::test]
    async fn test_report_on_finished_checklist_rejected() {
        let ctx = ctx();
        ReportOutcomeTool
            .execute(json!({"subject": "a", "is_target": false, "rationale": ""}), &ctx)
            .await
            .unwrap();

        let second = ReportOutcomeTool
            .execute(json!({"subject": "b", "is_target": true, "rationale": ""}), &ctx)
            .await
            .unwrap();
        assert!(second.is_error);
        assert_eq!(ctx.cursor().await, 1);
    }
}
