//! SearchDocuments tool - ranked search over the full corpus

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use crate::ranking::{CorpusEntry, rank};
use crate::tools::{Tool, ToolContext, ToolError, ToolResult};

/// Rank the corpus against a query
///
/// The corpus is re-fetched and re-scored on every call so a reloaded
/// corpus is always reflected.
pub struct SearchDocumentsTool;

#[async_trait]
impl Tool for SearchDocumentsTool {
    fn name(&self) -> &'static str {
        "search_documents"
    }

    fn description(&self) -> &'static str {
        "Search all documents for a query and return the best-matching file names with scores."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search keywords"
                },
                "top_n": {
                    "type": "integer",
                    "description": "Maximum number of results (default 10)"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        let query = match input.get("query").and_then(|v| v.as_str()) {
            Some(q) => q,
            None => return Ok(ToolResult::error("Missing required parameter: query")),
        };
        let top_n = input
            .get("top_n")
            .and_then(|v| v.as_u64())
            .map(|n| n as usize)
            .unwrap_or_else(|| ctx.search_top_n());

        let documents = ctx.source().all_documents().await.map_err(ToolError::Store)?;
        let corpus: Vec<CorpusEntry> = documents
            .into_iter()
            .map(|(file_name, content)| CorpusEntry::new(file_name, content))
            .collect();

        let results = rank(query, &corpus, top_n);
        debug!(%query, result_count = results.len(), "search_documents: ranked");

        if results.is_empty() {
            return Ok(ToolResult::success("No matching documents"));
        }

        let listing = results
            .iter()
            .map(|(file_name, score)| format!("{}: {:.4}", file_name, score))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(ToolResult::success(listing))
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
                ("1.商品管理模組", "1.1商品類別維護", "商品 類別 維護 作業"),
                ("2.儲位管理模組", "2.1儲位維護", "儲位 維護 作業"),
                ("3.進貨管理模組", "3.1入庫單維護", "入庫 單據 商品 驗收"),
            ])),
        )
    }

    #[tokio::test]
    async fn test_ranked_results_for_query() {
        let result = SearchDocumentsTool
            .execute(json!({"query": "商品"}), &ctx())
            .await
            .unwrap();
        assert!(!result.is_error);
        assert!(result.content.contains("1.1商品類別維護"));
        // The pure storage-location document shares no query term
        assert!(!result.content.contains("2.1儲位維護"));
    }

    #[tokio::test]
    async fn test_no_matches() {
        let result = SearchDocumentsTool
            .execute(json!({"query": "完全無關的查詢字串xyz"}), &ctx())
            .await
            .unwrap();
        assert!(!result.is_error);
        assert!(result.content.contains("No matching documents"));
    }

    #[tokio::test]
    async fn test_top_n_override() {
        let result = SearchDocumentsTool
            .execute(json!({"query": "維護 作業", "top_n": 1}), &ctx())
            .await
            .unwrap();
        assert_eq!(result.content.lines().count(), 1);
    }
}
