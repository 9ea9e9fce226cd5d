//! ToolContext - request-scoped execution context for tools
//!
//! Carries the state one analysis request owns: the progress tracker and the
//! document source handle. Constructed at session start, cloned into each
//! capability invocation, dropped with the session on every exit path.
//! Concurrent requests each get their own context, so nothing is shared.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::checklist::TaskItem;
use crate::progress::{Outcome, ProgressTracker};

use super::source::DocumentSource;

/// Default number of results from ranked document search
pub const DEFAULT_SEARCH_TOP_N: usize = 10;

/// Execution context for tools
#[derive(Clone)]
pub struct ToolContext {
    /// Session this context belongs to
    pub session_id: String,

    tracker: Arc<Mutex<ProgressTracker>>,
    source: Arc<dyn DocumentSource>,
    search_top_n: usize,
}

impl ToolContext {
    /// Create a new context for a session
    pub fn new(session_id: impl Into<String>, tracker: Arc<Mutex<ProgressTracker>>, source: Arc<dyn DocumentSource>) -> Self {
        let session_id = session_id.into();
        debug!(%session_id, "ToolContext::new: called");
        Self {
            session_id,
            tracker,
            source,
            search_top_n: DEFAULT_SEARCH_TOP_N,
        }
    }

    /// Override the ranked-search result count
    pub fn with_search_top_n(mut self, top_n: usize) -> Self {
        self.search_top_n = top_n;
        self
    }

    /// The document source handle
    pub fn source(&self) -> &Arc<dyn DocumentSource> {
        &self.source
    }

    /// Ranked-search result count
    pub fn search_top_n(&self) -> usize {
        self.search_top_n
    }

    /// The current checklist item, if any
    pub async fn current_item(&self) -> Option<TaskItem> {
        self.tracker.lock().await.current().cloned()
    }

    /// The requirement under analysis
    pub async fn requirement(&self) -> String {
        self.tracker.lock().await.requirement().to_string()
    }

    /// Record an outcome for the current item; returns the new progress string
    pub async fn report_outcome(&self, outcome: Outcome) -> String {
        let mut tracker = self.tracker.lock().await;
        tracker.complete(outcome);
        tracker.progress()
    }

    /// Cursor position, for stall detection by the controller
    pub async fn cursor(&self) -> usize {
        self.tracker.lock().await.cursor()
    }

    /// Progress string, e.g. "2/5"
    pub async fn progress(&self) -> String {
        self.tracker.lock().await.progress()
    }

    /// The most recently recorded outcome, if any
    pub async fn last_outcome(&self) -> Option<Outcome> {
        self.tracker.lock().await.outcomes().last().cloned()
    }
}
