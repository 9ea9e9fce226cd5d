//! ProgressTracker - the per-request checklist state machine
//!
//! Holds the checklist, a processing cursor, and the accumulated outcomes.
//! Invariants at every observable point:
//!   - `outcomes.len() == cursor`
//!   - `0 <= cursor <= items.len()`
//!   - `outcomes[i]` corresponds to `items[i]` for `i < cursor`
//!
//! One tracker per analysis request. State is passed explicitly into the
//! controller and the tool layer; there is no ambient slot, so concurrent
//! requests are isolated by construction.

use tracing::{debug, warn};

use crate::checklist::TaskItem;

/// The recorded judgment for one processed checklist item
///
/// Created exactly once per item - either reported by the capability via the
/// report action, or synthesized by the controller on stall. Immutable after
/// creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// What was judged, usually a document name
    pub subject: String,

    /// Whether the subject is a target for the requirement
    pub is_target: bool,

    /// Why
    pub rationale: String,
}

impl Outcome {
    pub fn new(subject: impl Into<String>, is_target: bool, rationale: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            is_target,
            rationale: rationale.into(),
        }
    }
}

/// Checklist progress state machine
#[derive(Debug, Default)]
pub struct ProgressTracker {
    items: Vec<TaskItem>,
    cursor: usize,
    outcomes: Vec<Outcome>,
    requirement: String,
}

impl ProgressTracker {
    /// Create an empty tracker for a requirement
    pub fn new(requirement: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
            outcomes: Vec::new(),
            requirement: requirement.into(),
        }
    }

    /// Seed the tracker with a checklist, resetting cursor and outcomes
    ///
    /// Idempotent - calling again restarts processing from the first item.
    pub fn seed(&mut self, items: Vec<TaskItem>) {
        debug!(item_count = items.len(), "seed: called");
        self.items = items;
        self.cursor = 0;
        self.outcomes.clear();
    }

    /// The requirement this tracker was created for
    pub fn requirement(&self) -> &str {
        &self.requirement
    }

    /// The item at the cursor, or None when processing is complete
    pub fn current(&self) -> Option<&TaskItem> {
        self.items.get(self.cursor)
    }

    /// Record the outcome for the current item and advance the cursor
    ///
    /// Marks the item done (exactly once - `done` never reverts). The caller
    /// must not invoke this more than once per cursor position; a call after
    /// completion is rejected so the invariants hold regardless.
    pub fn complete(&mut self, outcome: Outcome) {
        if self.cursor >= self.items.len() {
            warn!(cursor = self.cursor, "complete: called on finished checklist, ignoring");
            return;
        }
        debug!(cursor = self.cursor, subject = %outcome.subject, is_target = outcome.is_target, "complete: called");
        self.items[self.cursor].done = true;
        self.outcomes.push(outcome);
        self.cursor += 1;
    }

    /// Whether every item has been processed
    pub fn is_complete(&self) -> bool {
        self.cursor >= self.items.len()
    }

    /// Current cursor position
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of checklist items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the checklist is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All recorded outcomes, in processing order
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Subjects of the outcomes judged as targets, in outcome order
    pub fn targets(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|o| o.is_target)
            .map(|o| o.subject.clone())
            .collect()
    }

    /// Progress string for observability, e.g. "2/5"
    pub fn progress(&self) -> String {
        format!("{}/{}", self.cursor, self.items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_item_tracker() -> ProgressTracker {
        let mut tracker = ProgressTracker::new("加入品質檢驗功能");
        tracker.seed(vec![
            TaskItem::new("查閱「3.1入庫單維護」", "欄位定義"),
            TaskItem::new("查閱「3.2入庫驗收作業」", "驗收邏輯"),
        ]);
        tracker
    }

    fn assert_invariants(tracker: &ProgressTracker) {
        assert_eq!(tracker.outcomes().len(), tracker.cursor());
        assert!(tracker.cursor() <= tracker.len());
    }

    #[test]
    fn test_seed_resets_state() {
        let mut tracker = two_item_tracker();
        tracker.complete(Outcome::new("查閱「3.1入庫單維護」", true, "相關"));
        assert_eq!(tracker.cursor(), 1);

        tracker.seed(vec![TaskItem::new("fresh", "")]);
        assert_eq!(tracker.cursor(), 0);
        assert!(tracker.outcomes().is_empty());
        assert_eq!(tracker.len(), 1);
        assert_invariants(&tracker);
    }

    #[test]
    fn test_invariants_hold_through_lifecycle() {
        let mut tracker = two_item_tracker();
        assert_invariants(&tracker);

        let mut last_cursor = tracker.cursor();
        while !tracker.is_complete() {
            let subject = tracker.current().unwrap().description.clone();
            tracker.complete(Outcome::new(subject, false, "not relevant"));
            assert_invariants(&tracker);
            assert!(tracker.cursor() > last_cursor, "cursor must be non-decreasing");
            last_cursor = tracker.cursor();
        }

        assert_eq!(tracker.cursor(), 2);
    }

    #[test]
    fn test_current_returns_cursor_item_then_none() {
        let mut tracker = two_item_tracker();
        assert_eq!(tracker.current().unwrap().description, "查閱「3.1入庫單維護」");

        tracker.complete(Outcome::new("查閱「3.1入庫單維護」", true, "ok"));
        assert_eq!(tracker.current().unwrap().description, "查閱「3.2入庫驗收作業」");

        tracker.complete(Outcome::new("查閱「3.2入庫驗收作業」", false, "no"));
        assert!(tracker.current().is_none());
        assert!(tracker.is_complete());
    }

    #[test]
    fn test_complete_marks_done_exactly_once() {
        let mut tracker = two_item_tracker();
        tracker.complete(Outcome::new("查閱「3.1入庫單維護」", true, "ok"));

        // Items behind the cursor stay done; the next item is untouched
        assert!(tracker.current().map(|i| !i.done).unwrap());
        assert_eq!(tracker.outcomes()[0].subject, "查閱「3.1入庫單維護」");
    }

    #[test]
    fn test_complete_after_finish_is_rejected() {
        let mut tracker = ProgressTracker::new("req");
        tracker.seed(vec![TaskItem::new("only", "")]);
        tracker.complete(Outcome::new("only", true, "ok"));
        tracker.complete(Outcome::new("extra", true, "should be ignored"));

        assert_eq!(tracker.cursor(), 1);
        assert_eq!(tracker.outcomes().len(), 1);
        assert_invariants(&tracker);
    }

    #[test]
    fn test_targets_preserve_outcome_order() {
        let mut tracker = ProgressTracker::new("req");
        tracker.seed(vec![
            TaskItem::new("a", ""),
            TaskItem::new("b", ""),
            TaskItem::new("c", ""),
        ]);
        tracker.complete(Outcome::new("a", true, ""));
        tracker.complete(Outcome::new("b", false, ""));
        tracker.complete(Outcome::new("c", true, ""));

        assert_eq!(tracker.targets(), vec!["a", "c"]);
    }

    #[test]
    fn test_targets_read_idempotent() {
        let mut tracker = two_item_tracker();
        tracker.complete(Outcome::new("查閱「3.1入庫單維護」", true, "ok"));

        assert_eq!(tracker.targets(), tracker.targets());
    }

    #[test]
    fn test_empty_checklist_is_immediately_complete() {
        let mut tracker = ProgressTracker::new("req");
        tracker.seed(vec![]);
        assert!(tracker.is_complete());
        assert!(tracker.current().is_none());
        assert_eq!(tracker.progress(), "0/0");
    }

    #[test]
    fn test_progress_string() {
        let mut tracker = two_item_tracker();
        assert_eq!(tracker.progress(), "0/2");
        tracker.complete(Outcome::new("x", false, ""));
        assert_eq!(tracker.progress(), "1/2");
    }
}
