//! Event types for analysis progress streaming
//!
//! These events are the observable surface of a run: checklist generation,
//! per-item lifecycle (start, retry, forced skip, completion), fatal faults
//! and the final summary. Consumers subscribe through the EventBus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Core event enum - the vocabulary of analysis activity
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnalysisEvent {
    /// The checklist was generated and parsed
    ChecklistGenerated { session_id: String, item_count: usize },

    /// Processing of a checklist item has started
    ItemStarted {
        session_id: String,
        /// e.g. "1/4"
        progress: String,
        description: String,
    },

    /// A capability invocation faulted and will be retried
    ItemRetry {
        session_id: String,
        attempt: u32,
        max_attempts: u32,
        error: String,
    },

    /// The capability never reported an outcome; the item was force-skipped
    ItemForcedSkip { session_id: String, description: String },

    /// An outcome was recorded for an item
    ItemCompleted {
        session_id: String,
        subject: String,
        is_target: bool,
    },

    /// A fault that aborts the whole run
    FatalFault {
        session_id: String,
        context: String,
        message: String,
    },

    /// The run finished; summary of results
    AnalysisCompleted {
        session_id: String,
        targets: Vec<String>,
        processed: usize,
    },
}

impl AnalysisEvent {
    /// Get the session ID for this event
    pub fn session_id(&self) -> &str {
        match self {
            AnalysisEvent::ChecklistGenerated { session_id, .. }
            | AnalysisEvent::ItemStarted { session_id, .. }
            | AnalysisEvent::ItemRetry { session_id, .. }
            | AnalysisEvent::ItemForcedSkip { session_id, .. }
            | AnalysisEvent::ItemCompleted { session_id, .. }
            | AnalysisEvent::FatalFault { session_id, .. }
            | AnalysisEvent::AnalysisCompleted { session_id, .. } => session_id,
        }
    }

    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            AnalysisEvent::ChecklistGenerated { .. } => "ChecklistGenerated",
            AnalysisEvent::ItemStarted { .. } => "ItemStarted",
            AnalysisEvent::ItemRetry { .. } => "ItemRetry",
            AnalysisEvent::ItemForcedSkip { .. } => "ItemForcedSkip",
            AnalysisEvent::ItemCompleted { .. } => "ItemCompleted",
            AnalysisEvent::FatalFault { .. } => "FatalFault",
            AnalysisEvent::AnalysisCompleted { .. } => "AnalysisCompleted",
        }
    }

    /// Human-readable one-liner for log/CLI display
    pub fn render(&self) -> String {
        match self {
            AnalysisEvent::ChecklistGenerated { item_count, .. } => {
                format!("📝 Checklist ready: {} item(s)", item_count)
            }
            AnalysisEvent::ItemStarted {
                progress, description, ..
            } => format!("🔍 [{}] Processing: {}", progress, description),
            AnalysisEvent::ItemRetry {
                attempt,
                max_attempts,
                error,
                ..
            } => format!("⚠️ Invocation faulted, retrying ({}/{}): {}", attempt, max_attempts, error),
            AnalysisEvent::ItemForcedSkip { description, .. } => {
                format!("⚠️ No outcome reported, forcing skip: {}", description)
            }
            AnalysisEvent::ItemCompleted { subject, is_target, .. } => {
                let mark = if *is_target { "✓ target" } else { "✗ not a target" };
                format!("   {}: {}", mark, subject)
            }
            AnalysisEvent::FatalFault { context, message, .. } => {
                format!("❌ Fatal fault in {}: {}", context, message)
            }
            AnalysisEvent::AnalysisCompleted { targets, processed, .. } => {
                format!("✅ Done: {} item(s) processed, targets: {:?}", processed, targets)
            }
        }
    }
}

/// A timestamped event log entry
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventLogEntry {
    /// Timestamp of the event
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,
    /// The event
    pub event: AnalysisEvent,
}

impl EventLogEntry {
    /// Create a new log entry with current timestamp
    pub fn new(event: AnalysisEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_session_id() {
        let event = AnalysisEvent::ChecklistGenerated {
            session_id: "sess-123".to_string(),
            item_count: 4,
        };
        assert_eq!(event.session_id(), "sess-123");
    }

    #[test]
    fn test_event_serialization_roundtrip() {
        let events = vec![
            AnalysisEvent::ChecklistGenerated {
                session_id: "s".to_string(),
                item_count: 2,
            },
            AnalysisEvent::ItemStarted {
                session_id: "s".to_string(),
                progress: "0/2".to_string(),
                description: "查閱「3.1入庫單維護」".to_string(),
            },
            AnalysisEvent::ItemRetry {
                session_id: "s".to_string(),
                attempt: 1,
                max_attempts: 3,
                error: "timeout".to_string(),
            },
            AnalysisEvent::ItemForcedSkip {
                session_id: "s".to_string(),
                description: "item".to_string(),
            },
            AnalysisEvent::ItemCompleted {
                session_id: "s".to_string(),
                subject: "doc".to_string(),
                is_target: true,
            },
            AnalysisEvent::FatalFault {
                session_id: "s".to_string(),
                context: "item-engine".to_string(),
                message: "boom".to_string(),
            },
            AnalysisEvent::AnalysisCompleted {
                session_id: "s".to_string(),
                targets: vec!["doc".to_string()],
                processed: 2,
            },
        ];

        for event in events {
            let event_type = event.event_type();
            let json = serde_json::to_string(&event).unwrap();
            let parsed: AnalysisEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed.event_type(), event_type);
            assert_eq!(parsed.session_id(), "s");
        }
    }

    #[test]
    fn test_render_mentions_progress() {
        let event = AnalysisEvent::ItemStarted {
            session_id: "s".to_string(),
            progress: "1/4".to_string(),
            description: "查閱「3.2入庫驗收作業」".to_string(),
        };
        let line = event.render();
        assert!(line.contains("1/4"));
        assert!(line.contains("查閱「3.2入庫驗收作業」"));
    }

    #[test]
    fn test_event_log_entry() {
        let entry = EventLogEntry::new(AnalysisEvent::ChecklistGenerated {
            session_id: "s".to_string(),
            item_count: 1,
        });
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("ts"));
        assert!(json.contains("ChecklistGenerated"));
    }
}
