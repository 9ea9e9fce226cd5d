//! Event Bus - pub/sub for analysis progress events
//!
//! Uses a tokio broadcast channel: the session emits, consumers (CLI
//! printer, log writer) subscribe. Emission is fire-and-forget so a slow or
//! absent consumer can never stall the analysis flow.

use tokio::sync::broadcast;
use tracing::debug;

use super::types::AnalysisEvent;

/// Default channel capacity (events)
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Central event bus for one process
pub struct EventBus {
    tx: broadcast::Sender<AnalysisEvent>,
}

impl EventBus {
    /// Create a new event bus with the given capacity
    pub fn new(capacity: usize) -> Self {
        debug!(capacity, "EventBus::new: creating event bus");
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Create a new event bus with default capacity
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Emit an event to all subscribers
    ///
    /// Fire-and-forget: if there are no subscribers the event is dropped.
    pub fn emit(&self, event: AnalysisEvent) {
        debug!(event_type = event.event_type(), session_id = event.session_id(), "EventBus::emit");
        let _ = self.tx.send(event);
    }

    /// Subscribe to receive events emitted after this call
    pub fn subscribe(&self) -> broadcast::Receiver<AnalysisEvent> {
        self.tx.subscribe()
    }

    /// Create an emitter handle bound to a session
    pub fn emitter_for(&self, session_id: impl Into<String>) -> EventEmitter {
        let session_id = session_id.into();
        debug!(%session_id, "EventBus::emitter_for: creating emitter");
        EventEmitter {
            tx: self.tx.clone(),
            session_id,
        }
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

/// Handle for emitting events without owning the bus
///
/// Cheap to clone; pre-binds the session ID.
#[derive(Clone)]
pub struct EventEmitter {
    tx: broadcast::Sender<AnalysisEvent>,
    session_id: String,
}

impl EventEmitter {
    /// Get the session ID this emitter is bound to
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Emit a raw event
    pub fn emit(&self, event: AnalysisEvent) {
        debug!(event_type = event.event_type(), "EventEmitter::emit");
        let _ = self.tx.send(event);
    }

    // === Convenience methods ===

    pub fn checklist_generated(&self, item_count: usize) {
        self.emit(AnalysisEvent::ChecklistGenerated {
            session_id: self.session_id.clone(),
            item_count,
        });
    }

    pub fn item_started(&self, progress: &str, description: &str) {
        self.emit(AnalysisEvent::ItemStarted {
            session_id: self.session_id.clone(),
            progress: progress.to_string(),
            description: description.to_string(),
        });
    }

    pub fn item_retry(&self, attempt: u32, max_attempts: u32, error: &str) {
        self.emit(AnalysisEvent::ItemRetry {
            session_id: self.session_id.clone(),
            attempt,
            max_attempts,
            error: error.to_string(),
        });
    }

    pub fn item_forced_skip(&self, description: &str) {
        self.emit(AnalysisEvent::ItemForcedSkip {
            session_id: self.session_id.clone(),
            description: description.to_string(),
        });
    }

    pub fn item_completed(&self, subject: &str, is_target: bool) {
        self.emit(AnalysisEvent::ItemCompleted {
            session_id: self.session_id.clone(),
            subject: subject.to_string(),
            is_target,
        });
    }

    pub fn fatal_fault(&self, context: &str, message: &str) {
        self.emit(AnalysisEvent::FatalFault {
            session_id: self.session_id.clone(),
            context: context.to_string(),
            message: message.to_string(),
        });
    }

    pub fn analysis_completed(&self, targets: Vec<String>, processed: usize) {
        self.emit(AnalysisEvent::AnalysisCompleted {
            session_id: self.session_id.clone(),
            targets,
            processed,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_and_receive() {
        let bus = EventBus::with_default_capacity();
        let mut rx = bus.subscribe();

        let emitter = bus.emitter_for("sess-1");
        emitter.checklist_generated(3);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type(), "ChecklistGenerated");
        assert_eq!(event.session_id(), "sess-1");
    }

    #[tokio::test]
    async fn test_emit_without_subscribers_does_not_panic() {
        let bus = EventBus::with_default_capacity();
        bus.emitter_for("sess-1").item_forced_skip("item");
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_emitter_binds_session_id() {
        let bus = EventBus::with_default_capacity();
        let mut rx = bus.subscribe();

        let emitter = bus.emitter_for("sess-9");
        emitter.item_started("0/2", "查閱「3.1入庫單維護」");
        emitter.item_completed("查閱「3.1入庫單維護」", true);

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.session_id(), "sess-9");
        assert_eq!(second.event_type(), "ItemCompleted");
    }
}
