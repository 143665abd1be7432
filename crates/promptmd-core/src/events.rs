//! Store mutation events and the broadcast bus carrying them.
//!
//! `ToolService` emits a [`StoreEvent`] after every successful mutation.
//! Downstream consumers (telemetry, an optimistic-UI overlay) subscribe
//! independently; the catalog itself does not depend on these events, it
//! reacts to the snapshot feeds.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use crate::defaults::EVENT_BUS_CAPACITY;

// =============================================================================
// STORE EVENTS
// =============================================================================

/// A successful mutation against the record store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    ToolCreated { tool_id: String },
    ToolUpdated { tool_id: String },
    ToolDeleted { tool_id: String },
    ToolPublished { tool_id: String },
    ToolSaved { tool_id: String, viewer_id: String },
    ToolUnsaved { tool_id: String, viewer_id: String },
    ToolRated { tool_id: String, viewer_id: String, value: i32 },
    RatingDeleted { tool_id: String, viewer_id: String },
}

impl StoreEvent {
    /// Dot-namespaced event name for logging and wire payloads.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ToolCreated { .. } => "tool.created",
            Self::ToolUpdated { .. } => "tool.updated",
            Self::ToolDeleted { .. } => "tool.deleted",
            Self::ToolPublished { .. } => "tool.published",
            Self::ToolSaved { .. } => "tool.saved",
            Self::ToolUnsaved { .. } => "tool.unsaved",
            Self::ToolRated { .. } => "tool.rated",
            Self::RatingDeleted { .. } => "rating.deleted",
        }
    }

    /// The tool the event concerns.
    pub fn tool_id(&self) -> &str {
        match self {
            Self::ToolCreated { tool_id }
            | Self::ToolUpdated { tool_id }
            | Self::ToolDeleted { tool_id }
            | Self::ToolPublished { tool_id }
            | Self::ToolSaved { tool_id, .. }
            | Self::ToolUnsaved { tool_id, .. }
            | Self::ToolRated { tool_id, .. }
            | Self::RatingDeleted { tool_id, .. } => tool_id,
        }
    }
}

// =============================================================================
// EVENT BUS
// =============================================================================

/// Broadcast bus for [`StoreEvent`]s.
///
/// Emission is fire-and-forget: having no subscribers is not an error, and
/// a lagging subscriber drops its oldest events (tokio broadcast
/// semantics).
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all current subscribers.
    pub fn emit(&self, event: StoreEvent) {
        debug!(
            event_type = event.event_type(),
            tool_id = event.tool_id(),
            subscribers = self.tx.receiver_count(),
            "store event"
        );
        // Err means no live subscribers; the event is simply dropped.
        let _ = self.tx.send(event);
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(EVENT_BUS_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_reaches_subscriber() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        bus.emit(StoreEvent::ToolCreated {
            tool_id: "t1".to_string(),
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type(), "tool.created");
        assert_eq!(event.tool_id(), "t1");
    }

    #[tokio::test]
    async fn test_emit_without_subscribers_is_not_an_error() {
        let bus = EventBus::new(8);
        bus.emit(StoreEvent::ToolDeleted {
            tool_id: "t1".to_string(),
        });
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_multiple_subscribers_each_receive() {
        let bus = EventBus::new(8);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.emit(StoreEvent::ToolSaved {
            tool_id: "t1".to_string(),
            viewer_id: "u1".to_string(),
        });

        assert_eq!(rx1.recv().await.unwrap().tool_id(), "t1");
        assert_eq!(rx2.recv().await.unwrap().tool_id(), "t1");
    }

    #[test]
    fn test_event_type_names() {
        let event = StoreEvent::ToolRated {
            tool_id: "t1".to_string(),
            viewer_id: "u1".to_string(),
            value: 4,
        };
        assert_eq!(event.event_type(), "tool.rated");

        let event = StoreEvent::RatingDeleted {
            tool_id: "t1".to_string(),
            viewer_id: "u1".to_string(),
        };
        assert_eq!(event.event_type(), "rating.deleted");
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = StoreEvent::ToolUnsaved {
            tool_id: "t1".to_string(),
            viewer_id: "u1".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "tool_unsaved");
        assert_eq!(json["tool_id"], "t1");
    }
}
