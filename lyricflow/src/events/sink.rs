//! Event sinks.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tracing::Level;

/// Receives pipeline lifecycle events.
///
/// `data` is a JSON object that always carries `run_id`.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Handles one event. Sinks must not fail the run.
    async fn emit(&self, event_type: &str, data: Value);
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event_type: &str, _data: Value) {}
}

/// Writes events to `tracing`, with the run id as a structured field.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self::info()
    }
}

impl LoggingEventSink {
    /// Logs at debug level.
    #[must_use]
    pub fn debug() -> Self {
        Self { level: Level::DEBUG }
    }

    /// Logs at info level.
    #[must_use]
    pub fn info() -> Self {
        Self { level: Level::INFO }
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, event_type: &str, data: Value) {
        let run_id = data.get("run_id").and_then(Value::as_str).unwrap_or("-");
        if self.level == Level::DEBUG {
            tracing::debug!(event = event_type, run_id, data = %data, "Pipeline event");
        } else {
            tracing::info!(event = event_type, run_id, data = %data, "Pipeline event");
        }
    }
}

/// One event captured by [`CollectingEventSink`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedEvent {
    /// Event type, such as `stage.completed`.
    pub event_type: String,
    /// Event payload.
    pub data: Value,
}

/// Keeps events in memory in emission order. Used by tests.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: Mutex<Vec<RecordedEvent>>,
}

impl CollectingEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every event so far.
    #[must_use]
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().clone()
    }

    /// Returns the event types in order.
    #[must_use]
    pub fn event_types(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .map(|e| e.event_type.clone())
            .collect()
    }

    /// Returns events whose type equals `event_type`.
    #[must_use]
    pub fn events_of_type(&self, event_type: &str) -> Vec<RecordedEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    /// Returns the number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns true if nothing was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, event_type: &str, data: Value) {
        self.events.lock().push(RecordedEvent {
            event_type: event_type.to_string(),
            data,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_logging_sink_accepts_any_payload() {
        LoggingEventSink::debug()
            .emit("stage.started", json!({"run_id": "r1", "stage": "summary"}))
            .await;
        LoggingEventSink::info().emit("pipeline.failed", json!({})).await;
        NoOpEventSink.emit("pipeline.started", json!({"run_id": "r1"})).await;
    }

    #[tokio::test]
    async fn test_collecting_sink_keeps_order() {
        let sink = CollectingEventSink::new();
        assert!(sink.is_empty());

        sink.emit("stage.started", json!({"stage": "summary"})).await;
        sink.emit("stage.completed", json!({"stage": "summary"})).await;
        sink.emit("stage.started", json!({"stage": "genre"})).await;

        assert_eq!(sink.len(), 3);
        assert_eq!(
            sink.event_types(),
            vec!["stage.started", "stage.completed", "stage.started"]
        );

        let started = sink.events_of_type("stage.started");
        assert_eq!(started.len(), 2);
        assert_eq!(started[1].data["stage"], "genre");
    }
}
