//! Pipeline lifecycle events.
//!
//! A pipeline emits `pipeline.started`, `stage.started`, `stage.completed`,
//! `stage.failed`, `pipeline.completed` and `pipeline.failed`. Every payload
//! carries the `run_id` of the run that produced it.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink, RecordedEvent};
