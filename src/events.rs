use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

/// Progress notice sent to the tool host.
///
/// Serializes as `{"type": "status", "data": {"description": ..., "done": ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StatusEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StatusData,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StatusData {
    pub description: String,
    pub done: bool,
}

impl StatusEvent {
    fn status(description: impl Into<String>, done: bool) -> Self {
        Self {
            event_type: "status".to_string(),
            data: StatusData {
                description: description.into(),
                done,
            },
        }
    }

    /// Work is still under way
    pub fn progress(description: impl Into<String>) -> Self {
        Self::status(description, false)
    }

    /// Terminal event; exactly one is sent per invocation
    pub fn done(description: impl Into<String>) -> Self {
        Self::status(description, true)
    }

    pub fn is_done(&self) -> bool {
        self.data.done
    }
}

/// Receiver for status events, supplied by whoever invokes the tool
#[async_trait]
pub trait EventEmitter: Send + Sync {
    async fn emit(&self, event: StatusEvent);
}

/// Drops every event
pub struct NoopEmitter;

#[async_trait]
impl EventEmitter for NoopEmitter {
    async fn emit(&self, _event: StatusEvent) {}
}

/// Writes events to the log
pub struct LogEmitter;

#[async_trait]
impl EventEmitter for LogEmitter {
    async fn emit(&self, event: StatusEvent) {
        info!("[status done={}] {}", event.data.done, event.data.description);
    }
}

/// Prints one JSON object per event on stderr
pub struct JsonLinesEmitter;

#[async_trait]
impl EventEmitter for JsonLinesEmitter {
    async fn emit(&self, event: StatusEvent) {
        match serde_json::to_string(&event) {
            Ok(line) => eprintln!("{line}"),
            Err(e) => debug!("Could not serialize status event: {e}"),
        }
    }
}

#[async_trait]
impl EventEmitter for UnboundedSender<StatusEvent> {
    async fn emit(&self, event: StatusEvent) {
        if self.send(event).is_err() {
            debug!("Status receiver dropped; event discarded");
        }
    }
}
