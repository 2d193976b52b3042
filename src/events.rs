use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Receiver name of the companion UI process.
pub const UI_RECEIVER: &str = "UI";

/// Lifecycle marker carried by an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Begin,
    End,
}

/// Notification record pushed onto the event bus at pipeline stage boundaries.
///
/// Events are immutable once created; only `acknowledged` changes, and only
/// when a receiver consumes the event off the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Name of the intended consumer, e.g. [`UI_RECEIVER`].
    pub receiver: String,
    /// Instant of emission; monotonic with respect to pipeline order.
    pub timestamp: DateTime<Utc>,
    /// Logical operation, e.g. "plan" or "destroy".
    pub command: String,
    /// Lifecycle marker.
    pub kind: EventKind,
    /// Identifier of the affected resource; empty for pipeline-level events.
    pub address: String,
    /// Extensible payload.
    pub attributes: BTreeMap<String, serde_json::Value>,
    /// Working-directory context of the run.
    pub path: PathBuf,
    /// True once a receiver has consumed the event.
    pub acknowledged: bool,
}

impl Event {
    /// Pipeline-level lifecycle event: empty address, correlation id in
    /// `attributes` under `run_id`.
    pub fn lifecycle(
        receiver: &str,
        command: &str,
        kind: EventKind,
        path: &Path,
        run_id: uuid::Uuid,
    ) -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert(
            "run_id".to_string(),
            serde_json::Value::String(run_id.to_string()),
        );
        Self {
            receiver: receiver.to_string(),
            timestamp: Utc::now(),
            command: command.to_string(),
            kind,
            address: String::new(),
            attributes,
            path: path.to_path_buf(),
            acknowledged: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_event_has_empty_address_and_run_id() {
        let run_id = uuid::Uuid::new_v4();
        let event = Event::lifecycle(
            UI_RECEIVER,
            "plan",
            EventKind::Begin,
            Path::new("/work"),
            run_id,
        );
        assert_eq!(event.receiver, "UI");
        assert_eq!(event.address, "");
        assert!(!event.acknowledged);
        assert_eq!(
            event.attributes.get("run_id"),
            Some(&serde_json::Value::String(run_id.to_string()))
        );
    }

    #[test]
    fn kind_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&EventKind::Begin).unwrap(), "\"begin\"");
        assert_eq!(serde_json::to_string(&EventKind::End).unwrap(), "\"end\"");
    }
}
