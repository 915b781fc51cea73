//! Background worker protocol messages.

use serde::{Deserialize, Serialize};

/// Worker message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerMessageType {
    // Coordinator-to-worker requests
    SyncRequest,
    ClearSyncQueue,

    // Worker-to-coordinator notifications
    SyncStarted,
    SyncCompleted,
    SyncFailed,
}

/// A message sent to/from the background sync worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerMessage {
    #[serde(rename = "type")]
    pub msg_type: WorkerMessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkerMessage {
    /// Create a new worker message stamped with the current time.
    pub fn new(msg_type: WorkerMessageType) -> Self {
        Self {
            msg_type,
            timestamp: Some(chrono::Utc::now().timestamp_millis()),
            error: None,
        }
    }

    /// Create a SYNC_REQUEST message (queue a sync for when the worker can run it).
    pub fn sync_request() -> Self {
        Self::new(WorkerMessageType::SyncRequest)
    }

    /// Create a CLEAR_SYNC_QUEUE message.
    pub fn clear_sync_queue() -> Self {
        Self::new(WorkerMessageType::ClearSyncQueue)
    }

    /// Create a SYNC_STARTED notification.
    pub fn sync_started(timestamp: i64) -> Self {
        Self {
            msg_type: WorkerMessageType::SyncStarted,
            timestamp: Some(timestamp),
            error: None,
        }
    }

    /// Create a SYNC_COMPLETED notification.
    pub fn sync_completed(timestamp: i64) -> Self {
        Self {
            msg_type: WorkerMessageType::SyncCompleted,
            timestamp: Some(timestamp),
            error: None,
        }
    }

    /// Create a SYNC_FAILED notification carrying the failure reason.
    pub fn sync_failed(timestamp: i64, error: &str) -> Self {
        Self {
            msg_type: WorkerMessageType::SyncFailed,
            timestamp: Some(timestamp),
            error: Some(error.to_string()),
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_type_wire_names() {
        let cases = [
            (WorkerMessageType::SyncRequest, "\"SYNC_REQUEST\""),
            (WorkerMessageType::ClearSyncQueue, "\"CLEAR_SYNC_QUEUE\""),
            (WorkerMessageType::SyncStarted, "\"SYNC_STARTED\""),
            (WorkerMessageType::SyncCompleted, "\"SYNC_COMPLETED\""),
            (WorkerMessageType::SyncFailed, "\"SYNC_FAILED\""),
        ];

        for (msg_type, expected) in cases {
            assert_eq!(serde_json::to_string(&msg_type).unwrap(), expected);
        }
    }

    #[test]
    fn sync_request_carries_timestamp() {
        let msg = WorkerMessage::sync_request();
        assert_eq!(msg.msg_type, WorkerMessageType::SyncRequest);
        assert!(msg.timestamp.is_some());
        assert!(msg.error.is_none());
    }

    #[test]
    fn sync_completed_uses_given_timestamp() {
        let msg = WorkerMessage::sync_completed(1700000000000);
        assert_eq!(msg.msg_type, WorkerMessageType::SyncCompleted);
        assert_eq!(msg.timestamp, Some(1700000000000));
    }

    #[test]
    fn sync_failed_carries_error() {
        let msg = WorkerMessage::sync_failed(1700000000000, "network unreachable");
        assert_eq!(msg.msg_type, WorkerMessageType::SyncFailed);
        assert_eq!(msg.error.as_deref(), Some("network unreachable"));
    }

    #[test]
    fn json_roundtrip() {
        let msg = WorkerMessage::sync_failed(42, "boom");
        let json = msg.to_json().unwrap();
        let back = WorkerMessage::from_json(&json).unwrap();

        assert_eq!(back.msg_type, msg.msg_type);
        assert_eq!(back.timestamp, msg.timestamp);
        assert_eq!(back.error, msg.error);
    }

    #[test]
    fn json_omits_absent_fields() {
        let msg = WorkerMessage {
            msg_type: WorkerMessageType::SyncStarted,
            timestamp: None,
            error: None,
        };
        let json = msg.to_json().unwrap();

        assert_eq!(json, r#"{"type":"SYNC_STARTED"}"#);
    }

    #[test]
    fn json_parses_worker_shaped_payload() {
        let json = r#"{"type":"SYNC_COMPLETED","timestamp":1700000000000}"#;
        let msg = WorkerMessage::from_json(json).unwrap();

        assert_eq!(msg.msg_type, WorkerMessageType::SyncCompleted);
        assert_eq!(msg.timestamp, Some(1700000000000));
        assert!(msg.error.is_none());
    }
}
