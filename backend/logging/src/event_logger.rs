//! Extraction Event Logger
//!
//! One structured record per extraction request, emitted on the
//! `extraction_events` target so it can be routed separately.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ExtractionEvent {
    Completed {
        detections: usize,
        fields_found: usize,
        recognized_text: Vec<String>,
    },
    /// The caller sent something unusable.
    Rejected { reason: String },
    Failed { kind: String, error_msg: String },
}

impl ExtractionEvent {
    fn redact(&mut self) {
        match self {
            ExtractionEvent::Completed {
                recognized_text, ..
            } => {
                for text in recognized_text.iter_mut() {
                    *text = redact_sensitive_data(text);
                }
            }
            ExtractionEvent::Rejected { reason } => *reason = redact_sensitive_data(reason),
            ExtractionEvent::Failed { error_msg, .. } => {
                *error_msg = redact_sensitive_data(error_msg)
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: ExtractionEvent,
}

impl EventLogEntry {
    /// Build a redacted, timestamped entry.
    pub fn new(request_id: &str, mut event: ExtractionEvent) -> Self {
        event.redact();
        Self {
            request_id: request_id.into(),
            timestamp: Utc::now(),
            event,
        }
    }
}

pub struct EventLogger;

impl EventLogger {
    pub fn log_event(request_id: &str, event: ExtractionEvent) {
        let entry = EventLogEntry::new(request_id, event);
        let json = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "extraction_events", request_id = %entry.request_id, event = %json, "Extraction event");
    }
}
