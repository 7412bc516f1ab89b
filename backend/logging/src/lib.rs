//! Structured logging for labelscan.
//!
//! Handles subscriber setup with daily rolling NDJSON files, redaction of
//! contact details found on labels, and extraction event records.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, EventLogger, ExtractionEvent};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
