//! The log record handed from the façade to the alerting core.

use crate::severity::{Severity, CRITICAL_FIELD};
use chrono::{DateTime, Local};
use std::fmt::{self, Write};
use tracing::field::{Field, Visit};

/// Timestamp layout with microsecond precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// A single emitted log record.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

impl LogRecord {
    pub fn new(severity: Severity, message: impl Into<String>, timestamp: DateTime<Local>) -> Self {
        Self {
            severity,
            message: message.into(),
            timestamp,
        }
    }

    /// Creates a record stamped with the current local time.
    pub fn now(severity: Severity, message: impl Into<String>) -> Self {
        Self::new(severity, message, Local::now())
    }

    /// Renders the record as `[timestamp] LEVEL - message`.
    pub fn render(&self) -> String {
        format!(
            "[{}] {} - {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.severity,
            self.message
        )
    }
}

/// Collects the `message` field of an event and appends every other field as
/// `key=value`.
#[derive(Default)]
pub struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    pub fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }

    fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", name, value);
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message.push_str(value),
            CRITICAL_FIELD => {}
            name => self.push_field(name, format_args!("{:?}", value)),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => {
                let _ = write!(self.message, "{:?}", value);
            }
            CRITICAL_FIELD => {}
            name => self.push_field(name, format_args!("{:?}", value)),
        }
    }
}
