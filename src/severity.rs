//! Ordered log severities and their mapping onto `tracing` metadata.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{Level, Metadata};

/// Name of the event field that marks an ERROR event as CRITICAL.
pub const CRITICAL_FIELD: &str = "critical";

/// Log severity, totally ordered `Debug < Info < Warning < Error < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "SeverityRepr", into = "String")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown severity: {0}")]
pub struct ParseSeverityError(pub String);

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    /// The upper-case name used in rendered records and channel table keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }

    /// The conventional numeric level (10 for DEBUG through 50 for CRITICAL).
    pub fn number(&self) -> u8 {
        match self {
            Severity::Debug => 10,
            Severity::Info => 20,
            Severity::Warning => 30,
            Severity::Error => 40,
            Severity::Critical => 50,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == number)
    }

    /// Derives the severity of a `tracing` callsite.
    ///
    /// `TRACE` folds into DEBUG. An ERROR callsite that declares the
    /// [`CRITICAL_FIELD`] field is CRITICAL. Only the field's presence counts:
    /// the decision is made per callsite, before any value is recorded, so
    /// `critical = false` is CRITICAL as well.
    pub fn of(metadata: &Metadata<'_>) -> Self {
        match *metadata.level() {
            Level::TRACE | Level::DEBUG => Severity::Debug,
            Level::INFO => Severity::Info,
            Level::WARN => Severity::Warning,
            Level::ERROR => {
                if metadata.fields().field(CRITICAL_FIELD).is_some() {
                    Severity::Critical
                } else {
                    Severity::Error
                }
            }
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" | "TRACE" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "WARNING" | "WARN" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            "CRITICAL" | "FATAL" => Ok(Severity::Critical),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.as_str().to_string()
    }
}

/// Accepted configuration spellings: a name or a numeric level.
#[derive(Deserialize)]
#[serde(untagged)]
enum SeverityRepr {
    Number(u8),
    Name(String),
}

impl TryFrom<SeverityRepr> for Severity {
    type Error = ParseSeverityError;

    fn try_from(repr: SeverityRepr) -> Result<Self, ParseSeverityError> {
        match repr {
            SeverityRepr::Number(n) => {
                Severity::from_number(n).ok_or_else(|| ParseSeverityError(n.to_string()))
            }
            SeverityRepr::Name(name) => name.parse(),
        }
    }
}
