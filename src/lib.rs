//! alertlog - leveled logging with chat alerts
//!
//! This library installs a `tracing` subscriber writing to the console and to
//! one rotating file per severity, and forwards every record to an alert
//! policy that posts matching records to Slack, Discord or Telegram without
//! blocking the caller.

pub mod alerting;
pub mod cli;
pub mod config;
pub mod error;
pub mod formatting;
pub mod logger;
pub mod logging;
pub mod notification;
pub mod record;
pub mod severity;

pub use config::{AlertChannelTable, AlertConfig, ChannelConfig, ChannelKind, Config, KeywordFilter};
pub use error::{InitError, TransportError};
pub use logger::{global, init, init_with, safe_log, AlertLogger, AlertLoggerBuilder};
pub use record::LogRecord;
pub use severity::Severity;

#[doc(hidden)]
pub use tracing as __tracing;

/// Emits a CRITICAL record: an ERROR event carrying the `critical` field.
///
/// ```
/// alertlog::critical!("payment failed for order {}", 42);
/// ```
#[macro_export]
macro_rules! critical {
    ($($arg:tt)+) => {
        $crate::__tracing::error!(critical = true, $($arg)+)
    };
}
