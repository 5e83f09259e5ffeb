//! Error types for facility setup and channel delivery.

use thiserror::Error;

/// Failures while building or installing the logging facility.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to start the dispatch runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("failed to build the channel transport: {0}")]
    Transport(#[from] TransportError),

    #[error("failed to create log file appender: {0}")]
    FileAppender(#[from] tracing_appender::rolling::InitError),

    #[error("invalid log level filter: {0}")]
    LevelFilter(#[from] tracing_subscriber::filter::ParseError),

    #[error("failed to install the global subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Failures of a single outbound alert delivery.
///
/// These never reach the emitting caller; the dispatch task discards them.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("channel responded with status {status}: {body}")]
    Status { status: u16, body: String },
}
