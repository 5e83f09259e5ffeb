//! Subscriber assembly for the leveled log façade.
//!
//! The subscriber is a `tracing_subscriber` registry with, in order:
//! the process-wide suppression filter, the [`StampLayer`], an optional
//! console layer, one rolling file per severity, and the [`AlertLayer`].
//!
//! The configured level (or `RUST_LOG`) filters the console and the files
//! only. The alert layer sees every record, so an alert entry for INFO still
//! fires when the console shows WARN and above.

pub mod format;
pub mod layer;
pub mod stamp;

pub use format::RecordFormat;
pub use layer::AlertLayer;
pub use stamp::StampLayer;

use crate::alerting::guard;
use crate::config::Config;
use crate::error::InitError;
use crate::logger::AlertLogger;
use crate::severity::Severity;
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    filter::{self, FilterExt},
    fmt,
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Builds the façade subscriber without installing it.
///
/// The returned guards flush the file writers when dropped and must be kept
/// alive as long as the subscriber is in use.
pub fn subscriber(
    config: &Config,
    logger: Arc<AlertLogger>,
) -> Result<(impl Subscriber + Send + Sync + 'static, Vec<WorkerGuard>), InitError> {
    let mut guards = Vec::new();
    let outputs = output_layers(config, &mut guards)?;

    let subscriber = tracing_subscriber::registry()
        .with(filter::dynamic_filter_fn(|metadata, _| {
            !guard::is_suppressed(Severity::of(metadata))
        }))
        .with(StampLayer)
        .with(outputs)
        .with(AlertLayer::new(logger));

    Ok((subscriber, guards))
}

/// Builds the façade subscriber and installs it as the global default.
pub fn install(config: &Config, logger: Arc<AlertLogger>) -> Result<Vec<WorkerGuard>, InitError> {
    let (subscriber, guards) = subscriber(config, logger)?;
    subscriber.try_init()?;
    Ok(guards)
}

/// `RUST_LOG` when set, the configured level otherwise.
fn level_filter(config: &Config) -> Result<EnvFilter, InitError> {
    Ok(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?)
}

/// The console layer plus one daily-rotated file per severity, each file
/// receiving only its own level.
fn output_layers<S>(config: &Config, guards: &mut Vec<WorkerGuard>) -> Result<Vec<BoxedLayer<S>>, InitError>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let mut layers = Vec::with_capacity(Severity::ALL.len() + 1);

    if config.console.enabled {
        let console = fmt::layer()
            .event_format(RecordFormat)
            .with_writer(std::io::stdout)
            .with_ansi(std::io::stdout().is_terminal())
            .with_filter(level_filter(config)?)
            .boxed();
        layers.push(console);
    }

    if !config.files.enabled {
        return Ok(layers);
    }
    for severity in Severity::ALL {
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(severity.as_str().to_ascii_lowercase())
            .filename_suffix("txt")
            .max_log_files(config.files.max_files.max(1))
            .build(&config.files.directory)?;
        let (writer, guard) = tracing_appender::non_blocking(appender);
        guards.push(guard);

        let only_this_level = filter::filter_fn(move |metadata| Severity::of(metadata) == severity);
        let layer = fmt::layer()
            .event_format(RecordFormat)
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(level_filter(config)?.and(only_this_level))
            .boxed();
        layers.push(layer);
    }
    Ok(layers)
}
