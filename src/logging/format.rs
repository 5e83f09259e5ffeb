//! Line format shared by the console and the per-level files.

use crate::logging::stamp;
use crate::severity::Severity;
use nu_ansi_term::Color;
use std::fmt;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::{format, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Writes events as `[timestamp] LEVEL - message key=value`.
///
/// Lines are colored by severity when the writer accepts ANSI escapes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordFormat;

/// Console color of each severity.
pub fn color_of(severity: Severity) -> Color {
    match severity {
        Severity::Debug => Color::Cyan,
        Severity::Info => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
        Severity::Critical => Color::Magenta,
    }
}

impl<S, N> FormatEvent<S, N> for RecordFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let record = stamp::record_of(event);
        if writer.has_ansi_escapes() {
            let color = color_of(record.severity);
            writeln!(writer, "{}{}{}", color.prefix(), record.render(), color.suffix())
        } else {
            writeln!(writer, "{}", record.render())
        }
    }
}
