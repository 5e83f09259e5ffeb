//! One timestamp per event, shared by every layer that renders it.

use crate::record::{LogRecord, MessageVisitor};
use crate::severity::Severity;
use chrono::{DateTime, Local};
use std::cell::Cell;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

thread_local! {
    static STAMP: Cell<Option<(usize, DateTime<Local>)>> = const { Cell::new(None) };
}

/// Stamps each event with the current local time.
///
/// Must sit below the output and alert layers, which run after it.
#[derive(Debug, Clone, Copy, Default)]
pub struct StampLayer;

impl<S: Subscriber> Layer<S> for StampLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        STAMP.with(|stamp| stamp.set(Some((event_key(event), Local::now()))));
    }
}

fn event_key(event: &Event<'_>) -> usize {
    event as *const Event<'_> as usize
}

/// The time `event` was stamped at, or now for an unstamped event.
pub fn event_time(event: &Event<'_>) -> DateTime<Local> {
    match STAMP.with(Cell::get) {
        Some((key, time)) if key == event_key(event) => time,
        _ => Local::now(),
    }
}

/// Builds the record for `event` from its fields and stamped time.
pub fn record_of(event: &Event<'_>) -> LogRecord {
    let mut visitor = MessageVisitor::default();
    event.record(&mut visitor);
    LogRecord::new(
        Severity::of(event.metadata()),
        visitor.finish(),
        event_time(event),
    )
}
