//! The `tracing` layer feeding emitted events into the alerting core.

use crate::alerting::guard;
use crate::logger::AlertLogger;
use crate::logging::stamp;
use std::sync::Arc;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Hands every event that reaches it to [`AlertLogger::on_record`].
#[derive(Clone)]
pub struct AlertLayer {
    logger: Arc<AlertLogger>,
}

impl AlertLayer {
    pub fn new(logger: Arc<AlertLogger>) -> Self {
        Self { logger }
    }
}

impl<S: Subscriber> Layer<S> for AlertLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        // Skip collecting fields for events raised by the alert path itself.
        if guard::in_alert_path() {
            return;
        }
        self.logger.on_record(&stamp::record_of(event));
    }
}
