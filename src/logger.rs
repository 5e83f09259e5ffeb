//! The logging facility: alert policy plus dispatcher, and the process-wide
//! instance behind [`init`].

use crate::alerting::guard::{self, ReentrancyGuard};
use crate::alerting::{AlertPolicy, Dispatcher};
use crate::config::{AlertConfig, Config};
use crate::error::InitError;
use crate::logging::{self, AlertLayer};
use crate::notification::{ChannelTransport, HttpTransport};
use crate::record::LogRecord;
use crate::severity::Severity;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

/// Evaluates records against the alert policy and dispatches alerts.
pub struct AlertLogger {
    policy: AlertPolicy,
    dispatcher: Dispatcher,
}

impl AlertLogger {
    /// Creates a new `AlertLoggerBuilder` for the given alert settings.
    pub fn builder(config: AlertConfig) -> AlertLoggerBuilder {
        AlertLoggerBuilder::new(config)
    }

    pub fn policy(&self) -> &AlertPolicy {
        &self.policy
    }

    /// Log emission hook: stamps `message` with the current time and
    /// evaluates it.
    pub fn emit(&self, severity: Severity, message: impl Into<String>) {
        self.on_record(&LogRecord::now(severity, message));
    }

    /// Evaluates `record` and schedules an alert if the policy fires.
    ///
    /// Returns without doing anything while emission is suppressed or when
    /// called from within the alert path.
    pub fn on_record(&self, record: &LogRecord) {
        if guard::is_suppressed(record.severity) {
            return;
        }
        let Some(_entered) = ReentrancyGuard::enter() else {
            return;
        };

        if let Some(task) = self.policy.decide(record) {
            debug!(severity = %task.severity, channel = ?task.channel.channel, "Scheduling alert");
            self.dispatcher.schedule(task);
        }
    }

    /// A `tracing` layer forwarding events to this logger.
    pub fn layer(self: &Arc<Self>) -> AlertLayer {
        AlertLayer::new(self.clone())
    }

    /// Number of alerts still being delivered.
    pub fn in_flight(&self) -> usize {
        self.dispatcher.in_flight()
    }

    /// Waits up to `timeout` for pending deliveries. See [`Dispatcher::drain`].
    pub async fn drain(&self, timeout: Duration) -> bool {
        self.dispatcher.drain(timeout).await
    }
}

/// Builder for [`AlertLogger`].
///
/// Defaults to an [`HttpTransport`] and a dedicated dispatch runtime; both can
/// be overridden, which is how tests inject a fake transport.
pub struct AlertLoggerBuilder {
    config: AlertConfig,
    transport: Option<Arc<dyn ChannelTransport>>,
    runtime: Option<Handle>,
}

impl AlertLoggerBuilder {
    pub fn new(config: AlertConfig) -> Self {
        Self {
            config,
            transport: None,
            runtime: None,
        }
    }

    /// Overrides the channel transport.
    pub fn transport(mut self, transport: Arc<dyn ChannelTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Spawns deliveries on an existing runtime instead of a dedicated one.
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    pub fn build(self) -> Result<Arc<AlertLogger>, InitError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(
                Duration::from_secs(self.config.timeout_seconds),
                self.config.telegram_api_base.clone(),
            )?),
        };

        let dispatcher = match self.runtime {
            Some(handle) => Dispatcher::with_handle(transport, handle),
            None => Dispatcher::new(transport, self.config.dispatch_workers)
                .map_err(InitError::Runtime)?,
        };

        Ok(Arc::new(AlertLogger {
            policy: AlertPolicy::from_config(&self.config),
            dispatcher,
        }))
    }
}

struct Facility {
    logger: Arc<AlertLogger>,
    _file_guards: Vec<WorkerGuard>,
}

static FACILITY: OnceCell<Facility> = OnceCell::new();

/// Initializes the process-wide facility and installs the global subscriber.
///
/// Only the first successful call has an effect; later calls return the
/// existing logger and ignore `config`.
pub fn init(config: &Config) -> Result<Arc<AlertLogger>, InitError> {
    init_with(config, AlertLogger::builder(config.alerts.clone()))
}

/// Like [`init`], with a caller-prepared builder for the alert logger.
pub fn init_with(config: &Config, builder: AlertLoggerBuilder) -> Result<Arc<AlertLogger>, InitError> {
    let facility = FACILITY.get_or_try_init(|| {
        let logger = builder.build()?;
        let file_guards = logging::install(config, logger.clone())?;

        let channels = logger.policy().channels();
        info!(
            channels = channels.len(),
            prefix = %logger.policy().prefix(),
            "Logging initialized"
        );
        for problem in channels.problems() {
            warn!("Alert channel ignored at send time: {}", problem);
        }

        Ok::<_, InitError>(Facility {
            logger,
            _file_guards: file_guards,
        })
    })?;
    Ok(facility.logger.clone())
}

/// The process-wide logger, if [`init`] has succeeded.
pub fn global() -> Option<Arc<AlertLogger>> {
    FACILITY.get().map(|facility| facility.logger.clone())
}

/// Logs through the façade when it is initialized, otherwise prints
/// `[LEVEL] message` (to stderr for ERROR and CRITICAL).
pub fn safe_log(severity: Severity, message: &str) {
    if FACILITY.get().is_none() {
        if severity >= Severity::Error {
            eprintln!("[{}] {}", severity, message);
        } else {
            println!("[{}] {}", severity, message);
        }
        return;
    }

    match severity {
        Severity::Debug => tracing::debug!("{}", message),
        Severity::Info => tracing::info!("{}", message),
        Severity::Warning => tracing::warn!("{}", message),
        Severity::Error => tracing::error!("{}", message),
        Severity::Critical => crate::critical!("{}", message),
    }
}
