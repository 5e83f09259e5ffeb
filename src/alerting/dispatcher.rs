//! Runs alert deliveries as detached tasks off the emitting thread.
use crate::alerting::guard::{self, SuppressionGuard};
use crate::alerting::DispatchTask;
use crate::notification::ChannelTransport;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::runtime::{Handle, Runtime};
use tokio::task::JoinHandle;

/// Spawns one detached task per alert.
///
/// Deliveries run on a dedicated multi-threaded runtime owned by the
/// dispatcher, or on a caller-supplied runtime handle. Handles of unfinished
/// deliveries are kept so that shutdown can wait for them.
pub struct Dispatcher {
    runtime: Option<Runtime>,
    handle: Handle,
    transport: Arc<dyn ChannelTransport>,
    in_flight: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl Dispatcher {
    /// Creates a dispatcher with its own runtime of `workers` threads.
    pub fn new(transport: Arc<dyn ChannelTransport>, workers: usize) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(workers.max(1))
            .thread_name("alert-dispatch")
            .enable_all()
            .build()?;
        let handle = runtime.handle().clone();
        Ok(Self {
            runtime: Some(runtime),
            handle,
            transport,
            in_flight: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Creates a dispatcher spawning onto an existing runtime.
    pub fn with_handle(transport: Arc<dyn ChannelTransport>, handle: Handle) -> Self {
        Self {
            runtime: None,
            handle,
            transport,
            in_flight: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Starts delivering `task` and returns immediately.
    ///
    /// Delivery errors and panics end the task without being reported.
    pub fn schedule(&self, task: DispatchTask) {
        let transport = self.transport.clone();
        let handle = self.handle.spawn(guard::dispatch_scope(async move {
            let _suppress = SuppressionGuard::engage();
            match transport.send(&task).await {
                Ok(()) => metrics::counter!("alertlog_dispatch_sent").increment(1),
                Err(_) => metrics::counter!("alertlog_dispatch_failed").increment(1),
            }
        }));
        metrics::counter!("alertlog_dispatch_scheduled").increment(1);

        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        in_flight.retain(|h| !h.is_finished());
        in_flight.push(handle);
    }

    /// Number of deliveries that have not finished yet.
    pub fn in_flight(&self) -> usize {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        in_flight.retain(|h| !h.is_finished());
        in_flight.len()
    }

    /// Waits up to `timeout` for every delivery scheduled so far.
    ///
    /// Returns `true` when all of them finished in time. Deliveries still
    /// running after the timeout keep running and stay tracked.
    pub async fn drain(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        let handles: Vec<_> = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();

        let mut pending = Vec::new();
        for mut handle in handles {
            if tokio::time::timeout_at(deadline, &mut handle).await.is_err() {
                pending.push(handle);
            }
        }

        let finished = pending.is_empty();
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(pending);
        finished
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        // Dropping a runtime blocks, which panics inside async contexts.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
