//! Re-entrancy and suppression guards around the alert path.
//!
//! Two mechanisms keep alert delivery from feeding itself:
//!
//! - [`ReentrancyGuard`] marks the current thread, or the current dispatch
//!   task, as being inside the alert path. A record arriving while the mark is
//!   held is not evaluated.
//! - [`SuppressionGuard`] disables log emission process-wide for as long as an
//!   outbound call is in flight, since the HTTP stack may log on its own.
//!
//! Both are released on drop, so unwinding releases them too.

use crate::severity::Severity;
use std::cell::Cell;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Every severity at or below this is suppressed while a send is in flight.
pub const SUPPRESS_ALL: Severity = Severity::Critical;

thread_local! {
    static ALERT_DEPTH: Cell<usize> = const { Cell::new(0) };
}

tokio::task_local! {
    static IN_DISPATCH: ();
}

static SUPPRESS_DEPTH: AtomicUsize = AtomicUsize::new(0);

/// Held while a record is evaluated and scheduled on this thread.
#[derive(Debug)]
pub struct ReentrancyGuard {
    _not_send: std::marker::PhantomData<*const ()>,
}

impl ReentrancyGuard {
    /// Marks the alert path as active, or returns `None` when it already is.
    pub fn enter() -> Option<Self> {
        if in_alert_path() {
            return None;
        }
        ALERT_DEPTH.with(|depth| depth.set(depth.get() + 1));
        Some(Self {
            _not_send: std::marker::PhantomData,
        })
    }
}

impl Drop for ReentrancyGuard {
    fn drop(&mut self) {
        ALERT_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// True on a thread holding a [`ReentrancyGuard`] or inside a dispatch task.
pub fn in_alert_path() -> bool {
    ALERT_DEPTH.with(|depth| depth.get() > 0) || IN_DISPATCH.try_with(|_| ()).is_ok()
}

/// Runs `future` with the dispatch-task mark set.
pub async fn dispatch_scope<F: Future>(future: F) -> F::Output {
    IN_DISPATCH.scope((), future).await
}

/// Suppresses log emission process-wide while held.
///
/// Guards nest: emission resumes when the last one is dropped.
#[derive(Debug)]
pub struct SuppressionGuard(());

impl SuppressionGuard {
    pub fn engage() -> Self {
        SUPPRESS_DEPTH.fetch_add(1, Ordering::SeqCst);
        Self(())
    }
}

impl Drop for SuppressionGuard {
    fn drop(&mut self) {
        SUPPRESS_DEPTH.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Whether a record of `severity` must be dropped right now.
pub fn is_suppressed(severity: Severity) -> bool {
    severity <= SUPPRESS_ALL && SUPPRESS_DEPTH.load(Ordering::SeqCst) > 0
}
