//! A mock channel transport for testing the dispatch path.

use alertlog::alerting::DispatchTask;
use alertlog::notification::ChannelTransport;
use alertlog::TransportError;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type SendHook = Box<dyn Fn(&DispatchTask) + Send + Sync>;

/// Records every task it is asked to send.
///
/// An optional delay simulates network latency, and an optional hook runs
/// inside the send, e.g. to log from within the delivery.
#[derive(Default)]
pub struct MockTransport {
    pub sent: Arc<Mutex<Vec<DispatchTask>>>,
    delay: Duration,
    fail: bool,
    hook: Mutex<Option<SendHook>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            ..Self::default()
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn set_hook(&self, hook: impl Fn(&DispatchTask) + Send + Sync + 'static) {
        *self.hook.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn sent(&self) -> Vec<DispatchTask> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl ChannelTransport for MockTransport {
    async fn send(&self, task: &DispatchTask) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(task.clone());
        if let Some(hook) = self.hook.lock().unwrap().as_ref() {
            hook(task);
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(TransportError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(())
    }
}
