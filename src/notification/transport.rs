//! HTTP delivery of rendered alerts to chat channels.

use crate::alerting::DispatchTask;
use crate::error::TransportError;
use crate::formatting::{OutboundRequest, RequestBody};
use async_trait::async_trait;
use std::time::Duration;

/// Default timeout for a single outbound call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Delivers one alert. Implementations make a single attempt.
#[async_trait]
pub trait ChannelTransport: Send + Sync {
    async fn send(&self, task: &DispatchTask) -> Result<(), TransportError>;
}

/// Sends alerts over HTTP: JSON for Slack and Discord webhooks, a form post
/// for the Telegram bot API.
pub struct HttpTransport {
    client: reqwest::Client,
    telegram_api_base: String,
}

impl HttpTransport {
    pub fn new(timeout: Duration, telegram_api_base: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            telegram_api_base: telegram_api_base.into(),
        })
    }
}

#[async_trait]
impl ChannelTransport for HttpTransport {
    async fn send(&self, task: &DispatchTask) -> Result<(), TransportError> {
        let Some(request) = OutboundRequest::for_task(task, &self.telegram_api_base) else {
            return Ok(());
        };

        let builder = self.client.post(&request.url);
        let builder = match &request.body {
            RequestBody::Json(payload) => builder.json(payload),
            RequestBody::Form(fields) => builder.form(fields),
        };

        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(TransportError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
