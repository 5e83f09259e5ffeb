// src/formatting.rs

use crate::alerting::DispatchTask;
use crate::config::ChannelKind;
use crate::severity::Severity;
use serde_json::{json, Value};

/// Body of an outbound channel request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Sent as `application/json`.
    Json(Value),
    /// Sent as `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
}

/// A fully rendered request for one alert.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub url: String,
    pub body: RequestBody,
}

impl OutboundRequest {
    /// Renders the request for `task`.
    ///
    /// Returns `None` for unknown channel kinds and for channels missing a
    /// required endpoint parameter; such alerts are dropped.
    pub fn for_task(task: &DispatchTask, telegram_api_base: &str) -> Option<Self> {
        let channel = &task.channel;
        match channel.channel {
            ChannelKind::Slack => Some(Self {
                url: channel.param("webhook_url")?.to_string(),
                body: RequestBody::Json(json!({
                    "text": slack_text(task.severity, &task.message),
                })),
            }),
            ChannelKind::Discord => Some(Self {
                url: channel.param("webhook_url")?.to_string(),
                body: RequestBody::Json(json!({
                    "content": discord_text(task.severity, &task.message),
                })),
            }),
            ChannelKind::Telegram => {
                let bot_token = channel.param("bot_token")?;
                let chat_id = channel.param("chat_id")?;
                Some(Self {
                    url: telegram_url(telegram_api_base, bot_token),
                    body: RequestBody::Form(vec![
                        ("chat_id".to_string(), chat_id.to_string()),
                        ("text".to_string(), telegram_text(task.severity, &task.message)),
                    ]),
                })
            }
            ChannelKind::Unknown => None,
        }
    }
}

pub fn slack_text(severity: Severity, message: &str) -> String {
    format!(":rotating_light: *{}*\n{}", severity, message)
}

pub fn discord_text(severity: Severity, message: &str) -> String {
    format!("🚨 **{}**\n{}", severity, message)
}

pub fn telegram_text(severity: Severity, message: &str) -> String {
    format!("[{}] {}", severity, message)
}

fn telegram_url(api_base: &str, bot_token: &str) -> String {
    format!("{}/bot{}/sendMessage", api_base.trim_end_matches('/'), bot_token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChannelConfig;

    const API: &str = "https://api.telegram.org";

    fn task(channel: ChannelConfig) -> DispatchTask {
        DispatchTask {
            severity: Severity::Error,
            message: "[svc] disk full".to_string(),
            channel,
        }
    }

    #[test]
    fn test_slack_request() {
        let request = OutboundRequest::for_task(&task(ChannelConfig::slack("https://x")), API).unwrap();
        assert_eq!(request.url, "https://x");
        assert_eq!(
            request.body,
            RequestBody::Json(json!({ "text": ":rotating_light: *ERROR*\n[svc] disk full" }))
        );
    }

    #[test]
    fn test_discord_request() {
        let request =
            OutboundRequest::for_task(&task(ChannelConfig::discord("https://d")), API).unwrap();
        assert_eq!(request.url, "https://d");
        assert_eq!(
            request.body,
            RequestBody::Json(json!({ "content": "🚨 **ERROR**\n[svc] disk full" }))
        );
    }

    #[test]
    fn test_telegram_request() {
        let request =
            OutboundRequest::for_task(&task(ChannelConfig::telegram("T", "C")), "http://local/").unwrap();
        assert_eq!(request.url, "http://local/botT/sendMessage");
        assert_eq!(
            request.body,
            RequestBody::Form(vec![
                ("chat_id".to_string(), "C".to_string()),
                ("text".to_string(), "[ERROR] [svc] disk full".to_string()),
            ])
        );
    }

    #[test]
    fn test_incomplete_channels_render_nothing() {
        let slack = ChannelConfig::new(ChannelKind::Slack);
        let telegram = ChannelConfig::new(ChannelKind::Telegram).with_param("bot_token", "T");
        let unknown = ChannelConfig::new(ChannelKind::Unknown).with_param("webhook_url", "https://x");

        assert!(OutboundRequest::for_task(&task(slack), API).is_none());
        assert!(OutboundRequest::for_task(&task(telegram), API).is_none());
        assert!(OutboundRequest::for_task(&task(unknown), API).is_none());
    }
}
