//! Decides per record whether an alert fires and on which channel.

use crate::config::{AlertChannelTable, AlertConfig, ChannelConfig, KeywordFilter};
use crate::record::LogRecord;
use crate::severity::Severity;

/// A resolved alert, consumed once by the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchTask {
    pub severity: Severity,
    /// The prefixed, rendered record.
    pub message: String,
    pub channel: ChannelConfig,
}

/// The alert policy: channel table, keyword filter and prefix.
#[derive(Debug, Clone, Default)]
pub struct AlertPolicy {
    channels: AlertChannelTable,
    keywords: KeywordFilter,
    prefix: String,
}

impl AlertPolicy {
    pub fn new(channels: AlertChannelTable, keywords: KeywordFilter, prefix: impl Into<String>) -> Self {
        Self {
            channels,
            keywords,
            prefix: prefix.into(),
        }
    }

    pub fn from_config(config: &AlertConfig) -> Self {
        Self::new(
            config.channels.clone(),
            config.keywords.clone(),
            config.prefix.clone(),
        )
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn channels(&self) -> &AlertChannelTable {
        &self.channels
    }

    /// Returns the alert to send for `record`, if any.
    pub fn decide(&self, record: &LogRecord) -> Option<DispatchTask> {
        let rendered = record.render();
        if !self.keywords.matches(&rendered) {
            return None;
        }

        let channel = self.resolve(record.severity)?;
        Some(DispatchTask {
            severity: record.severity,
            message: format!("{} {}", self.prefix, rendered).trim().to_string(),
            channel: channel.clone(),
        })
    }

    /// An exact severity entry wins; otherwise `default` applies at or above
    /// its threshold.
    pub fn resolve(&self, severity: Severity) -> Option<&ChannelConfig> {
        if let Some(channel) = self.channels.exact(severity) {
            return Some(channel);
        }
        self.channels
            .default_entry()
            .filter(|channel| severity >= channel.threshold())
    }
}
