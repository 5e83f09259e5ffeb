//! Configuration management for alertlog
//!
//! This module defines the main `Config` struct and its sub-structs, holding
//! the façade settings (console, rotating files, level filter) and the alert
//! policy (channel table, keywords, prefix). It uses the `figment` crate to
//! layer defaults, an optional TOML file, environment variables and CLI
//! arguments.

use crate::cli::Cli;
use crate::severity::Severity;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// The key of the fallback entry in an [`AlertChannelTable`].
pub const DEFAULT_CHANNEL_KEY: &str = "default";

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Minimum level written by the façade, in `EnvFilter` syntax.
    pub log_level: String,
    /// Console output settings.
    pub console: ConsoleConfig,
    /// Per-severity rotating file settings.
    pub files: FileConfig,
    /// Alert policy and delivery settings.
    pub alerts: AlertConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ConsoleConfig {
    pub enabled: bool,
}

/// One file per severity under `directory`, rotated daily.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub enabled: bool,
    pub directory: PathBuf,
    /// Number of rotated files kept per severity.
    pub max_files: usize,
}

/// Alert policy and delivery settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AlertConfig {
    /// Channel per severity name, plus an optional `default` entry.
    pub channels: AlertChannelTable,
    /// Substrings of which at least one must appear in the rendered record.
    /// Empty matches every record.
    pub keywords: KeywordFilter,
    /// Prepended to every alert message.
    pub prefix: String,
    /// Timeout for a single outbound call.
    pub timeout_seconds: u64,
    /// Worker threads of the dispatch runtime.
    pub dispatch_workers: usize,
    /// Base URL of the Telegram bot API.
    pub telegram_api_base: String,
}

/// Supported messaging backends.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Slack,
    Telegram,
    Discord,
    /// A missing or unrecognized channel name. Resolves, but nothing is sent.
    #[serde(other)]
    #[default]
    Unknown,
}

/// Where and how to deliver an alert.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChannelConfig {
    #[serde(default)]
    pub channel: ChannelKind,
    /// Endpoint parameters: `webhook_url`, or `bot_token` and `chat_id`.
    /// Numbers and booleans are kept in their text form.
    #[serde(default, deserialize_with = "deserialize_params")]
    pub config: HashMap<String, String>,
    /// Minimum severity; only consulted on the `default` entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Severity>,
}

impl ChannelConfig {
    pub fn new(channel: ChannelKind) -> Self {
        Self {
            channel,
            config: HashMap::new(),
            level: None,
        }
    }

    pub fn slack(webhook_url: impl Into<String>) -> Self {
        Self::new(ChannelKind::Slack).with_param("webhook_url", webhook_url)
    }

    pub fn discord(webhook_url: impl Into<String>) -> Self {
        Self::new(ChannelKind::Discord).with_param("webhook_url", webhook_url)
    }

    pub fn telegram(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self::new(ChannelKind::Telegram)
            .with_param("bot_token", bot_token)
            .with_param("chat_id", chat_id)
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = Some(level);
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }

    /// The threshold of a `default` entry. ERROR when unspecified.
    pub fn threshold(&self) -> Severity {
        self.level.unwrap_or(Severity::Error)
    }

    /// The endpoint parameters this channel kind cannot do without.
    pub fn required_params(&self) -> &'static [&'static str] {
        match self.channel {
            ChannelKind::Slack | ChannelKind::Discord => &["webhook_url"],
            ChannelKind::Telegram => &["bot_token", "chat_id"],
            ChannelKind::Unknown => &[],
        }
    }

    pub fn missing_params(&self) -> Vec<&'static str> {
        self.required_params()
            .iter()
            .copied()
            .filter(|key| !self.config.contains_key(*key))
            .collect()
    }
}

/// A scalar endpoint parameter as written in the configuration.
#[derive(Deserialize)]
#[serde(untagged)]
enum ParamValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

impl From<ParamValue> for String {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Text(text) => text,
            ParamValue::Integer(n) => n.to_string(),
            ParamValue::Float(n) => n.to_string(),
            ParamValue::Flag(b) => b.to_string(),
        }
    }
}

fn deserialize_params<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<String, ParamValue>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(key, value)| (key, value.into())).collect())
}

/// Channel configurations keyed by exact severity name or `default`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct AlertChannelTable(HashMap<String, ChannelConfig>);

impl AlertChannelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel(mut self, severity: Severity, channel: ChannelConfig) -> Self {
        self.0.insert(severity.as_str().to_string(), channel);
        self
    }

    pub fn with_default(mut self, channel: ChannelConfig) -> Self {
        self.0.insert(DEFAULT_CHANNEL_KEY.to_string(), channel);
        self
    }

    /// The entry registered for exactly this severity.
    pub fn exact(&self, severity: Severity) -> Option<&ChannelConfig> {
        self.0.get(severity.as_str())
    }

    pub fn default_entry(&self) -> Option<&ChannelConfig> {
        self.0.get(DEFAULT_CHANNEL_KEY)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Describes entries that can never produce a delivered alert.
    ///
    /// Such entries are kept as they are; this only feeds startup warnings.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (key, channel) in &self.0 {
            let known_key = key == DEFAULT_CHANNEL_KEY
                || Severity::ALL.iter().any(|s| s.as_str() == key);
            if !known_key {
                problems.push(format!("channel key '{}' is neither a severity name nor 'default'", key));
            }
            if channel.channel == ChannelKind::Unknown {
                problems.push(format!("channel for '{}' has an unknown kind", key));
            }
            let missing = channel.missing_params();
            if !missing.is_empty() {
                problems.push(format!(
                    "channel for '{}' is missing {}",
                    key,
                    missing.join(", ")
                ));
            }
            if channel.level.is_some() && key != DEFAULT_CHANNEL_KEY {
                problems.push(format!("'level' on '{}' is ignored outside 'default'", key));
            }
        }
        problems.sort();
        problems
    }
}

impl From<HashMap<String, ChannelConfig>> for AlertChannelTable {
    fn from(entries: HashMap<String, ChannelConfig>) -> Self {
        Self(entries)
    }
}

/// Substring filter over rendered records.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct KeywordFilter(Vec<String>);

impl KeywordFilter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keywords.into_iter().map(Into::into).collect())
    }

    /// True when the filter is empty or any keyword occurs in `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.0.is_empty() || self.0.iter().any(|keyword| text.contains(keyword.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Config {
    /// Loads the configuration by layering defaults, the TOML file named by
    /// `cli.config` (if any), `ALERTLOG_` environment variables and finally
    /// the command-line arguments.
    pub fn load(cli: &Cli) -> Result<Self, figment::Error> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if let Some(path) = &cli.config {
            figment = figment.merge(Toml::file(path));
        }
        figment
            // e.g. ALERTLOG_ALERTS__PREFIX="[web01]"
            .merge(Env::prefixed("ALERTLOG_").split("__"))
            .merge(cli.clone())
            .extract()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "debug".to_string(),
            console: ConsoleConfig::default(),
            files: FileConfig::default(),
            alerts: AlertConfig::default(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: PathBuf::from("logs"),
            max_files: 7,
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            channels: AlertChannelTable::default(),
            keywords: KeywordFilter::default(),
            prefix: String::new(),
            timeout_seconds: 5,
            dispatch_workers: 2,
            telegram_api_base: "https://api.telegram.org".to_string(),
        }
    }
}
