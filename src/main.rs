//! alertlog demo binary
//!
//! Loads the configuration, initializes the logging facility, emits one
//! record per severity and waits for any alerts they triggered.

use alertlog::{cli::Cli, config::Config, critical};
use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const USAGE: &str = r#"
alertlog usage
  1. Call alertlog::init(&config) once at startup.
  2. Log with the tracing macros everywhere else; use alertlog::critical! for CRITICAL.
  3. [alerts.channels.<LEVEL>] routes that exact level to a channel.
  4. [alerts.channels.default] catches everything at or above its `level` (ERROR if unset).
  5. alerts.keywords limits alerts to records containing one of the keywords.
  6. alerts.prefix is prepended to every alert (e.g. a host name).

Example alertlog.toml:

  [alerts]
  prefix = "[app@web01]"
  keywords = ["DB error", "payment failed"]

  [alerts.channels.default]
  channel = "slack"
  config = { webhook_url = "https://hooks.slack.com/services/XXX/YYY/ZZZ" }
  level = "WARNING"

  [alerts.channels.CRITICAL]
  channel = "telegram"
  config = { bot_token = "123456:ABCDEF", chat_id = "987654321" }
"#;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.usage {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = Config::load(&cli)?;
    let logger = alertlog::init(&config)?;

    debug!("Debug message");
    info!("Info message");
    warn!("Warning message");
    error!("Error message");
    critical!("Critical message");

    let timeout = Duration::from_secs(config.alerts.timeout_seconds + 1);
    if !logger.drain(timeout).await {
        warn!("Some alerts were still in flight at exit");
    }
    Ok(())
}
