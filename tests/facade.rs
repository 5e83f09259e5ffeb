//! The per-severity rotating files written by the façade.

mod helpers;

use alertlog::config::{Config, ConsoleConfig, FileConfig};
use alertlog::{logging, AlertChannelTable, AlertConfig, AlertLogger, ChannelConfig, Severity};
use helpers::mock_transport::MockTransport;
use serial_test::serial;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tracing::Dispatch;

fn files_in(dir: &TempDir, log_level: &str) -> Config {
    Config {
        log_level: log_level.to_string(),
        console: ConsoleConfig { enabled: false },
        files: FileConfig {
            enabled: true,
            directory: dir.path().to_path_buf(),
            max_files: 3,
        },
        ..Config::default()
    }
}

fn logger_to(transport: Arc<MockTransport>, channels: AlertChannelTable) -> Arc<AlertLogger> {
    let alerts = AlertConfig {
        channels,
        prefix: "[svc]".to_string(),
        ..AlertConfig::default()
    };
    AlertLogger::builder(alerts)
        .transport(transport)
        .build()
        .unwrap()
}

fn read_level_file(dir: &Path, level: &str) -> String {
    let prefix = format!("{}.", level);
    let entry = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap())
        .find(|entry| entry.file_name().to_string_lossy().starts_with(&prefix))
        .unwrap_or_else(|| panic!("no {} file in {}", level, dir.display()));
    fs::read_to_string(entry.path()).unwrap()
}

#[tokio::test]
#[serial]
async fn test_each_level_goes_to_its_own_file() {
    let dir = TempDir::new().unwrap();
    let logger = logger_to(MockTransport::new(), AlertChannelTable::new());
    let (subscriber, guards) = logging::subscriber(&files_in(&dir, "debug"), logger).unwrap();
    let dispatch = Dispatch::new(subscriber);

    tracing::dispatcher::with_default(&dispatch, || {
        tracing::debug!("cache miss");
        tracing::info!("request served");
        tracing::warn!("slow request");
        tracing::error!("disk full");
        alertlog::critical!("oom");
    });
    drop(guards);
    drop(dispatch);

    let error = read_level_file(dir.path(), "error");
    assert!(error.contains("] ERROR - disk full"), "{}", error);
    assert!(!error.contains("oom"));

    let critical = read_level_file(dir.path(), "critical");
    assert!(critical.contains("] CRITICAL - oom"), "{}", critical);
    assert!(!critical.contains("disk full"));

    let info = read_level_file(dir.path(), "info");
    assert_eq!(info.lines().count(), 1);
    assert!(info.starts_with('['));
    assert!(info.trim_end().ends_with("] INFO - request served"));

    assert!(read_level_file(dir.path(), "debug").contains("DEBUG - cache miss"));
    assert!(read_level_file(dir.path(), "warning").contains("WARNING - slow request"));
}

#[tokio::test]
#[serial]
async fn test_level_filter_applies_to_outputs_only() {
    let dir = TempDir::new().unwrap();
    let transport = MockTransport::new();
    let logger = logger_to(
        transport.clone(),
        AlertChannelTable::new().with_channel(Severity::Info, ChannelConfig::slack("https://x")),
    );
    let (subscriber, guards) = logging::subscriber(&files_in(&dir, "warn"), logger.clone()).unwrap();
    let dispatch = Dispatch::new(subscriber);

    tracing::dispatcher::with_default(&dispatch, || {
        tracing::info!("request served");
        tracing::warn!("slow request");
    });
    assert!(logger.drain(Duration::from_secs(2)).await);
    drop(guards);
    drop(dispatch);

    assert!(read_level_file(dir.path(), "info").is_empty());
    assert!(read_level_file(dir.path(), "warning").contains("slow request"));

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].message.ends_with("] INFO - request served"));
}

#[tokio::test]
#[serial]
async fn test_file_line_and_alert_share_the_timestamp() {
    let dir = TempDir::new().unwrap();
    let transport = MockTransport::new();
    let logger = logger_to(
        transport.clone(),
        AlertChannelTable::new().with_channel(Severity::Error, ChannelConfig::slack("https://x")),
    );
    let (subscriber, guards) = logging::subscriber(&files_in(&dir, "debug"), logger.clone()).unwrap();
    let dispatch = Dispatch::new(subscriber);

    tracing::dispatcher::with_default(&dispatch, || tracing::error!("disk full"));
    assert!(logger.drain(Duration::from_secs(2)).await);
    drop(guards);
    drop(dispatch);

    let line = read_level_file(dir.path(), "error");
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message, format!("[svc] {}", line.trim_end()));
}

#[tokio::test]
#[serial]
async fn test_critical_field_value_is_not_consulted() {
    let dir = TempDir::new().unwrap();
    let logger = logger_to(MockTransport::new(), AlertChannelTable::new());
    let (subscriber, guards) = logging::subscriber(&files_in(&dir, "debug"), logger).unwrap();
    let dispatch = Dispatch::new(subscriber);

    tracing::dispatcher::with_default(&dispatch, || {
        tracing::error!(critical = false, "oom");
    });
    drop(guards);
    drop(dispatch);

    assert!(read_level_file(dir.path(), "critical").contains("] CRITICAL - oom"));
    assert!(read_level_file(dir.path(), "error").is_empty());
}
