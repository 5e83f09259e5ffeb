#![allow(dead_code)]

pub mod mock_transport;

use alertlog::config::{Config, ConsoleConfig, FileConfig};

/// A façade configuration that writes nothing to the console or disk.
pub fn quiet_config() -> Config {
    Config {
        console: ConsoleConfig { enabled: false },
        files: FileConfig {
            enabled: false,
            ..FileConfig::default()
        },
        ..Config::default()
    }
}
