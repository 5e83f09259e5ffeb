//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments of the demo binary using the
//! `clap` crate. These arguments are merged on top of the configuration file
//! and environment variables.

use clap::Parser;
use figment::{
    value::{Dict, Map, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// Leveled logging with chat alerts for matching records.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Minimum log level written to console and files.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Prefix prepended to every alert (e.g. a host name).
    #[arg(long, value_name = "TEXT")]
    pub prefix: Option<String>,

    /// Directory for the per-level log files.
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Disable the per-level log files.
    #[arg(long)]
    pub no_files: bool,

    /// Print usage notes and exit.
    #[arg(long)]
    pub usage: bool,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        if let Some(level) = &self.log_level {
            dict.insert("log_level".into(), Value::from(level.clone()));
        }

        let mut alerts = Dict::new();
        if let Some(prefix) = &self.prefix {
            alerts.insert("prefix".into(), Value::from(prefix.clone()));
        }
        if !alerts.is_empty() {
            dict.insert("alerts".into(), Value::from(alerts));
        }

        let mut files = Dict::new();
        if let Some(dir) = &self.log_dir {
            files.insert("directory".into(), Value::from(dir.display().to_string()));
        }
        // Only an explicit flag overrides; absence keeps the file setting.
        if self.no_files {
            files.insert("enabled".into(), Value::from(false));
        }
        if !files.is_empty() {
            dict.insert("files".into(), Value::from(files));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
