//! Command-line flags
//!
//! Flags win over `config.json`, which wins over built-in defaults.

use crate::config::{Config, HOME_ENV};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "node-console")]
#[command(version)]
#[command(about = "Terminal console for a federated-learning node")]
pub struct Cli {
    /// Node GUI API base URL (e.g. http://localhost:8484)
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// Directory holding config.json and the log file
    #[arg(long, value_name = "DIR", env = HOME_ENV)]
    pub config_dir: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `node_console=trace`
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    pub fn config_dir(&self) -> Option<PathBuf> {
        self.config_dir.clone().or_else(Config::config_dir)
    }

    /// Apply the flags given on the command line on top of `config`
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(server) = &self.server {
            config.server_url = server.clone();
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        config
    }
}
