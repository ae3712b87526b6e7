use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8484";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Overrides `~/.node-console`
pub const HOME_ENV: &str = "NODE_CONSOLE_HOME";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the node GUI API
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Prefilled on the login page
    #[serde(default)]
    pub last_email: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            last_email: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        if let Ok(dir) = env::var(HOME_ENV) {
            if !dir.is_empty() {
                return Some(PathBuf::from(dir));
            }
        }
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".node-console"))
    }

    fn config_path(dir: &Path) -> PathBuf {
        dir.join("config.json")
    }

    /// Read `config.json` from `dir`; missing or unreadable files give `None`
    pub fn load_from(dir: &Path) -> Option<Config> {
        let config_path = Self::config_path(dir);
        if !config_path.exists() {
            return None;
        }

        let contents = fs::read_to_string(&config_path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring malformed config");
                None
            }
        }
    }

    /// Save the config to `dir`
    pub fn save_to(&self, dir: &Path) -> anyhow::Result<()> {
        // Create config directory if it doesn't exist
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(Self::config_path(dir), contents)?;

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            server_url: "https://node.example.org:8443".to_string(),
            last_email: Some("admin@example.org".to_string()),
            timeout_secs: 12,
        };

        config.save_to(dir.path()).unwrap();

        assert_eq!(Config::load_from(dir.path()), Some(config));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.json"), r#"{"last_email": "a@b.c"}"#).unwrap();

        let config = Config::load_from(dir.path()).unwrap();

        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.last_email.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn test_missing_or_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load_from(dir.path()), None);

        fs::write(dir.path().join("config.json"), "not json").unwrap();
        assert_eq!(Config::load_from(dir.path()), None);
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        Config::default().save_to(&nested).unwrap();

        assert!(nested.join("config.json").exists());
    }
}
