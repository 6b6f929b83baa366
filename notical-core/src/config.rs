//! Service configuration.
//!
//! The original deployment wired its calendar path, timezone, and API client
//! up as module globals; here everything lives in one explicit struct loaded
//! from `~/.config/notical/config.toml` (or a path given via the
//! `NOTICAL_CONFIG` environment variable). Every field has a default, so a
//! missing file is fine.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{NoticalError, NoticalResult};

fn default_calendar_file() -> PathBuf {
    PathBuf::from("calendar.ics")
}

fn default_timezone() -> String {
    "Asia/Shanghai".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_index_file() -> PathBuf {
    PathBuf::from("static/index.html")
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_api_base_url() -> String {
    "https://api.deepseek.com".to_string()
}

fn default_api_key_env() -> String {
    "DEEPSEEK_API_KEY".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct NoticalConfig {
    /// Path of the shared calendar document
    #[serde(default = "default_calendar_file")]
    pub calendar_file: PathBuf,

    /// IANA timezone name all timestamps are normalized into
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Static front-end entry page served at `/`
    #[serde(default = "default_index_file")]
    pub index_file: PathBuf,

    /// Model identifier sent to the completion API
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the completion API (OpenAI-compatible)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Timeout for a single extraction call; there are no retries
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for NoticalConfig {
    fn default() -> Self {
        NoticalConfig {
            calendar_file: default_calendar_file(),
            timezone: default_timezone(),
            port: default_port(),
            index_file: default_index_file(),
            model: default_model(),
            api_base_url: default_api_base_url(),
            api_key_env: default_api_key_env(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl NoticalConfig {
    /// Default config location: ~/.config/notical/config.toml
    pub fn config_path() -> NoticalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| NoticalError::Config("Could not determine config directory".into()))?
            .join("notical");

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from `path`, falling back to defaults if it does not exist.
    pub fn load(path: &Path) -> NoticalResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| NoticalError::Config(e.to_string()))
        } else {
            Ok(NoticalConfig::default())
        }
    }

    pub fn timezone(&self) -> NoticalResult<Tz> {
        self.timezone
            .parse()
            .map_err(|_| NoticalError::Config(format!("Unknown timezone '{}'", self.timezone)))
    }

    pub fn api_key(&self) -> NoticalResult<String> {
        std::env::var(&self.api_key_env).map_err(|_| {
            NoticalError::Config(format!(
                "Extraction API key not set; export {}",
                self.api_key_env
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: NoticalConfig =
            toml::from_str("calendar_file = \"/tmp/cal.ics\"\nport = 9001\n").unwrap();
        assert_eq!(config.calendar_file, PathBuf::from("/tmp/cal.ics"));
        assert_eq!(config.port, 9001);
        assert_eq!(config.timezone, "Asia/Shanghai");
        assert_eq!(config.model, "deepseek-chat");
    }

    #[test]
    fn timezone_parses_to_tz() {
        let config = NoticalConfig::default();
        assert_eq!(config.timezone().unwrap(), chrono_tz::Asia::Shanghai);

        let bad = NoticalConfig {
            timezone: "Mars/Olympus".to_string(),
            ..NoticalConfig::default()
        };
        assert!(bad.timezone().is_err());
    }
}
