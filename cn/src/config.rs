//! Listener configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Cli;
use crate::notify::RatePolicy;

/// Main listener configuration. Immutable after startup; there is no
/// hot-reload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Webhook endpoint configuration
    pub webhook: WebhookConfig,

    /// Which processes to alert on
    pub filter: FilterConfig,

    /// Alert presentation
    pub notify: NotifyConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .crashnotify.yml
        let local_config = PathBuf::from(".crashnotify.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/crashnotify/crashnotify.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("crashnotify").join("crashnotify.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::debug!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// CLI flags override file-provided values.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(token) = &cli.access_token {
            self.webhook.access_token = Some(token.clone());
        }
        if let Some(url) = &cli.webhook_url {
            self.webhook.url = Some(url.clone());
        }
        if !cli.programs.is_empty() {
            self.filter.programs = cli.programs.clone();
        }
        if cli.any {
            self.filter.any = true;
        }
        if let Some(prefix) = &cli.subject_prefix {
            self.notify.subject_prefix = Some(prefix.clone());
        }
    }
}

/// Webhook endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Robot access token; the endpoint URL is derived from it
    #[serde(rename = "access-token")]
    pub access_token: Option<String>,

    /// Full webhook URL, overrides the token-derived endpoint
    pub url: Option<String>,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Deliveries allowed per rate window
    #[serde(rename = "max-per-window")]
    pub max_per_window: u32,

    /// Rate window length in seconds
    #[serde(rename = "window-secs")]
    pub window_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            url: None,
            timeout_ms: 10_000,
            max_per_window: 20,
            window_secs: 60,
        }
    }
}

impl WebhookConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn rate_policy(&self) -> RatePolicy {
        RatePolicy {
            max_per_window: self.max_per_window,
            window: Duration::from_secs(self.window_secs),
        }
    }

    /// Resolved endpoint URL; an explicit URL wins over the token-derived
    /// one. `None` when no credential is configured at all.
    pub fn endpoint(&self) -> Option<String> {
        if let Some(url) = &self.url {
            return Some(url.clone());
        }
        self.access_token
            .as_ref()
            .map(|token| format!("{}?access_token={}", dingrobot::DEFAULT_ENDPOINT, token))
    }
}

/// Which processes to alert on
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Watched process names (`name` or `group:name`); empty watches all
    pub programs: Vec<String>,

    /// Watch every child, overriding the list
    pub any: bool,
}

/// Alert presentation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Prefix for the alert subject line
    #[serde(rename = "subject-prefix")]
    pub subject_prefix: Option<String>,
}
