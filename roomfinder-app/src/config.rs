//! Application configuration.
//!
//! Resolution order: built-in defaults, then the JSON file in the user's
//! config directory, then `ROOMFINDER_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use roomfinder_core::{BackendConfig, BackendKind, CoreError, CoreResult, PollingPolicy};

pub const ENV_API_URL: &str = "ROOMFINDER_API_URL";
pub const ENV_LEGACY_URL: &str = "ROOMFINDER_LEGACY_URL";
pub const ENV_POLL_INTERVAL_SECS: &str = "ROOMFINDER_POLL_INTERVAL_SECS";
pub const ENV_POLL_MAX_ATTEMPTS: &str = "ROOMFINDER_POLL_MAX_ATTEMPTS";
pub const ENV_LISTINGS_SOURCE: &str = "ROOMFINDER_LISTINGS_SOURCE";

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_LEGACY_URL: &str = "https://cpanel.roomfinder237.com/user_api";

/// Runtime settings shared by every front end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// REST API base URL
    pub api_url: String,
    /// Legacy PHP API base URL. Empty disables the legacy backend.
    pub legacy_url: String,
    /// Seconds between two payment verifications
    pub poll_interval_secs: u64,
    /// Verification calls before a payment times out
    pub poll_max_attempts: u32,
    /// Backend that serves listings when both can
    pub listings_source: Option<BackendKind>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let policy = PollingPolicy::default();
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            legacy_url: DEFAULT_LEGACY_URL.to_string(),
            poll_interval_secs: policy.interval.as_secs(),
            poll_max_attempts: policy.max_attempts,
            listings_source: None,
        }
    }
}

impl AppConfig {
    /// `<config dir>/roomfinder/config.json`
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("roomfinder").join("config.json"))
    }

    /// Defaults, the config file if present, then the process environment.
    pub fn load() -> CoreResult<Self> {
        let mut config = match Self::default_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config file at {}", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(CoreError::ConfigError(format!(
                    "Cannot read {}: {e}",
                    path.display()
                )));
            }
        };
        serde_json::from_str(&raw)
            .map_err(|e| CoreError::ConfigError(format!("Invalid {}: {e}", path.display())))
    }

    /// Overlay `ROOMFINDER_*` variables read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> CoreResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(url) = get(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(url) = get(ENV_LEGACY_URL) {
            self.legacy_url = url;
        }
        if let Some(raw) = get(ENV_POLL_INTERVAL_SECS) {
            self.poll_interval_secs = parse_number(ENV_POLL_INTERVAL_SECS, &raw)?;
        }
        if let Some(raw) = get(ENV_POLL_MAX_ATTEMPTS) {
            self.poll_max_attempts = parse_number(ENV_POLL_MAX_ATTEMPTS, &raw)?;
        }
        if let Some(raw) = get(ENV_LISTINGS_SOURCE) {
            let kind = raw
                .parse::<BackendKind>()
                .map_err(|e| CoreError::ConfigError(format!("{ENV_LISTINGS_SOURCE}: {e}")))?;
            self.listings_source = Some(kind);
        }
        Ok(())
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.api_url.trim().is_empty() {
            return Err(CoreError::ConfigError("apiUrl must not be empty".to_string()));
        }
        if self.poll_max_attempts == 0 {
            return Err(CoreError::ConfigError(
                "pollMaxAttempts must be at least 1".to_string(),
            ));
        }
        if self.listings_source == Some(BackendKind::Legacy) && !self.legacy_enabled() {
            return Err(CoreError::ConfigError(
                "listingsSource is legacy but legacyUrl is empty".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn legacy_enabled(&self) -> bool {
        !self.legacy_url.trim().is_empty()
    }

    #[must_use]
    pub fn polling_policy(&self) -> PollingPolicy {
        PollingPolicy {
            interval: Duration::from_secs(self.poll_interval_secs),
            max_attempts: self.poll_max_attempts,
        }
    }

    /// Backends to create, REST first.
    #[must_use]
    pub fn backend_configs(&self) -> Vec<BackendConfig> {
        let mut configs = vec![BackendConfig::Rest {
            base_url: self.api_url.trim().to_string(),
        }];
        if self.legacy_enabled() {
            configs.push(BackendConfig::Legacy {
                base_url: self.legacy_url.trim().to_string(),
            });
        }
        configs
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> CoreResult<T> {
    raw.parse()
        .map_err(|_| CoreError::ConfigError(format!("{key} must be a non-negative integer, got {raw:?}")))
}
