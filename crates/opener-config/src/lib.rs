//! # opener-config
//!
//! Layered configuration loading for the policy issue opener using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`OPENER_*` prefix, `__` as separator)
//! 2. Flat environment names from earlier deployments (`JIRA_URL`, `PORT`, ...)
//! 3. Project-level `./opener.toml`, or the file passed with `--config`
//! 4. User-level `~/.config/issue-opener/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `OPENER_JIRA__URL` -> `jira.url`, `OPENER_RECEIVER__PORT` -> `receiver.port`.
//!
//! # Usage
//!
//! ```no_run
//! use opener_config::OpenerConfig;
//!
//! let config = OpenerConfig::load_with_dotenv(None).expect("config");
//! config.validate().expect("usable config");
//! println!("listening on {}", config.receiver.bind_addr());
//! ```

mod error;
mod jira;
mod receiver;

pub use error::ConfigError;
pub use jira::JiraConfig;
pub use receiver::{POLICY_CHANGED_EVENT_TYPE, ReceiverConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Flat variable names and the keys they populate.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("JIRA_URL", "jira.url"),
    ("JIRA_USER", "jira.user"),
    ("JIRA_TOKEN", "jira.token"),
    ("JIRA_PROJECT", "jira.project"),
    ("ISSUE_TYPE", "jira.issue_type"),
    ("PORT", "receiver.port"),
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OpenerConfig {
    #[serde(default)]
    pub jira: JiraConfig,
    #[serde(default)]
    pub receiver: ReceiverConfig,
}

impl OpenerConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::figment(config_file)
            .extract()
            .map_err(ConfigError::from)
    }

    /// Load `.env` from the current directory, then [`Self::load`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed.
    pub fn load_with_dotenv(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        // A missing .env is normal in containers.
        let _ = dotenvy::dotenv();
        Self::load(config_file)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can extract from it directly or layer extra providers.
    #[must_use]
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = config_file.map_or_else(|| PathBuf::from("opener.toml"), Path::to_path_buf);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment
            .merge(Self::legacy_env())
            .merge(Env::prefixed("OPENER_").split("__"))
    }

    /// Check the loaded values are enough to run the receiver.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when Jira fields are missing and
    /// [`ConfigError::InvalidValue`] for values that cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let missing = self.jira.missing_fields();
        if !missing.is_empty() {
            return Err(ConfigError::NotConfigured {
                section: "jira".into(),
                missing,
            });
        }

        let url = self.jira.url.to_ascii_lowercase();
        if !url.starts_with("https://") && !url.starts_with("http://") {
            return Err(ConfigError::InvalidValue {
                field: "jira.url".into(),
                reason: format!("expected an http(s) URL, got '{}'", self.jira.url),
            });
        }
        if self.jira.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "jira.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.receiver.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "receiver.port".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.receiver.event_type.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "receiver.event_type".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.receiver.max_body_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "receiver.max_body_bytes".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// Unprefixed variables kept for existing deployments.
    fn legacy_env() -> Env {
        Env::raw().filter_map(|key| {
            LEGACY_ENV
                .iter()
                .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
                .map(|(_, path)| (*path).into())
        })
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("issue-opener").join("config.toml"))
    }
}
