//! # Configuration
//!
//! `AgentConfig` plus TOML loading.
//!
//! Precedence, lowest first: built-in defaults, config file, `AGENT_URL`
//! environment variable, explicit overrides from the caller (CLI flags).

use crate::algorithms::{PollPolicy, StatusEndpoint};
use crate::domain::{ConfigError, DEFAULT_INGRESS_EXPIRY_MS};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding the replica URL.
pub const AGENT_URL_ENV: &str = "AGENT_URL";

/// Default replica URL (local development replica).
pub const DEFAULT_URL: &str = "http://127.0.0.1:4943";

/// Agent configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentConfig {
    /// Replica base URL.
    pub url: String,
    /// Ingress expiry horizon in milliseconds.
    pub ingress_expiry_ms: u64,
    /// Status polling schedule.
    pub polling: PollPolicy,
    /// Status endpoint strategy.
    pub status_endpoint: StatusEndpoint,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            ingress_expiry_ms: DEFAULT_INGRESS_EXPIRY_MS,
            polling: PollPolicy::default(),
            status_endpoint: StatusEndpoint::default(),
        }
    }
}

impl AgentConfig {
    /// Defaults pointed at `url`.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Apply `AGENT_URL` if set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(AGENT_URL_ENV) {
            if !url.trim().is_empty() {
                self.url = url;
            }
        }
    }

    /// Reject values the agent cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "agent.url",
                reason: "must not be empty".to_string(),
            });
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                field: "agent.url",
                reason: format!("expected an http(s) URL, got {}", self.url),
            });
        }
        if self.ingress_expiry_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "agent.ingress_expiry_ms",
                reason: "must be positive".to_string(),
            });
        }
        if self.polling.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "polling.max_attempts",
                reason: "must be positive".to_string(),
            });
        }
        if self.polling.multiplier < 1 {
            return Err(ConfigError::Invalid {
                field: "polling.multiplier",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// TomlConfigProvider
// ============================================================================

/// Configuration file structure.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    agent: AgentSection,
    #[serde(default)]
    polling: PollingSection,
}

#[derive(Debug, Default, Deserialize)]
struct AgentSection {
    url: Option<String>,
    ingress_expiry_ms: Option<u64>,
    status_endpoint: Option<StatusEndpoint>,
}

#[derive(Debug, Default, Deserialize)]
struct PollingSection {
    initial_interval_ms: Option<u64>,
    max_interval_ms: Option<u64>,
    multiplier: Option<u32>,
    max_attempts: Option<u32>,
    timeout_secs: Option<u64>,
}

/// TOML-based configuration provider.
///
/// # Config File Format
///
/// ```toml
/// [agent]
/// url = "http://127.0.0.1:4943"
/// ingress_expiry_ms = 300000
/// status_endpoint = "read_state_then_legacy"
///
/// [polling]
/// initial_interval_ms = 500
/// max_interval_ms = 5000
/// multiplier = 2
/// max_attempts = 60
/// timeout_secs = 300
/// ```
///
/// Every key is optional; `timeout_secs = 0` disables the overall deadline.
pub struct TomlConfigProvider {
    config: AgentConfig,
}

impl TomlConfigProvider {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed, or fails validation.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        // Build config with defaults
        let defaults = AgentConfig::default();
        let pc = file.polling;
        let polling = PollPolicy {
            initial_interval: pc
                .initial_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.polling.initial_interval),
            multiplier: pc.multiplier.unwrap_or(defaults.polling.multiplier),
            max_interval: pc
                .max_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.polling.max_interval),
            max_attempts: pc.max_attempts.unwrap_or(defaults.polling.max_attempts),
            timeout: match pc.timeout_secs {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
                None => defaults.polling.timeout,
            },
        };

        let config = AgentConfig {
            url: file.agent.url.unwrap_or(defaults.url),
            ingress_expiry_ms: file
                .agent
                .ingress_expiry_ms
                .unwrap_or(defaults.ingress_expiry_ms),
            polling,
            status_endpoint: file
                .agent
                .status_endpoint
                .unwrap_or(defaults.status_endpoint),
        };
        config.validate()?;

        Ok(Self { config })
    }

    /// The parsed configuration.
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Consume into the parsed configuration.
    pub fn into_config(self) -> AgentConfig {
        self.config
    }
}
