// src/config.rs

//! Loads the hooks configuration: the base URI, base transport options and
//! the log level used by the demo binary.

use crate::core::options::ConnectOptions;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::warn;
use url::Url;

/// URI schemes the socket transports understand.
const SUPPORTED_SCHEMES: &[&str] = &["ws", "wss", "http", "https"];

/// Hooks configuration as written in TOML.
///
/// ```toml
/// uri = "wss://example.com"
/// log_level = "debug"
///
/// [options]
/// path = "/socket.io"
/// reconnection = true
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HooksConfig {
    /// The base URI. Initializers may override it; if neither supplies one,
    /// enabling an initializer fails.
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Base transport options, shallow-merged under per-activation overrides.
    #[serde(default)]
    pub options: ConnectOptions,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            uri: None,
            log_level: default_log_level(),
            options: ConnectOptions::default(),
        }
    }
}

impl HooksConfig {
    /// Loads and validates the configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        Self::from_toml_str(&contents).with_context(|| format!("Invalid config in '{path}'"))
    }

    /// Parses and validates the configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: HooksConfig =
            toml::from_str(contents).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            return Err(anyhow!("log_level cannot be empty"));
        }

        match &self.uri {
            Some(uri) => {
                let parsed =
                    Url::parse(uri).with_context(|| format!("uri '{uri}' is not a valid URL"))?;
                if !SUPPORTED_SCHEMES.contains(&parsed.scheme()) {
                    return Err(anyhow!(
                        "uri scheme '{}' is not supported (expected one of: {})",
                        parsed.scheme(),
                        SUPPORTED_SCHEMES.join(", ")
                    ));
                }
            }
            None => {
                warn!("No base uri configured; every initializer must supply its own.");
            }
        }
        Ok(())
    }
}
