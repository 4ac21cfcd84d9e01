// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Probe path {name} must start with '/', got {path:?}")]
    InvalidPath { name: &'static str, path: String },

    #[error("Probe path {0:?} is used by more than one endpoint")]
    DuplicatePath(String),

    #[error("Probe server is enabled but no port is configured")]
    MissingPort,

    #[error("Failed to read configuration from the environment: {0}")]
    Environment(#[from] ::config::ConfigError),
}

/// Load configuration from a file (YAML or JSON)
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .context("Failed to read config file")?;

    let extension = path.extension().and_then(|s| s.to_str());
    let config: Config = if extension == Some("yaml") || extension == Some("yml") {
        serde_yaml::from_str(&contents).context("Failed to parse YAML config")?
    } else {
        serde_json::from_str(&contents).context("Failed to parse JSON config")?
    };

    config.validate()?;
    Ok(config)
}

impl Config {
    /// Build the configuration from `<PREFIX>_*` environment variables.
    ///
    /// Nested keys use a double underscore, e.g. `KAFKA_HEALTH_PROBE__PORT`.
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let config: Config = ::config::Config::builder()
            .add_source(
                ::config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let probe = &self.probe;
        let paths = [
            ("health_path", &probe.health_path),
            ("ready_path", &probe.ready_path),
            ("status_path", &probe.status_path),
        ];

        let mut seen = HashSet::new();
        for (name, path) in paths {
            if !path.starts_with('/') {
                return Err(ConfigError::InvalidPath {
                    name,
                    path: path.clone(),
                });
            }
            if !seen.insert(path.as_str()) {
                return Err(ConfigError::DuplicatePath(path.clone()));
            }
        }

        if probe.enabled && probe.port == 0 {
            return Err(ConfigError::MissingPort);
        }

        Ok(())
    }
}
