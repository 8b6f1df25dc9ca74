//! Configuration loading from disk and the environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::ValidationError;

/// Primary backend origin override.
pub const ENV_API_BASE_URL: &str = "API_BASE_URL";
/// Decision backend origin override.
pub const ENV_DECISION_MAKER_URL: &str = "DECISION_MAKER_URL";
/// Listener port override.
pub const ENV_PORT: &str = "PORT";
/// Static root override.
pub const ENV_STATIC_DIR: &str = "STATIC_DIR";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value '{value}' for {var}: {reason}")]
    Env {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML configuration file.
pub fn load_file(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Apply environment overrides on top of `config`.
///
/// `lookup` abstracts the environment so callers (and tests) can supply their own.
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_BASE_URL) {
        config.backends.primary = url;
    }
    if let Some(url) = lookup(ENV_DECISION_MAKER_URL) {
        config.backends.decision = url;
    }
    if let Some(port) = lookup(ENV_PORT) {
        config.listener.port = port.trim().parse().map_err(|e: std::num::ParseIntError| {
            ConfigError::Env {
                var: ENV_PORT,
                value: port.clone(),
                reason: e.to_string(),
            }
        })?;
    }
    if let Some(dir) = lookup(ENV_STATIC_DIR) {
        config.static_files.root = PathBuf::from(dir);
    }
    Ok(())
}

/// Build the effective configuration: defaults or `path`, then process environment.
///
/// Validation is left to the caller so later layers (CLI flags) can still apply.
pub fn load(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_file(path)?,
        None => ProxyConfig::default(),
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}
