//! Configuration service implementation.
//!
//! Loads [`ClientConfig`] from `~/.config/finrag/config.toml` (or an explicit
//! path) and layers environment overrides on top.

use crate::paths::FinragPaths;
use finrag_core::config::ClientConfig;
use finrag_core::error::{FinragError, Result};
use std::path::{Path, PathBuf};

/// Overrides `base_url`.
pub const ENV_BASE_URL: &str = "FINRAG_API_BASE_URL";
/// Overrides `request_timeout_secs`.
pub const ENV_REQUEST_TIMEOUT: &str = "FINRAG_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
}

impl ConfigService {
    /// Uses the default config file location.
    pub fn new() -> Self {
        Self { path: None }
    }

    /// Uses an explicit config file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Loads the file (if any) and applies process environment overrides.
    pub fn load(&self) -> Result<ClientConfig> {
        let config = self.load_file()?;
        apply_env_overrides(config, |key| std::env::var(key).ok())
    }

    /// Loads only the file. A missing file yields the defaults.
    pub fn load_file(&self) -> Result<ClientConfig> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => match FinragPaths::config_file() {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!("[Config] {}; using defaults", e);
                    return Ok(ClientConfig::default());
                }
            },
        };
        read_config_file(&path)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

fn read_config_file(path: &Path) -> Result<ClientConfig> {
    if !path.exists() {
        tracing::debug!("[Config] {} not found; using defaults", path.display());
        return Ok(ClientConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        FinragError::config(format!(
            "Failed to read configuration file at {}: {}",
            path.display(),
            e
        ))
    })?;

    let config: ClientConfig = toml::from_str(&content).map_err(|e| {
        FinragError::config(format!(
            "Failed to parse configuration file at {}: {}",
            path.display(),
            e
        ))
    })?;

    if config.request_timeout_secs == 0 {
        return Err(FinragError::config(format!(
            "request_timeout_secs in {} must be at least 1",
            path.display()
        )));
    }

    tracing::info!("[Config] Loaded {}", path.display());
    Ok(config)
}

/// Applies `FINRAG_*` overrides read through `lookup`.
pub fn apply_env_overrides<F>(mut config: ClientConfig, lookup: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
        config.base_url = base_url.trim().to_string();
    }

    if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT) {
        config.request_timeout_secs = raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| {
                FinragError::config(format!(
                    "{ENV_REQUEST_TIMEOUT} must be a positive number of seconds, got '{raw}'"
                ))
            })?;
    }

    Ok(config)
}
