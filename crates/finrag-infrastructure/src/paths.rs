//! Path management for finrag configuration files.
//!
//! ```text
//! ~/.config/finrag/
//! └── config.toml     # Client configuration (backend address, timeout, symbol)
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

pub struct FinragPaths;

impl FinragPaths {
    /// Returns the finrag configuration directory (e.g. `~/.config/finrag/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("finrag"))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_lives_in_config_dir() {
        if let (Ok(dir), Ok(file)) = (FinragPaths::config_dir(), FinragPaths::config_file()) {
            assert!(dir.ends_with("finrag"));
            assert_eq!(file.parent(), Some(dir.as_path()));
            assert!(file.ends_with("config.toml"));
        }
    }
}
