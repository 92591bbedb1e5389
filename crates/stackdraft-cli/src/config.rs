//! Configuration file loading for the CLI.
//!
//! Layout settings come from an optional TOML file; anything not set there
//! falls back to the engine defaults.

use std::{fs, io, path::Path, path::PathBuf};

use log::{debug, info};
use thiserror::Error;

use stackdraft::{AppConfig, StackdraftError};

/// Configuration-related errors for the CLI.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for StackdraftError {
    fn from(err: ConfigError) -> Self {
        StackdraftError::Io(io::Error::other(err.to_string()))
    }
}

/// Loads configuration from an explicit path, or returns defaults.
///
/// # Errors
///
/// Returns an error if an explicit path is provided but the file is
/// missing, unreadable or not valid TOML.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, StackdraftError> {
    match explicit_path {
        Some(path) => {
            let path = path.as_ref();
            info!(path = path.display().to_string(); "Loading configuration");
            load_config_file(path)
        }
        None => {
            debug!("No configuration file given, using default configuration");
            Ok(AppConfig::default())
        }
    }
}

fn load_config_file(path: &Path) -> Result<AppConfig, StackdraftError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}
