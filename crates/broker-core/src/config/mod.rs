//! # Broker Core Configuration
//!
//! The configuration document ([`BrokerConfig`]) and loading it from JSON,
//! YAML (`yaml-config` feature) or TOML (`toml-config` feature), chosen by
//! file extension.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::task_manager::spec::TaskSpec;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported config format for path: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to parse {format} config: {message}")]
    Parse { format: &'static str, message: String },
}

/// The whole configuration for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Identifier of a logger plugin replacing the default sink
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logger: Option<String>,
    /// Task list; `None` means no tasks were configured at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskSpec>>,
}

impl BrokerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logger(mut self, identifier: &str) -> Self {
        self.logger = Some(identifier.to_string());
        self
    }

    pub fn with_tasks(mut self, tasks: Vec<TaskSpec>) -> Self {
        self.tasks = Some(tasks);
        self
    }

    /// Parse a configuration document
    pub fn parse(data: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let parse_error = |format: ConfigFormat, message: String| ConfigError::Parse {
            format: format.extension(),
            message,
        };

        match format {
            ConfigFormat::Json => {
                serde_json::from_str(data).map_err(|e| parse_error(format, e.to_string()))
            }
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => {
                serde_yaml::from_str(data).map_err(|e| parse_error(format, e.to_string()))
            }
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => {
                toml::from_str(data).map_err(|e| parse_error(format, e.to_string()))
            }
        }
    }

    /// Load a configuration file, picking the format from its extension
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded config from {} ({})", path.display(), format.extension());
        Self::parse(&data, format)
    }
}
