//! # Broker Core Kernel Errors
//!
//! [`Error`] is the umbrella for everything that can stop a run before any
//! task executes: configuration, plugin resolution at startup and task
//! assembly. Task execution failures never reach this type.
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::config::ConfigError;
use crate::plugin_system::error::PluginSystemError;
use crate::task_manager::error::TaskBuildError;

#[derive(Debug, ThisError)]
pub enum Error {
    /// Specific, typed plugin system error
    #[error("Plugin system error: {0}")]
    PluginSystem(#[from] PluginSystemError),

    /// A task in the configuration could not be assembled
    #[error("Task build error: {0}")]
    TaskBuild(#[from] TaskBuildError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}
