//! # Broker Core Task Errors
//!
//! [`TaskBuildError`] aborts the whole run before any task executes.
//! [`TaskExecutionError`] is contained at the task boundary and only logged.
use std::fmt;

use thiserror::Error;

use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::traits::BoxError;

/// The slot a plugin fills within a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginRole {
    Source,
    Destination,
    Interceptor(usize),
}

impl fmt::Display for PluginRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginRole::Source => write!(f, "source"),
            PluginRole::Destination => write!(f, "destination"),
            PluginRole::Interceptor(index) => write!(f, "interceptor[{}]", index),
        }
    }
}

#[derive(Debug, Error)]
pub enum TaskBuildError {
    #[error("Task '{task}': '{key}' not found in config")]
    MissingKey { task: String, key: &'static str },

    #[error("Task '{task}': could not load {role} plugin '{identifier}'")]
    PluginNotFound {
        task: String,
        role: PluginRole,
        identifier: String,
    },

    #[error("Task '{task}': {role} plugin rejected: {source}")]
    Plugin {
        task: String,
        role: PluginRole,
        #[source]
        source: PluginSystemError,
    },
}

impl TaskBuildError {
    /// Label of the task that failed to build
    pub fn task(&self) -> &str {
        match self {
            TaskBuildError::MissingKey { task, .. }
            | TaskBuildError::PluginNotFound { task, .. }
            | TaskBuildError::Plugin { task, .. } => task,
        }
    }
}

#[derive(Debug, Error)]
pub enum TaskExecutionError {
    #[error("Task '{task}': pull from '{identifier}' failed: {source}")]
    Pull {
        task: String,
        identifier: String,
        #[source]
        source: BoxError,
    },

    #[error("Task '{task}': interceptor[{index}] '{identifier}' failed: {source}")]
    Transform {
        task: String,
        index: usize,
        identifier: String,
        #[source]
        source: BoxError,
    },

    #[error("Task '{task}': push to '{identifier}' failed: {source}")]
    Push {
        task: String,
        identifier: String,
        #[source]
        source: BoxError,
    },

    #[error("Task '{task}': panicked during execution: {message}")]
    Panicked { task: String, message: String },
}

impl TaskExecutionError {
    pub fn task(&self) -> &str {
        match self {
            TaskExecutionError::Pull { task, .. }
            | TaskExecutionError::Transform { task, .. }
            | TaskExecutionError::Push { task, .. }
            | TaskExecutionError::Panicked { task, .. } => task,
        }
    }
}
