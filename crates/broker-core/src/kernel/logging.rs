//! Process logger selection and installation.
//!
//! The process has exactly one logging sink, installed once before any task
//! runs: either a logger plugin named in the configuration or the default
//! `env_logger` sink.
use log::LevelFilter;

use crate::kernel::constants;
use crate::plugin_system::args::PluginArgs;
use crate::plugin_system::capability;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::identifier::PluginIdentifier;
use crate::plugin_system::registry::PluginRegistry;

/// The sink chosen for this process.
pub enum LoggerSelection {
    /// Keep the default sink. `fallback` explains why a configured logger
    /// was not used.
    Default { fallback: Option<String> },
    Custom {
        identifier: PluginIdentifier,
        logger: Box<dyn log::Log>,
    },
}

impl LoggerSelection {
    pub fn is_default(&self) -> bool {
        matches!(self, LoggerSelection::Default { .. })
    }

    pub fn identifier(&self) -> Option<&PluginIdentifier> {
        match self {
            LoggerSelection::Default { .. } => None,
            LoggerSelection::Custom { identifier, .. } => Some(identifier),
        }
    }
}

impl std::fmt::Debug for LoggerSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggerSelection::Default { fallback } => f
                .debug_struct("Default")
                .field("fallback", fallback)
                .finish(),
            LoggerSelection::Custom { identifier, .. } => f
                .debug_struct("Custom")
                .field("identifier", identifier)
                .finish(),
        }
    }
}

/// The default sink: `env_logger`, filtered by `RUST_LOG` (default `info`).
pub fn default_logger() -> env_logger::Logger {
    let env = env_logger::Env::default()
        .filter_or(constants::LOG_ENV_VAR, constants::DEFAULT_LOG_FILTER);
    env_logger::Builder::from_env(env).build()
}

/// Pick the process logger.
///
/// An unknown type or a plugin without the Logger capability falls back to
/// the default sink. A malformed identifier, unknown namespace or failing
/// constructor is an error.
pub fn select(
    registry: &PluginRegistry,
    identifier: Option<&str>,
) -> Result<LoggerSelection, PluginSystemError> {
    let Some(identifier) = identifier else {
        return Ok(LoggerSelection::Default { fallback: None });
    };

    let Some((id, instance)) = registry.resolve(identifier, &PluginArgs::new())? else {
        return Ok(LoggerSelection::Default {
            fallback: Some(format!("logger plugin '{}' not found", identifier)),
        });
    };

    match capability::expect_logger(&id, instance) {
        Ok(logger) => Ok(LoggerSelection::Custom {
            identifier: id,
            logger,
        }),
        Err(e @ PluginSystemError::CapabilityMismatch { .. }) => Ok(LoggerSelection::Default {
            fallback: Some(e.to_string()),
        }),
        Err(e) => Err(e),
    }
}

/// Install the selected sink as the process logger.
///
/// Returns `false` when a logger was already installed; the existing one
/// stays in place.
pub fn install(selection: LoggerSelection) -> bool {
    let (installed, fallback) = match selection {
        LoggerSelection::Default { fallback } => {
            let logger = default_logger();
            let max_level = logger.filter();
            let installed = log::set_boxed_logger(Box::new(logger)).is_ok();
            if installed {
                log::set_max_level(max_level);
            }
            (installed, fallback)
        }
        LoggerSelection::Custom { identifier, logger } => {
            let installed = log::set_boxed_logger(logger).is_ok();
            if installed {
                log::set_max_level(LevelFilter::Trace);
                log::info!("Using logger plugin '{}'", identifier);
            }
            (installed, None)
        }
    };

    if !installed {
        log::debug!("A process logger is already installed; keeping it");
    }
    if let Some(reason) = fallback {
        log::warn!("{}; keeping the default logger", reason);
    }
    installed
}
