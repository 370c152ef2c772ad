//! # Broker Core Plugin System Errors
//!
//! Defines [`PluginSystemError`], covering every way a plugin identifier can
//! fail to become an accepted instance: malformed identifiers, unknown
//! namespaces, failing factories, capability mismatches and bad
//! registrations.
use crate::plugin_system::capability::Capability;
use crate::plugin_system::version::VersionError;

#[derive(Debug, thiserror::Error)]
pub enum PluginSystemError {
    #[error("Invalid plugin identifier '{identifier}': {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    #[error("Namespace '{namespace}' specified in '{identifier}' does not exist")]
    NamespaceNotFound { identifier: String, namespace: String },

    #[error("Failed to construct plugin '{identifier}': {message}")]
    ConstructionFailed { identifier: String, message: String },

    #[error("Plugin '{identifier}' does not implement the {capability} capability")]
    CapabilityMismatch {
        identifier: String,
        capability: Capability,
    },

    #[error("Plugin registration error for '{namespace}': {message}")]
    RegistrationError { namespace: String, message: String },

    #[error("Version parsing error: {0}")]
    VersionParsing(#[from] VersionError),
}
