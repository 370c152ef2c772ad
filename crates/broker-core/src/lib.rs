pub mod config;
pub mod kernel;
pub mod plugin_system;
pub mod task_manager;

// Re-export key public types/traits for easier use by the binary and plugins
pub use config::{BrokerConfig, ConfigFormat};
pub use kernel::Runner;
pub use kernel::error::Error as KernelError;
pub use plugin_system::{
    BoxError, Capability, CapabilitySet, Content, DestinationEndpoint, Endpoint, Interceptor,
    Namespace, Plugin, PluginArgs, PluginIdentifier, PluginRegistry, SourceEndpoint,
};
pub use task_manager::{Task, TaskBuilder, TaskSet, TaskSpec};

// Plugins implementing the Logger capability name `log::Log` through this re-export.
pub use log;
