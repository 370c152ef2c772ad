//! # Broker Core Plugin System
//!
//! Everything needed to turn a configured plugin identifier into a live,
//! capability-checked instance.
//!
//! ## Key Submodules and Responsibilities:
//!
//! - **[`identifier`]**: Parses `<namespace>.<TypeName>` identifiers.
//! - **[`args`]**: [`PluginArgs`], the constructor argument mapping handed to factories.
//! - **[`traits`]**: The [`Plugin`] trait and the capability traits a plugin can
//!   satisfy ([`SourceEndpoint`], [`DestinationEndpoint`], [`Interceptor`]), plus
//!   the [`Content`] payload they exchange.
//! - **[`capability`]**: [`Capability`] / [`CapabilitySet`] and the validator that
//!   accepts or rejects an instance for a role.
//! - **[`registry`]**: [`PluginRegistry`], the resolver. Namespaces of factories are
//!   registered at startup and looked up by identifier.
//! - **[`version`]**: API version ranges declared by namespaces.
//! - **[`error`]**: [`PluginSystemError`](error::PluginSystemError).
pub mod args;
pub mod capability;
pub mod error;
pub mod identifier;
pub mod registry;
pub mod traits;
pub mod version;

pub use args::PluginArgs;
pub use capability::{Capability, CapabilitySet};
pub use error::PluginSystemError;
pub use identifier::PluginIdentifier;
pub use registry::{Namespace, PluginFactory, PluginRegistry};
pub use traits::{
    BoxError, Content, DestinationEndpoint, Endpoint, Interceptor, Plugin, SourceEndpoint,
};
pub use version::{ApiVersion, VersionRange};
