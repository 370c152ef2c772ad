//! Capability declarations and the validator that accepts a constructed
//! plugin for a role.
//!
//! A plugin declares a [`CapabilitySet`]. Before an instance is accepted into
//! a task the set must contain the required [`Capability`], and the matching
//! `into_*` conversion must yield the typed trait object.
use std::fmt;

use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::identifier::PluginIdentifier;
use crate::plugin_system::traits::{DestinationEndpoint, Interceptor, Plugin, SourceEndpoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Endpoint,
    SourceEndpoint,
    DestinationEndpoint,
    Interceptor,
    Logger,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::Endpoint,
        Capability::SourceEndpoint,
        Capability::DestinationEndpoint,
        Capability::Interceptor,
        Capability::Logger,
    ];

    fn bit(self) -> u8 {
        match self {
            Capability::Endpoint => 1 << 0,
            Capability::SourceEndpoint => 1 << 1,
            Capability::DestinationEndpoint => 1 << 2,
            Capability::Interceptor => 1 << 3,
            Capability::Logger => 1 << 4,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Endpoint => "Endpoint",
            Capability::SourceEndpoint => "SourceEndpoint",
            Capability::DestinationEndpoint => "DestinationEndpoint",
            Capability::Interceptor => "Interceptor",
            Capability::Logger => "Logger",
        };
        f.write_str(name)
    }
}

/// The set of capabilities a plugin declares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapabilitySet(u8);

impl CapabilitySet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn of(capabilities: &[Capability]) -> Self {
        capabilities
            .iter()
            .fold(Self::empty(), |set, capability| set.with(*capability))
    }

    pub fn with(self, capability: Capability) -> Self {
        Self(self.0 | capability.bit())
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL
            .into_iter()
            .filter(move |capability| self.contains(*capability))
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(|c| c.to_string()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

fn mismatch(identifier: &PluginIdentifier, capability: Capability) -> PluginSystemError {
    PluginSystemError::CapabilityMismatch {
        identifier: identifier.to_string(),
        capability,
    }
}

/// Check that `instance` declares `required`.
pub fn validate(
    identifier: &PluginIdentifier,
    instance: &dyn Plugin,
    required: Capability,
) -> Result<(), PluginSystemError> {
    if instance.capabilities().contains(required) {
        Ok(())
    } else {
        Err(mismatch(identifier, required))
    }
}

pub fn expect_source(
    identifier: &PluginIdentifier,
    instance: Box<dyn Plugin>,
) -> Result<Box<dyn SourceEndpoint>, PluginSystemError> {
    validate(identifier, instance.as_ref(), Capability::SourceEndpoint)?;
    instance
        .into_source()
        .ok_or_else(|| mismatch(identifier, Capability::SourceEndpoint))
}

pub fn expect_destination(
    identifier: &PluginIdentifier,
    instance: Box<dyn Plugin>,
) -> Result<Box<dyn DestinationEndpoint>, PluginSystemError> {
    validate(identifier, instance.as_ref(), Capability::DestinationEndpoint)?;
    instance
        .into_destination()
        .ok_or_else(|| mismatch(identifier, Capability::DestinationEndpoint))
}

pub fn expect_interceptor(
    identifier: &PluginIdentifier,
    instance: Box<dyn Plugin>,
) -> Result<Box<dyn Interceptor>, PluginSystemError> {
    validate(identifier, instance.as_ref(), Capability::Interceptor)?;
    instance
        .into_interceptor()
        .ok_or_else(|| mismatch(identifier, Capability::Interceptor))
}

pub fn expect_logger(
    identifier: &PluginIdentifier,
    instance: Box<dyn Plugin>,
) -> Result<Box<dyn log::Log>, PluginSystemError> {
    validate(identifier, instance.as_ref(), Capability::Logger)?;
    instance
        .into_logger()
        .ok_or_else(|| mismatch(identifier, Capability::Logger))
}
