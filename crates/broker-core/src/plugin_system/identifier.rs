use std::fmt;
use std::str::FromStr;

use crate::plugin_system::error::PluginSystemError;

/// Separator between the namespace and the type name.
pub const NAMESPACE_SEPARATOR: char = '.';

/// A parsed `<namespace>.<TypeName>` identifier.
///
/// The split happens at the last separator, so namespaces may themselves be
/// dotted (`core.endpoints.FileSource`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginIdentifier {
    full: String,
    split: usize,
}

impl PluginIdentifier {
    /// Parse an identifier, failing with `InvalidIdentifier` when it has no
    /// separator or an empty namespace/type part.
    pub fn parse(identifier: &str) -> Result<Self, PluginSystemError> {
        let invalid = |reason: &str| PluginSystemError::InvalidIdentifier {
            identifier: identifier.to_string(),
            reason: reason.to_string(),
        };

        let split = identifier
            .rfind(NAMESPACE_SEPARATOR)
            .ok_or_else(|| invalid("must be a fully qualified name (namespace.TypeName)"))?;

        if split == 0 {
            return Err(invalid("namespace part is empty"));
        }
        if split + NAMESPACE_SEPARATOR.len_utf8() == identifier.len() {
            return Err(invalid("type name part is empty"));
        }

        Ok(Self {
            full: identifier.to_string(),
            split,
        })
    }

    /// Build an identifier from its two parts.
    pub fn new(namespace: &str, type_name: &str) -> Result<Self, PluginSystemError> {
        Self::parse(&format!("{}{}{}", namespace, NAMESPACE_SEPARATOR, type_name))
    }

    pub fn namespace(&self) -> &str {
        &self.full[..self.split]
    }

    pub fn type_name(&self) -> &str {
        &self.full[self.split + NAMESPACE_SEPARATOR.len_utf8()..]
    }

    pub fn as_str(&self) -> &str {
        &self.full
    }
}

impl fmt::Display for PluginIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl FromStr for PluginIdentifier {
    type Err = PluginSystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PluginIdentifier::parse(s)
    }
}
