use std::fmt;
use std::str::FromStr;

use semver::{Version, VersionReq};

/// Error type for version parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("Invalid version format")]
    InvalidFormat,
    #[error("Version parse error: {0}")]
    ParseError(String),
}

/// Semantic version of the plugin API exposed by the core
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ApiVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ApiVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Convert to a `semver::Version` for range matching.
    pub fn to_semver(&self) -> Version {
        Version::new(self.major as u64, self.minor as u64, self.patch as u64)
    }
}

impl FromStr for ApiVersion {
    type Err = VersionError;

    /// Parses a version string like "1.2.3"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(VersionError::InvalidFormat);
        }

        let parse_part = |part: &str| -> Result<u32, VersionError> {
            part.parse::<u32>()
                .map_err(|e| VersionError::ParseError(e.to_string()))
        };

        Ok(Self::new(
            parse_part(parts[0])?,
            parse_part(parts[1])?,
            parse_part(parts[2])?,
        ))
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// A semver requirement such as `^0.1` declared by a plugin namespace.
#[derive(Debug, Clone)]
pub struct VersionRange {
    /// The original constraint string (e.g., "^1.2.3", ">=2.0")
    constraint: String,
    req: VersionReq,
}

impl VersionRange {
    pub fn from_constraint(constraint: &str) -> Result<Self, VersionError> {
        let req = VersionReq::parse(constraint).map_err(|e| {
            VersionError::ParseError(format!(
                "Invalid version constraint '{}': {}",
                constraint, e
            ))
        })?;
        Ok(Self {
            constraint: constraint.to_string(),
            req,
        })
    }

    /// Checks if a specific `semver::Version` satisfies this range.
    pub fn includes(&self, version: &Version) -> bool {
        self.req.matches(version)
    }

    pub fn includes_api(&self, version: &ApiVersion) -> bool {
        self.includes(&version.to_semver())
    }

    pub fn constraint_string(&self) -> &str {
        &self.constraint
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.constraint)
    }
}

impl FromStr for VersionRange {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionRange::from_constraint(s)
    }
}
