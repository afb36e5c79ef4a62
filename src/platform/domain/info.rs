//! Static platform metadata reported to the monitoring core.

use super::ParsePlatformKindError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of process the adapter is embedded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformKind {
    /// Dedicated game server.
    Server,
    /// Game client.
    Client,
    /// Proxy sitting in front of one or more servers.
    Proxy,
}

impl PlatformKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Client => "client",
            Self::Proxy => "proxy",
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PlatformKind {
    type Error = ParsePlatformKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "server" => Ok(Self::Server),
            "client" => Ok(Self::Client),
            "proxy" => Ok(Self::Proxy),
            _ => Err(ParsePlatformKindError(value.to_owned())),
        }
    }
}

/// Immutable description of the host platform.
///
/// The monitoring core embeds these values in reports and diagnostics. All
/// accessors are infallible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformInfo {
    kind: PlatformKind,
    name: String,
    implementation_version: String,
    protocol_version: String,
}

impl PlatformInfo {
    /// Host name reported when no override is configured.
    pub const DEFAULT_NAME: &'static str = "Minestom";
    /// Host implementation version reported when no override is configured.
    pub const DEFAULT_IMPLEMENTATION_VERSION: &'static str = "1.0";
    /// Game protocol version reported when no override is configured.
    pub const DEFAULT_PROTOCOL_VERSION: &'static str = "1.16.5";

    /// Creates platform metadata.
    #[must_use]
    pub fn new(
        kind: PlatformKind,
        name: impl Into<String>,
        implementation_version: impl Into<String>,
        protocol_version: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            implementation_version: implementation_version.into(),
            protocol_version: protocol_version.into(),
        }
    }

    /// Returns the platform kind.
    #[must_use]
    pub const fn kind(&self) -> PlatformKind {
        self.kind
    }

    /// Returns the host product name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the host product version.
    #[must_use]
    pub fn implementation_version(&self) -> &str {
        &self.implementation_version
    }

    /// Returns the compatible game protocol version.
    #[must_use]
    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }
}

impl Default for PlatformInfo {
    fn default() -> Self {
        Self::new(
            PlatformKind::Server,
            Self::DEFAULT_NAME,
            Self::DEFAULT_IMPLEMENTATION_VERSION,
            Self::DEFAULT_PROTOCOL_VERSION,
        )
    }
}

impl fmt::Display for PlatformInfo {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} {} ({}, protocol {})",
            self.name, self.implementation_version, self.kind, self.protocol_version
        )
    }
}
