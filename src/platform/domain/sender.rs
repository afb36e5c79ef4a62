//! Sender classification and the permission fallback policy.

use super::ParsePermissionPolicyError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of entity able to issue commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderKind {
    /// The host's server console.
    Console,
    /// A connected player.
    Player,
}

impl SenderKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::Player => "player",
        }
    }
}

impl fmt::Display for SenderKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Answer used for permission checks when the host has no permission system.
///
/// Hosts that do evaluate permissions always win; this policy is consulted
/// only when a connection reports no opinion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionPolicy {
    /// Grant every permission to the console and nothing to players.
    #[default]
    ConsoleOnly,
    /// Grant every permission to every sender.
    AllowAll,
    /// Deny every permission to every sender.
    DenyAll,
}

impl PermissionPolicy {
    /// Returns whether a sender of `kind` is granted a permission.
    #[must_use]
    pub const fn allows(self, kind: SenderKind) -> bool {
        match self {
            Self::ConsoleOnly => matches!(kind, SenderKind::Console),
            Self::AllowAll => true,
            Self::DenyAll => false,
        }
    }

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConsoleOnly => "console_only",
            Self::AllowAll => "allow_all",
            Self::DenyAll => "deny_all",
        }
    }
}

impl fmt::Display for PermissionPolicy {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PermissionPolicy {
    type Error = ParsePermissionPolicyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "console_only" => Ok(Self::ConsoleOnly),
            "allow_all" => Ok(Self::AllowAll),
            "deny_all" => Ok(Self::DenyAll),
            _ => Err(ParsePermissionPolicyError(value.to_owned())),
        }
    }
}
