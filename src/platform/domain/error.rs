//! Error types for platform-adapter domain validation and parsing.

use super::TickPhase;
use thiserror::Error;

/// Errors returned while constructing or transitioning platform domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlatformDomainError {
    /// The command name is empty after trimming.
    #[error("command name must not be empty")]
    EmptyCommandName,

    /// The command name contains characters outside `[a-z0-9_-]`.
    #[error(
        "command name '{0}' contains invalid characters (only lowercase alphanumeric, '-' and '_' allowed)"
    )]
    InvalidCommandName(String),

    /// The command name exceeds the 32-character limit.
    #[error("command name exceeds 32 character limit: {0}")]
    CommandNameTooLong(String),

    /// Transitioning a tick subscription between two states is invalid.
    #[error("invalid {phase} tick subscription transition: {from} -> {to}")]
    InvalidSubscriptionTransition {
        /// Tick phase the subscription listens to.
        phase: TickPhase,
        /// Current subscription state.
        from: String,
        /// Requested target state.
        to: String,
    },

    /// Transitioning the plugin between two lifecycle states is invalid.
    #[error("invalid plugin lifecycle transition: {from} -> {to}")]
    InvalidPluginTransition {
        /// Current plugin state.
        from: String,
        /// Requested target state.
        to: String,
    },
}

/// Error returned while parsing a platform kind from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown platform kind: {0}")]
pub struct ParsePlatformKindError(pub String);

/// Error returned while parsing a permission policy from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown permission policy: {0}")]
pub struct ParsePermissionPolicyError(pub String);
