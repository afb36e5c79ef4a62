//! Identifier and validated-name types for senders and commands.

use super::PlatformDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum length for a registered command name.
const MAX_COMMAND_NAME_LENGTH: usize = 32;

/// Session key the host assigns when a remote client connects.
///
/// Each connection gets a fresh random key, so a client that reconnects
/// counts as a new sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Allocates the key for a newly accepted connection.
    #[must_use]
    pub fn allocate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, formatter)
    }
}

/// Stable identity of a command sender.
///
/// The monitoring core uses this key to deduplicate senders, so it stays the
/// same for the whole life of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum SenderId {
    /// The host's server console.
    Console,
    /// A connected remote session.
    Connection(ConnectionId),
}

impl fmt::Display for SenderId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Console => formatter.write_str("console"),
            Self::Connection(id) => write!(formatter, "connection:{id}"),
        }
    }
}

/// Validated name of the command registered with the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommandName(String);

impl CommandName {
    /// Name registered when no override is configured.
    pub const DEFAULT: &'static str = "spark";

    /// Creates a validated command name.
    ///
    /// The input is trimmed and lowercased. Only characters in `[a-z0-9_-]`
    /// are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformDomainError`] when validation fails.
    pub fn new(value: impl Into<String>) -> Result<Self, PlatformDomainError> {
        let normalized = value.into().trim().to_ascii_lowercase();

        if normalized.is_empty() {
            return Err(PlatformDomainError::EmptyCommandName);
        }

        let is_valid = normalized.chars().all(|character| {
            character.is_ascii_lowercase()
                || character.is_ascii_digit()
                || matches!(character, '_' | '-')
        });
        if !is_valid {
            return Err(PlatformDomainError::InvalidCommandName(normalized));
        }

        if normalized.len() > MAX_COMMAND_NAME_LENGTH {
            return Err(PlatformDomainError::CommandNameTooLong(normalized));
        }

        Ok(Self(normalized))
    }

    /// Returns the command name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CommandName {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl TryFrom<String> for CommandName {
    type Error = PlatformDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CommandName> for String {
    fn from(value: CommandName) -> Self {
        value.0
    }
}

impl AsRef<str> for CommandName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
