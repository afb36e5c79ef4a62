//! Argument tokens forwarded to the monitoring core's command interpreter.

use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Ordered argument tokens of one command invocation.
///
/// The zero-argument syntax yields an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandArguments(Vec<String>);

impl CommandArguments {
    /// Splits trailing argument text on whitespace.
    ///
    /// Runs of whitespace collapse; leading and trailing whitespace is
    /// ignored. Blank input yields an empty list.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(raw.split_whitespace().map(str::to_owned).collect())
    }

    /// Returns the tokens as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Deref for CommandArguments {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
