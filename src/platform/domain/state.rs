//! Tick-subscription and plugin lifecycle states.

use super::PlatformDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Boundary of a host tick a subscription listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickPhase {
    /// Fired before the host simulates a tick.
    Start,
    /// Fired after the host finished a tick.
    End,
}

impl TickPhase {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

impl fmt::Display for TickPhase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Registration state of a tick callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionState {
    /// No callback is registered with the host.
    #[default]
    Unregistered,
    /// Exactly one callback is registered with the host.
    Active,
}

impl SubscriptionState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unregistered => "unregistered",
            Self::Active => "active",
        }
    }

    /// Returns whether the subscription currently holds a host callback.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Validates a transition to [`SubscriptionState::Active`].
    ///
    /// # Errors
    ///
    /// Returns [`PlatformDomainError::InvalidSubscriptionTransition`] when the
    /// subscription is already active.
    pub fn ensure_can_activate(self, phase: TickPhase) -> Result<(), PlatformDomainError> {
        if self.is_active() {
            return Err(PlatformDomainError::InvalidSubscriptionTransition {
                phase,
                from: self.as_str().to_owned(),
                to: Self::Active.as_str().to_owned(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for SubscriptionState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Lifecycle state of the plugin as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginState {
    /// Constructed but not yet activated.
    #[default]
    Inactive,
    /// Core constructed and command registered.
    Active,
    /// Shut down; terminal.
    Deactivated,
}

impl PluginState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Active => "active",
            Self::Deactivated => "deactivated",
        }
    }

    /// Returns whether transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Inactive, Self::Active) | (Self::Active, Self::Deactivated)
        )
    }

    /// Validates a transition to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformDomainError::InvalidPluginTransition`] when the
    /// transition is not allowed.
    pub fn ensure_can_transition_to(self, target: Self) -> Result<(), PlatformDomainError> {
        if self.can_transition_to(target) {
            return Ok(());
        }
        Err(PlatformDomainError::InvalidPluginTransition {
            from: self.as_str().to_owned(),
            to: target.as_str().to_owned(),
        })
    }
}

impl fmt::Display for PluginState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
