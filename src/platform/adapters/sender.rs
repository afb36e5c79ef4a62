//! Command sender adapter wrapping a host connection.

use crate::platform::{
    domain::{PermissionPolicy, SenderId, SenderKind},
    ports::{CommandSender, HostConnection, HostError},
};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Exposes a host connection to the monitoring core.
///
/// The adapter borrows the connection: it never closes it and only delegates
/// permission checks and message delivery. Equality and hashing use the
/// sender identity, so two adapters over the same connection compare equal.
#[derive(Clone)]
pub struct SenderAdapter {
    connection: Arc<dyn HostConnection>,
    permission_policy: PermissionPolicy,
}

impl SenderAdapter {
    /// Wraps a host connection.
    #[must_use]
    pub const fn new(
        connection: Arc<dyn HostConnection>,
        permission_policy: PermissionPolicy,
    ) -> Self {
        Self {
            connection,
            permission_policy,
        }
    }
}

impl CommandSender for SenderAdapter {
    fn identity(&self) -> SenderId {
        self.connection.id()
    }

    fn name(&self) -> String {
        self.connection.name()
    }

    fn kind(&self) -> SenderKind {
        self.connection.kind()
    }

    fn has_permission(&self, node: &str) -> bool {
        self.connection
            .has_permission(node)
            .unwrap_or_else(|| self.permission_policy.allows(self.connection.kind()))
    }

    fn send_message(&self, text: &str) {
        if !self.connection.is_connected() {
            tracing::debug!(sender = %self.identity(), "dropping message to disconnected sender");
            return;
        }

        match self.connection.send_message(text) {
            Ok(()) | Err(HostError::Disconnected(_)) => {}
            Err(err) => {
                tracing::warn!(sender = %self.identity(), error = %err, "failed to deliver message");
            }
        }
    }
}

impl PartialEq for SenderAdapter {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for SenderAdapter {}

impl Hash for SenderAdapter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Debug for SenderAdapter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SenderAdapter")
            .field("identity", &self.identity())
            .field("permission_policy", &self.permission_policy)
            .finish_non_exhaustive()
    }
}
