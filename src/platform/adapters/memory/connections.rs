//! In-memory host connections and connection registry.

use crate::platform::{
    domain::{ConnectionId, SenderId, SenderKind},
    ports::{ConnectionRegistry, HostConnection, HostError, HostResult},
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// In-memory host connection recording every delivered message.
#[derive(Debug)]
pub struct InMemoryConnection {
    id: SenderId,
    name: String,
    kind: SenderKind,
    permissions: Option<HashSet<String>>,
    connected: AtomicBool,
    inbox: RwLock<Vec<String>>,
}

impl InMemoryConnection {
    fn new(id: SenderId, name: String, kind: SenderKind) -> Self {
        Self {
            id,
            name,
            kind,
            permissions: None,
            connected: AtomicBool::new(true),
            inbox: RwLock::new(Vec::new()),
        }
    }

    /// Creates the host console.
    #[must_use]
    pub fn console() -> Self {
        Self::new(SenderId::Console, "Console".to_owned(), SenderKind::Console)
    }

    /// Creates a connected player with a fresh connection identifier.
    #[must_use]
    pub fn player(name: impl Into<String>) -> Self {
        Self::new(
            SenderId::Connection(ConnectionId::allocate()),
            name.into(),
            SenderKind::Player,
        )
    }

    /// Enables host-side permission checks with the given granted nodes.
    ///
    /// Without this call the connection reports no permission system.
    #[must_use]
    pub fn with_permissions(mut self, nodes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.permissions = Some(nodes.into_iter().map(Into::into).collect());
        self
    }

    /// Marks the connection as closed.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::Release);
    }

    /// Returns the messages delivered so far.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self.inbox.read() {
            Ok(inbox) => inbox.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl HostConnection for InMemoryConnection {
    fn id(&self) -> SenderId {
        self.id
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> SenderKind {
        self.kind
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    fn has_permission(&self, node: &str) -> Option<bool> {
        self.permissions
            .as_ref()
            .map(|granted| granted.contains(node))
    }

    fn send_message(&self, text: &str) -> HostResult<()> {
        if !self.is_connected() {
            return Err(HostError::Disconnected(self.id));
        }

        let mut inbox = self
            .inbox
            .write()
            .map_err(|err| HostError::runtime(std::io::Error::other(err.to_string())))?;
        inbox.push(text.to_owned());
        Ok(())
    }
}

/// In-memory registry of connected senders, preserving join order.
#[derive(Clone, Default)]
pub struct InMemoryConnectionRegistry {
    connections: Arc<RwLock<Vec<Arc<dyn HostConnection>>>>,
}

impl InMemoryConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection at the end of the enumeration order.
    ///
    /// # Errors
    ///
    /// Returns host runtime errors when lock acquisition fails.
    pub fn connect(&self, connection: Arc<dyn HostConnection>) -> HostResult<()> {
        let mut connections = self
            .connections
            .write()
            .map_err(|err| HostError::runtime(std::io::Error::other(err.to_string())))?;
        connections.push(connection);
        Ok(())
    }

    /// Removes a connection. Removing an unknown sender is a no-op.
    ///
    /// # Errors
    ///
    /// Returns host runtime errors when lock acquisition fails.
    pub fn disconnect(&self, id: SenderId) -> HostResult<()> {
        let mut connections = self
            .connections
            .write()
            .map_err(|err| HostError::runtime(std::io::Error::other(err.to_string())))?;
        connections.retain(|connection| connection.id() != id);
        Ok(())
    }
}

impl ConnectionRegistry for InMemoryConnectionRegistry {
    fn online_connections(&self) -> HostResult<Vec<Arc<dyn HostConnection>>> {
        let connections = self
            .connections
            .read()
            .map_err(|err| HostError::runtime(std::io::Error::other(err.to_string())))?;
        Ok(connections
            .iter()
            .filter(|connection| connection.is_connected())
            .cloned()
            .collect())
    }
}
