//! Host ports: the tick dispatcher, command system, scheduler and connection
//! registry the adapter attaches to.

use crate::platform::domain::{CommandName, SenderId, SenderKind};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Callback invoked by the host at a tick boundary.
///
/// The argument is an opaque host token: the tick counter at tick start and
/// the tick duration at tick end. Dispatchers compare callbacks by pointer
/// identity, so unregistering requires the exact `Arc` that was registered.
pub type TickCallback = Arc<dyn Fn(u64) + Send + Sync>;

/// A deferred unit of work handed to the host scheduler.
pub type HostTask = Box<dyn FnOnce() + Send + 'static>;

/// Handler invoked by the host command system with the raw argument text.
pub type CommandHandler = Arc<dyn Fn(Arc<dyn HostConnection>, &str) + Send + Sync>;

/// Errors returned by host adapters.
#[derive(Debug, Clone, Error)]
pub enum HostError {
    /// The connection has gone away.
    #[error("sender {0} is disconnected")]
    Disconnected(SenderId),

    /// A command with the same name is already registered.
    #[error("command '{0}' is already registered")]
    DuplicateCommand(CommandName),

    /// The scheduler no longer accepts work.
    #[error("host scheduler is not accepting tasks")]
    SchedulerClosed,

    /// Generic host runtime failure.
    #[error("host runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl HostError {
    /// Wraps a runtime error from the host adapter.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}

/// Tick dispatch points of the host's main loop.
pub trait TickDispatcher: Send + Sync {
    /// Registers a callback fired at the start of every tick.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] when the host rejects the registration.
    fn add_tick_start_callback(&self, callback: TickCallback) -> HostResult<()>;

    /// Removes a previously registered tick-start callback.
    ///
    /// Removing a callback that was never registered succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] when the host fails to update its callback list.
    fn remove_tick_start_callback(&self, callback: &TickCallback) -> HostResult<()>;

    /// Registers a callback fired at the end of every tick.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] when the host rejects the registration.
    fn add_tick_end_callback(&self, callback: TickCallback) -> HostResult<()>;

    /// Removes a previously registered tick-end callback.
    ///
    /// Removing a callback that was never registered succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] when the host fails to update its callback list.
    fn remove_tick_end_callback(&self, callback: &TickCallback) -> HostResult<()>;
}

/// A command as registered with the host command system.
#[derive(Clone)]
pub struct HostCommand {
    /// Command name typed by senders.
    pub name: CommandName,
    /// Handler for the zero-argument syntax.
    pub default_executor: CommandHandler,
    /// Handler for the syntax with trailing free-form arguments.
    pub arguments_executor: CommandHandler,
}

impl fmt::Debug for HostCommand {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("HostCommand")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// The host command system.
pub trait CommandRegistry: Send + Sync {
    /// Registers a command and its syntaxes.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::DuplicateCommand`] when the name is taken.
    fn register(&self, command: HostCommand) -> HostResult<()>;

    /// Removes a command. Removing an unknown command succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] when the host fails to update its registry.
    fn unregister(&self, name: &CommandName) -> HostResult<()>;
}

/// The host's own task scheduler.
pub trait TaskScheduler: Send + Sync {
    /// Queues a task for execution off the caller's stack.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] when the scheduler rejects the task.
    fn submit(&self, task: HostTask) -> HostResult<()>;
}

/// A host connection or session able to issue commands and receive text.
pub trait HostConnection: Send + Sync {
    /// Returns the stable identity of this connection.
    fn id(&self) -> SenderId;

    /// Returns the display name reported by the host.
    fn name(&self) -> String;

    /// Returns the kind of sender behind the connection.
    fn kind(&self) -> SenderKind;

    /// Returns whether the connection is still open.
    fn is_connected(&self) -> bool;

    /// Evaluates a permission node.
    ///
    /// Returns `None` when the host has no permission system.
    fn has_permission(&self, node: &str) -> Option<bool>;

    /// Delivers a message to the connection.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Disconnected`] when the connection has closed.
    fn send_message(&self, text: &str) -> HostResult<()>;
}

/// Enumerator of currently connected senders.
pub trait ConnectionRegistry: Send + Sync {
    /// Returns the connected senders in host enumeration order.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] when the registry cannot be read.
    fn online_connections(&self) -> HostResult<Vec<Arc<dyn HostConnection>>>;
}

/// The set of host ports one plugin instance attaches to.
#[derive(Clone)]
pub struct HostServices {
    /// Tick dispatch points.
    pub ticks: Arc<dyn TickDispatcher>,
    /// Command system.
    pub commands: Arc<dyn CommandRegistry>,
    /// Task scheduler.
    pub scheduler: Arc<dyn TaskScheduler>,
    /// Connection registry.
    pub connections: Arc<dyn ConnectionRegistry>,
}

impl HostServices {
    /// Bundles host ports.
    #[must_use]
    pub const fn new(
        ticks: Arc<dyn TickDispatcher>,
        commands: Arc<dyn CommandRegistry>,
        scheduler: Arc<dyn TaskScheduler>,
        connections: Arc<dyn ConnectionRegistry>,
    ) -> Self {
        Self {
            ticks,
            commands,
            scheduler,
            connections,
        }
    }
}

impl fmt::Debug for HostServices {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("HostServices").finish_non_exhaustive()
    }
}
