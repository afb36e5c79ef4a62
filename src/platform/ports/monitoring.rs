//! Monitoring-core ports: what the core exposes to the adapter, and the
//! capabilities the adapter provides back to the core.

use crate::platform::domain::{
    CommandName, PlatformDomainError, PlatformInfo, SenderId, SenderKind, SubscriptionState,
    TickPhase,
};
use crate::platform::ports::{HostError, HostTask};
use camino::Utf8Path;
use std::sync::Arc;
use thiserror::Error;

/// Result type for monitoring-core operations.
pub type MonitoringCoreResult<T> = Result<T, MonitoringCoreError>;

/// Errors reported by the monitoring core.
#[derive(Debug, Clone, Error)]
pub enum MonitoringCoreError {
    /// The interpreter rejected a command; the text is shown to the sender.
    #[error("{0}")]
    Command(String),

    /// Generic core failure.
    #[error("monitoring core error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl MonitoringCoreError {
    /// Wraps a runtime error raised inside the core.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}

/// Result type for tick hook and reporter subscription.
pub type TickSubscriptionResult<T> = Result<T, TickSubscriptionError>;

/// Errors returned when starting a tick hook or reporter.
#[derive(Debug, Clone, Error)]
pub enum TickSubscriptionError {
    /// The subscription is already active.
    #[error(transparent)]
    Domain(#[from] PlatformDomainError),

    /// The host rejected the callback.
    #[error(transparent)]
    Host(#[from] HostError),

    /// The platform that created the subscription has shut down.
    #[error("{0} tick subscription belongs to a platform that has shut down")]
    Closed(TickPhase),
}

/// Receiver of tick boundary notifications.
///
/// Implementations run on the host tick thread and must return quickly.
pub trait TickListener: Send + Sync {
    /// Called once per tick boundary with the opaque host token.
    fn on_tick(&self, token: u64);
}

/// Tick-start notification source.
pub trait TickHook: Send + Sync {
    /// Subscribes to the host's tick-start dispatch point.
    ///
    /// # Errors
    ///
    /// Returns an error when the hook is already started or the host rejects
    /// the callback.
    fn start(&self) -> TickSubscriptionResult<()>;

    /// Unsubscribes. Closing an unstarted hook is a no-op.
    fn close(&self);

    /// Returns the current subscription state.
    fn state(&self) -> SubscriptionState;
}

/// Tick-end notification source.
pub trait TickReporter: Send + Sync {
    /// Subscribes to the host's tick-end dispatch point.
    ///
    /// # Errors
    ///
    /// Returns an error when the reporter is already started or the host
    /// rejects the callback.
    fn start(&self) -> TickSubscriptionResult<()>;

    /// Unsubscribes. Closing an unstarted reporter is a no-op.
    fn close(&self);

    /// Returns the current subscription state.
    fn state(&self) -> SubscriptionState;
}

/// A command sender as seen by the monitoring core.
pub trait CommandSender: Send + Sync {
    /// Returns the stable identity used to deduplicate senders.
    fn identity(&self) -> SenderId;

    /// Returns the display name.
    fn name(&self) -> String;

    /// Returns the kind of sender.
    fn kind(&self) -> SenderKind;

    /// Evaluates a permission node.
    fn has_permission(&self, node: &str) -> bool;

    /// Delivers a message on a best-effort basis.
    fn send_message(&self, text: &str);
}

/// The host-agnostic monitoring engine.
pub trait MonitoringCore: Send + Sync {
    /// Starts the core after construction.
    ///
    /// # Errors
    ///
    /// Returns [`MonitoringCoreError`] when the core fails to start.
    fn enable(&self) -> MonitoringCoreResult<()>;

    /// Stops the core.
    fn disable(&self);

    /// Interprets one command invocation.
    ///
    /// # Errors
    ///
    /// Returns [`MonitoringCoreError`] when the command cannot be executed.
    fn execute_command(
        &self,
        sender: Arc<dyn CommandSender>,
        args: &[String],
    ) -> MonitoringCoreResult<()>;
}

/// Builds the monitoring core on plugin activation.
pub trait MonitoringCoreFactory: Send + Sync {
    /// Constructs a core bound to the given platform capabilities.
    ///
    /// # Errors
    ///
    /// Returns [`MonitoringCoreError`] when construction fails.
    fn create(
        &self,
        platform: Arc<dyn PlatformCapabilities>,
    ) -> MonitoringCoreResult<Arc<dyn MonitoringCore>>;
}

impl<F> MonitoringCoreFactory for F
where
    F: Fn(Arc<dyn PlatformCapabilities>) -> MonitoringCoreResult<Arc<dyn MonitoringCore>>
        + Send
        + Sync,
{
    fn create(
        &self,
        platform: Arc<dyn PlatformCapabilities>,
    ) -> MonitoringCoreResult<Arc<dyn MonitoringCore>> {
        self(platform)
    }
}

/// Capabilities the adapter provides to the monitoring core.
pub trait PlatformCapabilities: Send + Sync {
    /// Returns static platform metadata.
    fn platform_info(&self) -> PlatformInfo;

    /// Returns the plugin's own version string.
    fn plugin_version(&self) -> &str;

    /// Returns the working directory reserved for the core's state.
    fn plugin_directory(&self) -> &Utf8Path;

    /// Returns the registered command name.
    fn command_name(&self) -> &CommandName;

    /// Returns connected senders granted `permission`, in host order.
    fn senders_with_permission(&self, permission: &str) -> Vec<Arc<dyn CommandSender>>;

    /// Runs a task through the host scheduler, off the caller's stack.
    fn execute_async(&self, task: HostTask);

    /// Creates an unstarted tick-start hook forwarding to `listener`.
    fn create_tick_hook(&self, listener: Arc<dyn TickListener>) -> Arc<dyn TickHook>;

    /// Creates an unstarted tick-end reporter forwarding to `listener`.
    fn create_tick_reporter(&self, listener: Arc<dyn TickListener>) -> Arc<dyn TickReporter>;
}
