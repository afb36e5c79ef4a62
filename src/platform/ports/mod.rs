//! Port contracts for the host platform adapter.
//!
//! Host ports describe what the adapter consumes from the game server; core
//! ports describe the monitoring engine and the capabilities the adapter
//! offers it.

mod host;
mod monitoring;

pub use host::{
    CommandHandler, CommandRegistry, ConnectionRegistry, HostCommand, HostConnection, HostError,
    HostResult, HostServices, HostTask, TaskScheduler, TickCallback, TickDispatcher,
};
pub use monitoring::{
    CommandSender, MonitoringCore, MonitoringCoreError, MonitoringCoreFactory,
    MonitoringCoreResult, PlatformCapabilities, TickHook, TickListener, TickReporter,
    TickSubscriptionError, TickSubscriptionResult,
};
