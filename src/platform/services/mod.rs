//! Application services wiring the host ports to the monitoring core.

mod command;
mod executor;
mod lifecycle;
mod platform;
mod tick;
mod unwind;

pub use command::{CommandBridge, CommandInvocation};
pub use executor::AsyncExecutor;
pub use lifecycle::PluginLifecycle;
pub use platform::HostPlatform;
pub use tick::{HostTickHook, HostTickReporter, TickSubscription};
