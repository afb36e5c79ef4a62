//! Host-backed implementation of the capabilities offered to the core.

use super::{AsyncExecutor, HostTickHook, HostTickReporter};
use crate::platform::{
    adapters::SenderAdapter,
    config::PluginConfig,
    domain::{CommandName, PlatformInfo},
    ports::{
        CommandSender, HostServices, HostTask, PlatformCapabilities, TickHook, TickListener,
        TickReporter,
    },
};
use camino::Utf8Path;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Capability provider bound to one plugin instance.
///
/// Every hook and reporter handed to the core is tracked so the plugin can
/// release all of them on shutdown. After shutdown the provider still hands
/// out hooks and reporters, but none of them can start.
pub struct HostPlatform {
    config: PluginConfig,
    services: HostServices,
    executor: AsyncExecutor,
    closed: Arc<AtomicBool>,
    hooks: Mutex<Vec<Arc<dyn TickHook>>>,
    reporters: Mutex<Vec<Arc<dyn TickReporter>>>,
}

fn recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl HostPlatform {
    /// Creates a provider over the given configuration and host ports.
    #[must_use]
    pub fn new(config: PluginConfig, services: HostServices) -> Self {
        let executor = AsyncExecutor::new(Arc::clone(&services.scheduler));
        Self {
            config,
            services,
            executor,
            closed: Arc::default(),
            hooks: Mutex::new(Vec::new()),
            reporters: Mutex::new(Vec::new()),
        }
    }

    /// Returns the plugin configuration.
    #[must_use]
    pub const fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Returns the number of hooks and reporters still tracked.
    #[must_use]
    pub fn tracked_subscriptions(&self) -> usize {
        recover(&self.hooks).len() + recover(&self.reporters).len()
    }

    /// Closes and forgets every hook and reporter created so far, and stops
    /// any later one from starting.
    pub fn close_tick_subscriptions(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let hooks = std::mem::take(&mut *recover(&self.hooks));
        let reporters = std::mem::take(&mut *recover(&self.reporters));
        for hook in hooks {
            hook.close();
        }
        for reporter in reporters {
            reporter.close();
        }
    }
}

impl PlatformCapabilities for HostPlatform {
    fn platform_info(&self) -> PlatformInfo {
        self.config.platform.clone()
    }

    fn plugin_version(&self) -> &str {
        &self.config.plugin_version
    }

    fn plugin_directory(&self) -> &Utf8Path {
        &self.config.plugin_directory
    }

    fn command_name(&self) -> &CommandName {
        &self.config.command_name
    }

    fn senders_with_permission(&self, permission: &str) -> Vec<Arc<dyn CommandSender>> {
        let connections = match self.services.connections.online_connections() {
            Ok(connections) => connections,
            Err(err) => {
                tracing::warn!(error = %err, "failed to enumerate online senders");
                return Vec::new();
            }
        };

        connections
            .into_iter()
            .map(|connection| SenderAdapter::new(connection, self.config.permission_policy))
            .filter(|sender| sender.has_permission(permission))
            .map(|sender| Arc::new(sender) as Arc<dyn CommandSender>)
            .collect()
    }

    fn execute_async(&self, task: HostTask) {
        self.executor.submit(task);
    }

    fn create_tick_hook(&self, listener: Arc<dyn TickListener>) -> Arc<dyn TickHook> {
        let hook: Arc<dyn TickHook> = Arc::new(HostTickHook::with_shutdown(
            Arc::clone(&self.services.ticks),
            listener,
            Arc::clone(&self.closed),
        ));
        recover(&self.hooks).push(Arc::clone(&hook));
        hook
    }

    fn create_tick_reporter(&self, listener: Arc<dyn TickListener>) -> Arc<dyn TickReporter> {
        let reporter: Arc<dyn TickReporter> = Arc::new(HostTickReporter::with_shutdown(
            Arc::clone(&self.services.ticks),
            listener,
            Arc::clone(&self.closed),
        ));
        recover(&self.reporters).push(Arc::clone(&reporter));
        reporter
    }
}

impl fmt::Debug for HostPlatform {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("HostPlatform")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
