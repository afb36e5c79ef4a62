//! Plugin activation and deactivation orchestration.

use super::{CommandBridge, HostPlatform, unwind::describe};
use crate::platform::{
    config::PluginConfig,
    domain::{CommandName, PluginState},
    ports::{
        HostError, HostServices, MonitoringCore, MonitoringCoreError, MonitoringCoreFactory,
        PlatformCapabilities,
    },
};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

#[derive(Debug, Error)]
enum ActivationError {
    #[error(transparent)]
    Core(#[from] MonitoringCoreError),
    #[error(transparent)]
    Host(#[from] HostError),
}

struct ActivePlugin {
    platform: Arc<HostPlatform>,
    core: Arc<dyn MonitoringCore>,
    bridge: Arc<CommandBridge>,
}

#[derive(Default)]
struct LifecycleInner {
    state: PluginState,
    active: Option<ActivePlugin>,
}

/// Top-level plugin object driven by the host's enable and disable signals.
///
/// Neither transition reports failure to the host. Problems are logged and
/// the transition completes as far as it can.
pub struct PluginLifecycle {
    config: PluginConfig,
    services: HostServices,
    factory: Arc<dyn MonitoringCoreFactory>,
    inner: Mutex<LifecycleInner>,
}

impl PluginLifecycle {
    /// Creates an inactive plugin.
    #[must_use]
    pub fn new(
        config: PluginConfig,
        services: HostServices,
        factory: Arc<dyn MonitoringCoreFactory>,
    ) -> Self {
        Self {
            config,
            services,
            factory,
            inner: Mutex::new(LifecycleInner::default()),
        }
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> PluginState {
        self.lock_inner().state
    }

    /// Returns the configured command name.
    #[must_use]
    pub const fn command_name(&self) -> &CommandName {
        &self.config.command_name
    }

    /// Returns the capability provider of the running plugin, if active.
    #[must_use]
    pub fn platform(&self) -> Option<Arc<HostPlatform>> {
        self.lock_inner()
            .active
            .as_ref()
            .map(|active| Arc::clone(&active.platform))
    }

    /// Constructs and enables the core, then registers the command.
    ///
    /// Repeated activation, or activation after shutdown, is logged and
    /// ignored. A failed activation releases whatever was acquired and
    /// leaves the plugin inactive.
    pub fn activate(&self) {
        let mut inner = self.lock_inner();
        if let Err(err) = inner.state.ensure_can_transition_to(PluginState::Active) {
            tracing::warn!(error = %err, "ignoring plugin activation");
            return;
        }

        let platform = Arc::new(HostPlatform::new(
            self.config.clone(),
            self.services.clone(),
        ));
        match panic::catch_unwind(AssertUnwindSafe(|| self.start(&platform))) {
            Ok(Ok(active)) => {
                inner.active = Some(active);
                inner.state = PluginState::Active;
                tracing::info!(
                    command = %self.config.command_name,
                    platform = %self.config.platform,
                    version = %self.config.plugin_version,
                    "plugin activated"
                );
            }
            Ok(Err(err)) => {
                platform.close_tick_subscriptions();
                tracing::error!(error = %err, "plugin activation failed");
            }
            Err(payload) => {
                platform.close_tick_subscriptions();
                tracing::error!(
                    panic = describe(payload.as_ref()),
                    "monitoring core panicked during activation"
                );
            }
        }
    }

    /// Unregisters the command, disables the core and closes every tick
    /// subscription the core created. No-op unless active.
    pub fn deactivate(&self) {
        let mut inner = self.lock_inner();
        if inner
            .state
            .ensure_can_transition_to(PluginState::Deactivated)
            .is_err()
        {
            tracing::debug!(state = %inner.state, "plugin not active; ignoring deactivation");
            return;
        }
        inner.state = PluginState::Deactivated;
        let Some(active) = inner.active.take() else {
            return;
        };

        if let Err(err) = active.bridge.unregister(self.services.commands.as_ref()) {
            tracing::warn!(error = %err, "failed to unregister command");
        }
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| active.core.disable())) {
            tracing::error!(
                panic = describe(payload.as_ref()),
                "monitoring core panicked during shutdown"
            );
        }
        active.platform.close_tick_subscriptions();
        tracing::info!(command = %self.config.command_name, "plugin deactivated");
    }

    fn start(&self, platform: &Arc<HostPlatform>) -> Result<ActivePlugin, ActivationError> {
        let capabilities = Arc::clone(platform) as Arc<dyn PlatformCapabilities>;
        let core = self.factory.create(capabilities)?;
        core.enable()?;

        let bridge = Arc::new(CommandBridge::new(
            self.config.command_name.clone(),
            Arc::clone(&core),
            self.config.permission_policy,
        ));
        if let Err(err) = bridge.register(self.services.commands.as_ref()) {
            core.disable();
            return Err(err.into());
        }

        Ok(ActivePlugin {
            platform: Arc::clone(platform),
            core,
            bridge,
        })
    }

    fn lock_inner(&self) -> MutexGuard<'_, LifecycleInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for PluginLifecycle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PluginLifecycle")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
