//! Bridge between the host command system and the monitoring core.

use super::unwind::describe;
use crate::platform::{
    adapters::SenderAdapter,
    domain::{CommandArguments, CommandName, PermissionPolicy},
    ports::{
        CommandHandler, CommandRegistry, CommandSender, HostCommand, HostConnection, HostResult,
        MonitoringCore, MonitoringCoreError,
    },
};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// One command invocation as handed to the core.
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    sender: SenderAdapter,
    arguments: CommandArguments,
}

impl CommandInvocation {
    /// Builds an invocation, splitting `raw` on whitespace.
    #[must_use]
    pub fn new(sender: SenderAdapter, raw: &str) -> Self {
        Self {
            sender,
            arguments: CommandArguments::parse(raw),
        }
    }

    /// Returns the invoking sender.
    #[must_use]
    pub const fn sender(&self) -> &SenderAdapter {
        &self.sender
    }

    /// Returns the argument tokens.
    #[must_use]
    pub const fn arguments(&self) -> &CommandArguments {
        &self.arguments
    }
}

/// Registers the plugin command and forwards invocations to the core.
///
/// The bridge holds no per-invocation state and may be invoked from any
/// number of host threads at once.
pub struct CommandBridge {
    name: CommandName,
    core: Arc<dyn MonitoringCore>,
    permission_policy: PermissionPolicy,
}

impl CommandBridge {
    /// Creates a bridge for `name` forwarding to `core`.
    #[must_use]
    pub const fn new(
        name: CommandName,
        core: Arc<dyn MonitoringCore>,
        permission_policy: PermissionPolicy,
    ) -> Self {
        Self {
            name,
            core,
            permission_policy,
        }
    }

    /// Returns the command name.
    #[must_use]
    pub const fn name(&self) -> &CommandName {
        &self.name
    }

    /// Registers the zero-argument and free-form argument syntaxes.
    ///
    /// # Errors
    ///
    /// Returns the host error when registration is rejected, for instance
    /// when the name is already taken.
    pub fn register(self: &Arc<Self>, registry: &dyn CommandRegistry) -> HostResult<()> {
        let default_bridge = Arc::clone(self);
        let default_executor: CommandHandler =
            Arc::new(move |connection: Arc<dyn HostConnection>, _: &str| {
                default_bridge.dispatch(connection, "");
            });

        let arguments_bridge = Arc::clone(self);
        let arguments_executor: CommandHandler =
            Arc::new(move |connection: Arc<dyn HostConnection>, raw: &str| {
                arguments_bridge.dispatch(connection, raw);
            });

        registry.register(HostCommand {
            name: self.name.clone(),
            default_executor,
            arguments_executor,
        })?;
        tracing::info!(command = %self.name, "registered command");
        Ok(())
    }

    /// Removes the command from the host.
    ///
    /// # Errors
    ///
    /// Returns the host error when the registry cannot be updated.
    pub fn unregister(&self, registry: &dyn CommandRegistry) -> HostResult<()> {
        registry.unregister(&self.name)?;
        tracing::info!(command = %self.name, "unregistered command");
        Ok(())
    }

    /// Handles one host invocation with raw argument text.
    pub fn dispatch(&self, connection: Arc<dyn HostConnection>, raw: &str) {
        let sender = SenderAdapter::new(connection, self.permission_policy);
        self.execute(&CommandInvocation::new(sender, raw));
    }

    /// Forwards an invocation to the core.
    ///
    /// Core errors and panics are reported back to the sender and never
    /// propagate to the host.
    pub fn execute(&self, invocation: &CommandInvocation) {
        let sender: Arc<dyn CommandSender> = Arc::new(invocation.sender().clone());
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.core
                .execute_command(Arc::clone(&sender), invocation.arguments().as_slice())
        }));

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(MonitoringCoreError::Command(message))) => {
                tracing::debug!(command = %self.name, sender = %sender.identity(), %message, "command rejected");
                sender.send_message(&message);
            }
            Ok(Err(err)) => {
                tracing::warn!(command = %self.name, sender = %sender.identity(), error = %err, "command failed");
                sender.send_message(&err.to_string());
            }
            Err(payload) => {
                tracing::error!(
                    command = %self.name,
                    sender = %sender.identity(),
                    panic = describe(payload.as_ref()),
                    "command handler panicked"
                );
                sender.send_message(&format!(
                    "An internal error occurred while running /{}",
                    self.name
                ));
            }
        }
    }
}

impl fmt::Debug for CommandBridge {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CommandBridge")
            .field("name", &self.name)
            .field("permission_policy", &self.permission_policy)
            .finish_non_exhaustive()
    }
}
