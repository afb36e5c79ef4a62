//! In-memory host command system.

use crate::platform::{
    domain::CommandName,
    ports::{CommandRegistry, HostCommand, HostConnection, HostError, HostResult},
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory command registry modelling the host's command parser.
#[derive(Clone, Default)]
pub struct InMemoryCommandRegistry {
    commands: Arc<RwLock<HashMap<CommandName, HostCommand>>>,
}

fn lock_error(err: impl std::fmt::Display) -> HostError {
    HostError::runtime(std::io::Error::other(err.to_string()))
}

impl InMemoryCommandRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a command with the given name is registered.
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        let Ok(command_name) = CommandName::new(name) else {
            return false;
        };
        self.commands
            .read()
            .is_ok_and(|commands| commands.contains_key(&command_name))
    }

    /// Parses and runs one input line such as `spark report --upload`.
    ///
    /// A leading `/` is accepted. The first token selects the command; with
    /// nothing after it the default executor runs, otherwise the arguments
    /// executor receives the remaining text. Handlers run without any
    /// registry lock held.
    ///
    /// Returns `false` when no registered command matches.
    ///
    /// # Errors
    ///
    /// Returns host runtime errors when lock acquisition fails.
    pub fn execute(&self, sender: Arc<dyn HostConnection>, line: &str) -> HostResult<bool> {
        let trimmed = line.trim();
        let input = trimmed.strip_prefix('/').unwrap_or(trimmed);
        let (label, remainder) = input
            .split_once(char::is_whitespace)
            .unwrap_or((input, ""));

        let Ok(command_name) = CommandName::new(label) else {
            return Ok(false);
        };

        let command = self
            .commands
            .read()
            .map_err(lock_error)?
            .get(&command_name)
            .cloned();
        let Some(registered) = command else {
            return Ok(false);
        };

        let arguments = remainder.trim();
        if arguments.is_empty() {
            (registered.default_executor)(sender, "");
        } else {
            (registered.arguments_executor)(sender, arguments);
        }
        Ok(true)
    }
}

impl CommandRegistry for InMemoryCommandRegistry {
    fn register(&self, command: HostCommand) -> HostResult<()> {
        let mut commands = self.commands.write().map_err(lock_error)?;
        if commands.contains_key(&command.name) {
            return Err(HostError::DuplicateCommand(command.name));
        }
        commands.insert(command.name.clone(), command);
        Ok(())
    }

    fn unregister(&self, name: &CommandName) -> HostResult<()> {
        self.commands.write().map_err(lock_error)?.remove(name);
        Ok(())
    }
}
