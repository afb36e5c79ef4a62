//! Deterministic in-memory host adapters.
//!
//! These adapters model the host's tick loop, command parser, scheduler and
//! connection registry without a running game server. Ticks and queued tasks
//! advance only when driven explicitly.

mod commands;
mod connections;
mod scheduler;
mod ticks;

pub use commands::InMemoryCommandRegistry;
pub use connections::{InMemoryConnection, InMemoryConnectionRegistry};
pub use scheduler::InMemoryTaskScheduler;
pub use ticks::InMemoryTickDispatcher;
