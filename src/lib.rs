//! Spark bridge: host platform adapter for a tick-based game server.
//!
//! This crate connects a host-agnostic performance monitoring core to a
//! game server host. It exposes platform metadata, wraps host connections
//! as command senders, forwards tick boundaries to the core, registers the
//! plugin command, and runs deferred work on the host scheduler.
//!
//! # Architecture
//!
//! The adapter follows hexagonal architecture principles:
//!
//! - **Domain**: Value types and state machines with no host dependencies
//! - **Ports**: Trait contracts for the host and for the monitoring core
//! - **Adapters**: Concrete host implementations (in-memory, tokio)
//! - **Services**: Orchestration of tick subscriptions, commands and the
//!   plugin lifecycle
//!
//! # Modules
//!
//! - [`platform`]: The host platform adapter

pub mod platform;
