//! In-memory tick dispatcher driven explicitly by tests or an embedding loop.

use crate::platform::ports::{HostError, HostResult, TickCallback, TickDispatcher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// In-memory tick dispatcher.
///
/// Callbacks are invoked synchronously on the thread that fires the tick,
/// in registration order, with no lock held while they run.
#[derive(Clone, Default)]
pub struct InMemoryTickDispatcher {
    state: Arc<RwLock<TickCallbacks>>,
    tick_counter: Arc<AtomicU64>,
}

#[derive(Default)]
struct TickCallbacks {
    start: Vec<TickCallback>,
    end: Vec<TickCallback>,
}

fn lock_error(err: impl std::fmt::Display) -> HostError {
    HostError::runtime(std::io::Error::other(err.to_string()))
}

fn remove_callback(callbacks: &mut Vec<TickCallback>, callback: &TickCallback) {
    if let Some(position) = callbacks
        .iter()
        .position(|registered| Arc::ptr_eq(registered, callback))
    {
        callbacks.remove(position);
    }
}

impl InMemoryTickDispatcher {
    /// Creates a dispatcher with no callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the tick-start dispatch point.
    ///
    /// # Errors
    ///
    /// Returns host runtime errors when lock acquisition fails.
    pub fn fire_tick_start(&self, token: u64) -> HostResult<()> {
        let callbacks = self.state.read().map_err(lock_error)?.start.clone();
        for callback in callbacks {
            callback(token);
        }
        Ok(())
    }

    /// Fires the tick-end dispatch point.
    ///
    /// # Errors
    ///
    /// Returns host runtime errors when lock acquisition fails.
    pub fn fire_tick_end(&self, token: u64) -> HostResult<()> {
        let callbacks = self.state.read().map_err(lock_error)?.end.clone();
        for callback in callbacks {
            callback(token);
        }
        Ok(())
    }

    /// Runs one full tick: start with the next tick number, then end with
    /// the given duration in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns host runtime errors when lock acquisition fails.
    pub fn run_tick(&self, duration_millis: u64) -> HostResult<u64> {
        let tick = self.tick_counter.fetch_add(1, Ordering::AcqRel) + 1;
        self.fire_tick_start(tick)?;
        self.fire_tick_end(duration_millis)?;
        Ok(tick)
    }

    /// Returns the number of registered tick-start callbacks.
    #[must_use]
    pub fn tick_start_callback_count(&self) -> usize {
        self.state.read().map_or(0, |state| state.start.len())
    }

    /// Returns the number of registered tick-end callbacks.
    #[must_use]
    pub fn tick_end_callback_count(&self) -> usize {
        self.state.read().map_or(0, |state| state.end.len())
    }
}

impl TickDispatcher for InMemoryTickDispatcher {
    fn add_tick_start_callback(&self, callback: TickCallback) -> HostResult<()> {
        self.state.write().map_err(lock_error)?.start.push(callback);
        Ok(())
    }

    fn remove_tick_start_callback(&self, callback: &TickCallback) -> HostResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        remove_callback(&mut state.start, callback);
        Ok(())
    }

    fn add_tick_end_callback(&self, callback: TickCallback) -> HostResult<()> {
        self.state.write().map_err(lock_error)?.end.push(callback);
        Ok(())
    }

    fn remove_tick_end_callback(&self, callback: &TickCallback) -> HostResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        remove_callback(&mut state.end, callback);
        Ok(())
    }
}
