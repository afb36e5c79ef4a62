//! Tick hook and reporter backed by the host tick dispatcher.

use super::unwind::describe;
use crate::platform::{
    domain::{SubscriptionState, TickPhase},
    ports::{
        HostResult, TickCallback, TickDispatcher, TickHook, TickListener, TickReporter,
        TickSubscriptionError, TickSubscriptionResult,
    },
};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Registration of one listener with one host tick phase.
///
/// The host callback is built once, so removal always hands the dispatcher
/// the same `Arc` that was registered. The state lock is held across the
/// host call, which keeps overlapping `activate` and `deactivate` calls from
/// leaking or double-registering a callback.
///
/// Once the shared shutdown flag is raised, `activate` is refused.
pub struct TickSubscription {
    phase: TickPhase,
    dispatcher: Arc<dyn TickDispatcher>,
    callback: TickCallback,
    state: Mutex<SubscriptionState>,
    shutdown: Arc<AtomicBool>,
}

impl TickSubscription {
    /// Creates an unregistered subscription forwarding `phase` ticks to
    /// `listener`.
    #[must_use]
    pub fn new(
        phase: TickPhase,
        dispatcher: Arc<dyn TickDispatcher>,
        listener: Arc<dyn TickListener>,
    ) -> Self {
        Self::with_shutdown(phase, dispatcher, listener, Arc::default())
    }

    /// Creates an unregistered subscription that refuses to start once
    /// `shutdown` is set.
    #[must_use]
    pub fn with_shutdown(
        phase: TickPhase,
        dispatcher: Arc<dyn TickDispatcher>,
        listener: Arc<dyn TickListener>,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        let callback: TickCallback = Arc::new(move |token: u64| {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| listener.on_tick(token)))
            {
                tracing::error!(
                    %phase,
                    token,
                    panic = describe(payload.as_ref()),
                    "tick listener panicked"
                );
            }
        });

        Self {
            phase,
            dispatcher,
            callback,
            state: Mutex::new(SubscriptionState::Unregistered),
            shutdown,
        }
    }

    /// Returns the current registration state.
    #[must_use]
    pub fn state(&self) -> SubscriptionState {
        *self.lock_state()
    }

    /// Registers the callback with the host.
    ///
    /// # Errors
    ///
    /// Returns a domain error when already active,
    /// [`TickSubscriptionError::Closed`] after shutdown, or the host error
    /// when registration is rejected. A rejected registration leaves the
    /// subscription unregistered.
    pub fn activate(&self) -> TickSubscriptionResult<()> {
        let mut state = self.lock_state();
        state.ensure_can_activate(self.phase).inspect_err(|err| {
            tracing::warn!(phase = %self.phase, error = %err, "rejected tick subscription start");
        })?;
        if self.shutdown.load(Ordering::SeqCst) {
            tracing::warn!(phase = %self.phase, "rejected tick subscription start after shutdown");
            return Err(TickSubscriptionError::Closed(self.phase));
        }
        self.register()?;
        *state = SubscriptionState::Active;
        tracing::debug!(phase = %self.phase, "tick subscription active");
        Ok(())
    }

    /// Removes the callback from the host. No-op when unregistered.
    ///
    /// Host removal failures are logged and the subscription still ends up
    /// unregistered.
    pub fn deactivate(&self) {
        let mut state = self.lock_state();
        if !state.is_active() {
            return;
        }
        if let Err(err) = self.unregister() {
            tracing::warn!(phase = %self.phase, error = %err, "failed to remove tick callback");
        }
        *state = SubscriptionState::Unregistered;
        tracing::debug!(phase = %self.phase, "tick subscription closed");
    }

    fn lock_state(&self) -> MutexGuard<'_, SubscriptionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn register(&self) -> HostResult<()> {
        let callback = Arc::clone(&self.callback);
        match self.phase {
            TickPhase::Start => self.dispatcher.add_tick_start_callback(callback),
            TickPhase::End => self.dispatcher.add_tick_end_callback(callback),
        }
    }

    fn unregister(&self) -> HostResult<()> {
        match self.phase {
            TickPhase::Start => self.dispatcher.remove_tick_start_callback(&self.callback),
            TickPhase::End => self.dispatcher.remove_tick_end_callback(&self.callback),
        }
    }
}

impl fmt::Debug for TickSubscription {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("TickSubscription")
            .field("phase", &self.phase)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Tick-start hook attached to the host dispatcher.
#[derive(Debug)]
pub struct HostTickHook {
    subscription: TickSubscription,
}

impl HostTickHook {
    /// Creates an unstarted hook.
    #[must_use]
    pub fn new(dispatcher: Arc<dyn TickDispatcher>, listener: Arc<dyn TickListener>) -> Self {
        Self::with_shutdown(dispatcher, listener, Arc::default())
    }

    /// Creates an unstarted hook that cannot start once `shutdown` is set.
    #[must_use]
    pub fn with_shutdown(
        dispatcher: Arc<dyn TickDispatcher>,
        listener: Arc<dyn TickListener>,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            subscription: TickSubscription::with_shutdown(
                TickPhase::Start,
                dispatcher,
                listener,
                shutdown,
            ),
        }
    }
}

impl TickHook for HostTickHook {
    fn start(&self) -> TickSubscriptionResult<()> {
        self.subscription.activate()
    }

    fn close(&self) {
        self.subscription.deactivate();
    }

    fn state(&self) -> SubscriptionState {
        self.subscription.state()
    }
}

/// Tick-end reporter attached to the host dispatcher.
#[derive(Debug)]
pub struct HostTickReporter {
    subscription: TickSubscription,
}

impl HostTickReporter {
    /// Creates an unstarted reporter.
    #[must_use]
    pub fn new(dispatcher: Arc<dyn TickDispatcher>, listener: Arc<dyn TickListener>) -> Self {
        Self::with_shutdown(dispatcher, listener, Arc::default())
    }

    /// Creates an unstarted reporter that cannot start once `shutdown` is set.
    #[must_use]
    pub fn with_shutdown(
        dispatcher: Arc<dyn TickDispatcher>,
        listener: Arc<dyn TickListener>,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            subscription: TickSubscription::with_shutdown(
                TickPhase::End,
                dispatcher,
                listener,
                shutdown,
            ),
        }
    }
}

impl TickReporter for HostTickReporter {
    fn start(&self) -> TickSubscriptionResult<()> {
        self.subscription.activate()
    }

    fn close(&self) {
        self.subscription.deactivate();
    }

    fn state(&self) -> SubscriptionState {
        self.subscription.state()
    }
}
