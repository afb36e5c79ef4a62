//! Fire-and-forget task submission through the host scheduler.

use super::unwind::describe;
use crate::platform::ports::{HostTask, TaskScheduler};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Submits tasks to the host scheduler, isolating their panics.
#[derive(Clone)]
pub struct AsyncExecutor {
    scheduler: Arc<dyn TaskScheduler>,
}

impl AsyncExecutor {
    /// Creates an executor over the host scheduler.
    #[must_use]
    pub const fn new(scheduler: Arc<dyn TaskScheduler>) -> Self {
        Self { scheduler }
    }

    /// Queues `task` to run once, off the caller's stack.
    ///
    /// A panic inside the task is caught and logged. A rejected submission
    /// is logged and the task is dropped unrun.
    pub fn submit(&self, task: HostTask) {
        let guarded: HostTask = Box::new(move || {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
                tracing::error!(panic = describe(payload.as_ref()), "async task panicked");
            }
        });

        if let Err(err) = self.scheduler.submit(guarded) {
            tracing::warn!(error = %err, "host scheduler rejected async task");
        }
    }
}

impl fmt::Debug for AsyncExecutor {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("AsyncExecutor").finish_non_exhaustive()
    }
}
