//! In-memory task scheduler modelling "run on a later tick" execution.

use crate::platform::ports::{HostError, HostResult, HostTask, TaskScheduler};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Queue-backed scheduler drained explicitly with [`Self::run_pending`].
///
/// Tasks never run on the submitting call stack. A panicking task unwinds
/// out of `run_pending`, as it would out of an unprotected host loop.
#[derive(Clone, Default)]
pub struct InMemoryTaskScheduler {
    queue: Arc<Mutex<VecDeque<HostTask>>>,
    closed: Arc<AtomicBool>,
}

fn lock_error(err: impl std::fmt::Display) -> HostError {
    HostError::runtime(std::io::Error::other(err.to_string()))
}

impl InMemoryTaskScheduler {
    /// Creates an open scheduler with an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of queued tasks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.lock().map_or(0, |queue| queue.len())
    }

    /// Stops accepting new tasks.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    /// Runs queued tasks in FIFO order until the queue is empty, including
    /// tasks submitted by the tasks themselves.
    ///
    /// # Errors
    ///
    /// Returns host runtime errors when lock acquisition fails.
    pub fn run_pending(&self) -> HostResult<usize> {
        let mut executed = 0;
        loop {
            let next = self.queue.lock().map_err(lock_error)?.pop_front();
            let Some(task) = next else {
                return Ok(executed);
            };
            task();
            executed += 1;
        }
    }
}

impl TaskScheduler for InMemoryTaskScheduler {
    fn submit(&self, task: HostTask) -> HostResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(HostError::SchedulerClosed);
        }
        self.queue.lock().map_err(lock_error)?.push_back(task);
        Ok(())
    }
}
