//! Task scheduler backed by a tokio runtime's blocking pool.

use crate::platform::ports::{HostError, HostResult, HostTask, TaskScheduler};
use tokio::runtime::Handle;

/// Runs submitted tasks on worker threads of a tokio runtime.
///
/// Tasks are synchronous closures, so they go to the blocking pool rather
/// than the async worker threads.
#[derive(Debug, Clone)]
pub struct TokioTaskScheduler {
    handle: Handle,
}

impl TokioTaskScheduler {
    /// Creates a scheduler bound to a runtime handle.
    #[must_use]
    pub const fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Creates a scheduler bound to the runtime of the calling context.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Runtime`] when called outside a tokio runtime.
    pub fn current() -> HostResult<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(HostError::runtime)
    }
}

impl TaskScheduler for TokioTaskScheduler {
    fn submit(&self, task: HostTask) -> HostResult<()> {
        drop(self.handle.spawn_blocking(task));
        Ok(())
    }
}
