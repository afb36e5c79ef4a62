//! Adapter implementations for host and core ports.

pub mod memory;

mod sender;
mod tokio_scheduler;

pub use sender::SenderAdapter;
pub use tokio_scheduler::TokioTaskScheduler;
