//! Panic payload formatting for log events.

use std::any::Any;

/// Extracts the message from a caught panic payload.
pub(super) fn describe(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
