//! Where engines report faults that have no caller to return to.

use crate::error::DispatchError;

/// Receives handler failures raised during dispatch.
pub trait ErrorSink: Send + Sync {
    fn error(&self, error: &DispatchError);
}

impl<F> ErrorSink for F
where
    F: Fn(&DispatchError) + Send + Sync,
{
    fn error(&self, error: &DispatchError) {
        self(error)
    }
}

/// Default sink: logs every failure through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn error(&self, error: &DispatchError) {
        tracing::error!(
            topic = %error.topic,
            message_id = %error.message_id,
            queue = error.queue.as_deref().unwrap_or("-"),
            reason = %error.reason,
            "message queue handler failed"
        );
    }
}
