//! Error types for the message queue and its engines.

use std::io;

use thiserror::Error;

use crate::message::MessageId;

/// Error returned by `publish`.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The topic is reserved by the transport and always refuses messages.
    #[error("publish to reserved topic `{topic}` rejected")]
    Rejected { topic: String },
    /// The engine has been closed (or a close is in progress).
    #[error("engine is closed")]
    Closed,
    /// The underlying transport refused the write.
    #[error("transport refused message: {0}")]
    Transport(String),
}

/// Error returned by `subscribe` and `queue_subscribe`.
#[derive(Debug, Error)]
pub enum SubscribeError {
    #[error("engine is closed")]
    Closed,
    #[error("transport subscription failed: {0}")]
    Transport(String),
}

/// Error returned by `connect`.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("engine is already connected")]
    AlreadyConnected,
    #[error("engine is closed")]
    Closed,
    #[error("failed to spawn dispatch worker: {0}")]
    Spawn(#[from] io::Error),
    #[error("transport connection failed: {0}")]
    Transport(String),
}

/// Error raised while building a queue from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown engine `{0}`")]
    UnknownEngine(String),
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A handler failed while a message was being dispatched.
///
/// Reported to the engine's [`ErrorSink`](crate::ErrorSink); dispatch carries on
/// with the remaining handlers.
#[derive(Debug, Clone, Error)]
#[error("handler for topic `{topic}` failed on message {message_id}{}: {reason}", queue_suffix(.queue))]
pub struct DispatchError {
    pub topic: String,
    pub message_id: MessageId,
    /// Queue group of the failing handler, `None` for a direct subscriber.
    pub queue: Option<String>,
    pub reason: String,
}

fn queue_suffix(queue: &Option<String>) -> String {
    match queue {
        Some(queue) => format!(" (queue `{}`)", queue),
        None => String::new(),
    }
}
