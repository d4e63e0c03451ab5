//! Engine contract - the seam between the queue facade and a transport.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 MessageQueue (facade)                       │
//! │  - holds exactly one Engine, forwards every call            │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Engine trait                           │
//! │  connect / close / publish                                  │
//! │  subscribe / queue_subscribe / unsubscribe                  │
//! └─────────────────────────────────────────────────────────────┘
//!          │                  │                     │
//!          ▼                  ▼                     ▼
//! ┌─────────────────┐  ┌─────────────┐    ┌─────────────────────┐
//! │ InMemoryEngine  │  │ NATS engine │    │ Kafka / RabbitMQ    │
//! │   (included)    │  │ (external)  │    │     (external)      │
//! └─────────────────┘  └─────────────┘    └─────────────────────┘
//! ```

mod in_memory;

pub use in_memory::{InMemoryEngine, FAULT_TOPIC};

use crate::error::{ConnectError, DeliveryError, SubscribeError};
use crate::handler::SharedHandler;
use crate::message::Message;

/// Lifecycle of an engine's connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    /// Shut down by `close`; not reversible.
    Closed,
}

/// Capabilities every transport provides.
///
/// Implementations might include:
/// - `InMemoryEngine` - in-process reference engine, used in tests
/// - a NATS engine translating calls to core NATS subjects and queue groups
/// - Kafka / RabbitMQ engines mapping queue groups to consumer groups / shared queues
pub trait Engine: Send + Sync {
    /// Acquire what the transport needs to send and receive. Call exactly once.
    fn connect(&self) -> Result<(), ConnectError>;

    /// Shut down gracefully.
    ///
    /// Must not return until every message already accepted by `publish`
    /// has been dispatched (or discarded for lack of subscribers) and every
    /// subscription has been released.
    fn close(&self);

    /// Accept a message for delivery without waiting for it to be delivered.
    fn publish(&self, message: Message) -> Result<(), DeliveryError>;

    /// Register a handler that receives every message on `topic`.
    fn subscribe(&self, topic: &str, handler: SharedHandler) -> Result<(), SubscribeError>;

    /// Register a handler as one competing member of `queue` on `topic`.
    ///
    /// Each message on the topic reaches exactly one member of every group.
    fn queue_subscribe(
        &self,
        topic: &str,
        queue: &str,
        handler: SharedHandler,
    ) -> Result<(), SubscribeError>;

    /// Drop every direct and queue-group subscription on `topic`.
    fn unsubscribe(&self, topic: &str);
}
