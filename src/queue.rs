//! Engine-agnostic message queue facade.

use std::sync::Arc;

use crate::config::{Config, EngineKind};
use crate::engine::{Engine, InMemoryEngine};
use crate::error::{ConnectError, DeliveryError, SubscribeError};
use crate::handler::Handler;
use crate::message::Message;

/// Message queue - holds one engine and forwards every call to it.
///
/// The facade carries no state of its own; swapping the engine swaps the
/// transport without touching publishers or handlers.
///
/// ## Example
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use messagequeue::{Config, EngineKind, Message, MessageQueue};
///
/// let mq = MessageQueue::new(EngineKind::InMemory, Config::new());
/// mq.connect().unwrap();
///
/// let count = Arc::new(Mutex::new(0));
/// let seen = Arc::clone(&count);
/// mq.queue_subscribe("jobs", "workers", move |_: &Message| *seen.lock().unwrap() += 1)
///     .unwrap();
///
/// mq.publish(Message::with_string_body("jobs", "resize image")).unwrap();
/// mq.close();
///
/// assert_eq!(*count.lock().unwrap(), 1);
/// ```
pub struct MessageQueue {
    engine: Box<dyn Engine>,
}

impl MessageQueue {
    /// Build the engine named by `kind` from `config`.
    pub fn new(kind: EngineKind, config: Config) -> Self {
        match kind {
            EngineKind::InMemory => Self::in_memory(config),
        }
    }

    /// Queue backed by the in-process engine.
    pub fn in_memory(config: Config) -> Self {
        Self::from_engine(Box::new(InMemoryEngine::new(&config)))
    }

    /// Queue backed by an engine built elsewhere, such as a broker transport.
    pub fn from_engine(engine: Box<dyn Engine>) -> Self {
        Self { engine }
    }

    /// Get a reference to the underlying engine.
    pub fn engine(&self) -> &dyn Engine {
        self.engine.as_ref()
    }

    /// Connect the engine. Call once before publishing.
    pub fn connect(&self) -> Result<(), ConnectError> {
        self.engine.connect()
    }

    /// Shut down, returning once every accepted message has been dispatched.
    pub fn close(&self) {
        self.engine.close()
    }

    /// Hand a message to the engine without waiting for delivery.
    pub fn publish(&self, message: Message) -> Result<(), DeliveryError> {
        self.engine.publish(message)
    }

    /// Deliver every message on `topic` to `handler`.
    pub fn subscribe(
        &self,
        topic: &str,
        handler: impl Handler + 'static,
    ) -> Result<(), SubscribeError> {
        self.engine.subscribe(topic, Arc::new(handler))
    }

    /// Add `handler` to the competing consumers of `queue` on `topic`.
    pub fn queue_subscribe(
        &self,
        topic: &str,
        queue: &str,
        handler: impl Handler + 'static,
    ) -> Result<(), SubscribeError> {
        self.engine.queue_subscribe(topic, queue, Arc::new(handler))
    }

    /// Drop every subscription on `topic`.
    pub fn unsubscribe(&self, topic: &str) {
        self.engine.unsubscribe(topic)
    }
}
