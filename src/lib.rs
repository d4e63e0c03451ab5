//! Pub/sub message queue with interchangeable transport engines.
//!
//! [`MessageQueue`] holds one [`Engine`] and forwards to it. The crate ships
//! [`InMemoryEngine`], an in-process engine with topic fan-out, round-robin
//! queue groups and drain-complete shutdown; broker transports implement
//! [`Engine`] and plug in through [`MessageQueue::from_engine`].

mod config;
mod engine;
mod error;
mod handler;
#[cfg(feature = "logging")]
pub mod logging;
mod message;
mod queue;
mod sink;

pub use config::{Config, EngineKind, DEFAULT_QUEUE_CAPACITY};
pub use engine::{ConnectionState, Engine, InMemoryEngine, FAULT_TOPIC};
pub use error::{ConfigError, ConnectError, DeliveryError, DispatchError, SubscribeError};
pub use handler::{Handler, SharedHandler};
pub use message::{Message, MessageId};
pub use queue::MessageQueue;
pub use sink::{ErrorSink, TracingSink};
