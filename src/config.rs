//! Construction-time configuration for a message queue.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ConfigError;

/// Capacity of the in-process engine's work queue unless configured.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Connection settings handed to an engine when it is built.
///
/// ## Example
///
/// ```
/// use messagequeue::Config;
///
/// let config = Config::new()
///     .with_host("nats://localhost:4222")
///     .with_client_id_prefix("billing-");
///
/// assert!(config.client_id.starts_with("billing-"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Broker address; a comma separated list for transports that take several.
    pub host: String,
    /// Name the client presents to the transport.
    pub client_id: String,
    /// Bound of the in-process engine's work queue. Publishers block when it is full;
    /// values below 1 are raised to 1.
    pub queue_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: String::new(),
            client_id: Uuid::new_v4().to_string(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl Config {
    /// Defaults with a freshly generated client id.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from JSON; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Generate a fresh client id that starts with `prefix`.
    pub fn with_client_id_prefix(mut self, prefix: &str) -> Self {
        self.client_id = format!("{}{}", prefix, Uuid::new_v4());
        self
    }

    /// Bound the in-process work queue. The engine raises `0` to `1`.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }
}

/// Which engine a [`MessageQueue`](crate::MessageQueue) builds.
///
/// Broker transports live outside this crate and are plugged in with
/// [`MessageQueue::from_engine`](crate::MessageQueue::from_engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineKind {
    /// The in-process reference engine.
    #[default]
    InMemory,
}

impl FromStr for EngineKind {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "in-memory" | "memory" | "mock" => Ok(EngineKind::InMemory),
            _ => Err(ConfigError::UnknownEngine(name.to_string())),
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::InMemory => write!(f, "in-memory"),
        }
    }
}
