//! Message value type shared by every engine.

use std::fmt;

/// Identifier assigned to a message when an engine accepts it.
///
/// Only the in-process engine assigns ids; they are unique among the
/// messages currently in flight on one engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

impl MessageId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A message addressed to a topic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Set by the engine on publish; `None` until then.
    pub id: Option<MessageId>,
    /// Exact topic the message is published to.
    pub topic: String,
    /// Opaque payload.
    pub body: Vec<u8>,
    /// Topic a receiver should answer on, if any.
    pub reply_topic: Option<String>,
}

impl Message {
    /// Create a message for a topic with a raw payload.
    pub fn new(topic: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            id: None,
            topic: topic.into(),
            body,
            reply_topic: None,
        }
    }

    /// Create a message with a string payload.
    pub fn with_string_body(topic: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(topic, body.into().into_bytes())
    }

    /// Create a message with a bitcode-serialized payload.
    pub fn encode<T: serde::Serialize>(
        topic: impl Into<String>,
        payload: &T,
    ) -> Result<Self, bitcode::Error> {
        let bytes = bitcode::serialize(payload)?;
        Ok(Self::new(topic, bytes))
    }

    /// Decode the payload from bitcode binary format.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, bitcode::Error> {
        bitcode::deserialize(&self.body)
    }

    /// Ask receivers to answer on `reply_topic`.
    pub fn with_reply_topic(mut self, reply_topic: impl Into<String>) -> Self {
        self.reply_topic = Some(reply_topic.into());
        self
    }

    /// Get the payload as a string (if valid UTF-8).
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Build the answer to this message, addressed to its reply topic.
    ///
    /// Returns `None` when the sender did not ask for a reply.
    pub fn reply(&self, body: Vec<u8>) -> Option<Message> {
        self.reply_topic
            .as_ref()
            .map(|topic| Message::new(topic.clone(), body))
    }
}
