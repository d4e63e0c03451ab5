//! Message handler capability.

use std::sync::Arc;

use crate::message::Message;

/// Callback invoked once for every message delivered to a subscription.
///
/// Implemented for every `Fn(&Message)` closure, so most callers never name
/// this trait:
///
/// ```
/// use messagequeue::{Handler, Message};
///
/// let handler = |message: &Message| println!("{}", message.topic);
/// handler.handle(&Message::with_string_body("greetings", "hello"));
/// ```
pub trait Handler: Send + Sync {
    fn handle(&self, message: &Message);
}

impl<F> Handler for F
where
    F: Fn(&Message) + Send + Sync,
{
    fn handle(&self, message: &Message) {
        self(message)
    }
}

/// Handler shared between the caller and an engine's registry.
pub type SharedHandler = Arc<dyn Handler>;
