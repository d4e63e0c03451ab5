//! The dispatch loop run by an engine's single background thread.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use super::registry::Route;
use super::Shared;
use crate::error::DispatchError;
use crate::message::{Message, MessageId};
use crate::sink::ErrorSink;

/// Drain `receiver` until the engine closes or every sender is gone.
pub(super) fn run(shared: Arc<Shared>, receiver: Receiver<Message>, sink: Arc<dyn ErrorSink>) {
    tracing::debug!("dispatch worker started");

    while let Ok(message) = receiver.recv() {
        let Some(id) = message.id else {
            continue;
        };

        let routes = shared.lock().registry.route(&message.topic);
        tracing::trace!(
            topic = %message.topic,
            message_id = %id,
            handlers = routes.len(),
            "dispatching message"
        );
        for route in routes {
            deliver(&route, &message, id, sink.as_ref());
        }

        let mut state = shared.lock();
        state.in_flight.remove(&id);
        if !state.in_flight.is_empty() {
            continue;
        }
        if state.close_requested && !state.is_closed() {
            state.finish_close();
            shared.signal.notify_all();
            break;
        }
        if state.clear_requested > 0 {
            shared.signal.notify_all();
        }
    }

    tracing::debug!("dispatch worker stopped");
}

/// Invoke one handler, turning a panic into a report to the sink.
fn deliver(route: &Route, message: &Message, id: MessageId, sink: &dyn ErrorSink) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| route.handler.handle(message)));
    let Err(payload) = outcome else {
        return;
    };
    let error = DispatchError {
        topic: message.topic.clone(),
        message_id: id,
        queue: route.queue.clone(),
        reason: panic_reason(payload.as_ref()),
    };
    // A sink is caller code too; it must not take the worker down with it.
    if let Err(sink_payload) = panic::catch_unwind(AssertUnwindSafe(|| sink.error(&error))) {
        tracing::error!(
            topic = %error.topic,
            message_id = %id,
            reason = %error.reason,
            sink_reason = %panic_reason(sink_payload.as_ref()),
            "error sink panicked while reporting a handler failure"
        );
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(reason) = payload.downcast_ref::<&str>() {
        (*reason).to_string()
    } else if let Some(reason) = payload.downcast_ref::<String>() {
        reason.clone()
    } else {
        "handler panicked".to_string()
    }
}
