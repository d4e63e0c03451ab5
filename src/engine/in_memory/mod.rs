//! In-process reference engine.
//!
//! Every message goes through one bounded work queue and one background
//! thread, so delivery order is publish order and handlers never run
//! concurrently with each other. The engine is both the test double for real
//! transports and the model of how they are expected to behave:
//!
//! - `publish` waits until the engine is connected, then returns as soon as the
//!   message is queued (a full queue blocks the publisher).
//! - `unsubscribe` waits until nothing is in flight on any topic before
//!   removing the topic's subscribers.
//! - `close` waits until everything accepted has been dispatched.
//!
//! ## Example
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use messagequeue::{Config, Engine, InMemoryEngine, Message};
//!
//! let engine = InMemoryEngine::new(&Config::new());
//! engine.connect().unwrap();
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! engine
//!     .subscribe("greetings", Arc::new(move |m: &Message| {
//!         sink.lock().unwrap().push(m.body_str().unwrap_or_default().to_string())
//!     }))
//!     .unwrap();
//!
//! engine.publish(Message::with_string_body("greetings", "hello")).unwrap();
//! engine.close();
//!
//! assert_eq!(*seen.lock().unwrap(), vec!["hello".to_string()]);
//! ```

mod balancer;
mod registry;
mod worker;

use std::collections::HashSet;
use std::sync::mpsc::{self, SyncSender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle, ThreadId};

use self::registry::SubscriberRegistry;
use super::{ConnectionState, Engine};
use crate::config::Config;
use crate::error::{ConnectError, DeliveryError, SubscribeError};
use crate::handler::SharedHandler;
use crate::message::{Message, MessageId};
use crate::sink::{ErrorSink, TracingSink};

/// Publishing to this topic always fails. Used to inject delivery faults in tests.
pub const FAULT_TOPIC: &str = "error";

/// State shared between callers and the worker, behind one lock.
struct EngineState {
    connection: ConnectionState,
    registry: SubscriberRegistry,
    in_flight: HashSet<MessageId>,
    next_id: u64,
    close_requested: bool,
    /// Number of `unsubscribe` calls waiting for the in-flight set to drain.
    clear_requested: usize,
    sender: Option<SyncSender<Message>>,
    worker_thread: Option<ThreadId>,
}

impl EngineState {
    fn new() -> Self {
        Self {
            connection: ConnectionState::Disconnected,
            registry: SubscriberRegistry::default(),
            in_flight: HashSet::new(),
            next_id: 0,
            close_requested: false,
            clear_requested: 0,
            sender: None,
            worker_thread: None,
        }
    }

    fn is_closed(&self) -> bool {
        self.connection == ConnectionState::Closed
    }

    /// Release every subscription and stop accepting work.
    ///
    /// Dropping the sender ends the worker's receive loop once it is idle.
    fn finish_close(&mut self) {
        self.registry.clear();
        self.sender = None;
        self.connection = ConnectionState::Closed;
        tracing::debug!("in-memory engine closed");
    }

    fn on_worker_thread(&self) -> bool {
        self.worker_thread == Some(thread::current().id())
    }
}

struct Shared {
    state: Mutex<EngineState>,
    /// Signalled on connect, on close, and whenever the in-flight set drains.
    signal: Condvar,
}

impl Shared {
    // Handlers never run under this lock, so a poisoned guard still holds
    // consistent state.
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, EngineState>) -> MutexGuard<'a, EngineState> {
        self.signal
            .wait(guard)
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// In-process engine with a single dispatch thread.
pub struct InMemoryEngine {
    client_id: String,
    host: String,
    queue_capacity: usize,
    shared: Arc<Shared>,
    sink: Arc<dyn ErrorSink>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Default for InMemoryEngine {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl InMemoryEngine {
    /// Create a disconnected engine. Nothing is spawned until `connect`.
    pub fn new(config: &Config) -> Self {
        Self {
            client_id: config.client_id.clone(),
            host: config.host.clone(),
            // A rendezvous channel would deadlock any handler that publishes.
            queue_capacity: config.queue_capacity.max(1),
            shared: Arc::new(Shared {
                state: Mutex::new(EngineState::new()),
                signal: Condvar::new(),
            }),
            sink: Arc::new(TracingSink),
            worker: Mutex::new(None),
        }
    }

    /// Report handler failures to `sink` instead of the log.
    ///
    /// The worker picks the sink up on `connect`, so install it before that.
    pub fn with_sink(mut self, sink: impl ErrorSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// Client id taken from the configuration.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Host taken from the configuration; unused by the in-process engine.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Current connection lifecycle state.
    pub fn connection_state(&self) -> ConnectionState {
        self.shared.lock().connection
    }

    /// Messages accepted by `publish` and not yet dispatched.
    pub fn in_flight(&self) -> usize {
        self.shared.lock().in_flight.len()
    }

    /// Direct handlers plus queue-group members currently registered on `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.shared.lock().registry.subscriber_count(topic)
    }
}

impl Engine for InMemoryEngine {
    fn connect(&self) -> Result<(), ConnectError> {
        let mut state = self.shared.lock();
        match state.connection {
            ConnectionState::Closed => return Err(ConnectError::Closed),
            ConnectionState::Connecting | ConnectionState::Connected => {
                return Err(ConnectError::AlreadyConnected)
            }
            ConnectionState::Disconnected => {}
        }
        state.connection = ConnectionState::Connecting;

        let (sender, receiver) = mpsc::sync_channel(self.queue_capacity);
        let shared = Arc::clone(&self.shared);
        let sink = Arc::clone(&self.sink);
        let spawned = thread::Builder::new()
            .name("mq-dispatch".to_string())
            .spawn(move || worker::run(shared, receiver, sink));
        let handle = match spawned {
            Ok(handle) => handle,
            Err(err) => {
                state.connection = ConnectionState::Disconnected;
                return Err(ConnectError::Spawn(err));
            }
        };

        state.worker_thread = Some(handle.thread().id());
        state.sender = Some(sender);
        state.connection = ConnectionState::Connected;
        drop(state);
        self.shared.signal.notify_all();

        *self.worker.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        tracing::debug!(
            client_id = %self.client_id,
            host = %self.host,
            capacity = self.queue_capacity,
            "in-memory engine connected"
        );
        Ok(())
    }

    fn close(&self) {
        let mut state = self.shared.lock();
        if !state.close_requested {
            state.close_requested = true;
            tracing::debug!(in_flight = state.in_flight.len(), "close requested");
        }
        // Publishers still waiting for a connection give up.
        self.shared.signal.notify_all();

        // Called from a handler: the current message is still in flight, so
        // the worker completes the close once it has been dispatched.
        if state.on_worker_thread() {
            return;
        }

        if state.in_flight.is_empty() && !state.is_closed() {
            state.finish_close();
        }
        while !state.is_closed() {
            state = self.shared.wait(state);
        }
        drop(state);

        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::error!("dispatch worker panicked");
            }
        }
    }

    fn publish(&self, mut message: Message) -> Result<(), DeliveryError> {
        let mut state = self.shared.lock();
        while state.connection != ConnectionState::Connected && !state.close_requested {
            state = self.shared.wait(state);
        }
        if state.close_requested {
            return Err(DeliveryError::Closed);
        }
        if message.topic == FAULT_TOPIC {
            tracing::warn!(topic = %message.topic, "publish to fault topic rejected");
            return Err(DeliveryError::Rejected {
                topic: message.topic,
            });
        }
        let Some(sender) = state.sender.clone() else {
            return Err(DeliveryError::Closed);
        };

        state.next_id += 1;
        let id = MessageId::new(state.next_id);
        message.id = Some(id);
        state.in_flight.insert(id);
        drop(state);

        // Outside the lock: a full queue blocks here until the worker catches up.
        if sender.send(message).is_err() {
            self.shared.lock().in_flight.remove(&id);
            self.shared.signal.notify_all();
            return Err(DeliveryError::Closed);
        }
        Ok(())
    }

    fn subscribe(&self, topic: &str, handler: SharedHandler) -> Result<(), SubscribeError> {
        let mut state = self.shared.lock();
        if state.close_requested {
            return Err(SubscribeError::Closed);
        }
        state.registry.add_direct(topic, handler);
        tracing::debug!(topic, "subscribed");
        Ok(())
    }

    fn queue_subscribe(
        &self,
        topic: &str,
        queue: &str,
        handler: SharedHandler,
    ) -> Result<(), SubscribeError> {
        let mut state = self.shared.lock();
        if state.close_requested {
            return Err(SubscribeError::Closed);
        }
        state.registry.add_member(topic, queue, handler);
        tracing::debug!(topic, queue, "joined queue group");
        Ok(())
    }

    fn unsubscribe(&self, topic: &str) {
        let mut state = self.shared.lock();
        // The worker cannot wait for its own message to drain; its routes for
        // that message were taken before the handler ran.
        if !state.on_worker_thread() {
            state.clear_requested += 1;
            while !state.in_flight.is_empty() {
                state = self.shared.wait(state);
            }
            state.clear_requested -= 1;
        }
        let removed = state.registry.remove_topic(topic);
        tracing::debug!(topic, removed, "unsubscribed");
    }
}

impl Drop for InMemoryEngine {
    fn drop(&mut self) {
        let mut state = self.shared.lock();
        state.close_requested = true;
        if state.in_flight.is_empty() && !state.is_closed() {
            state.finish_close();
        }
        drop(state);
        self.shared.signal.notify_all();
    }
}
