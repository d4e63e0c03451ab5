//! Message queue integration tests.
//!
//! Exercises the in-process engine through the `MessageQueue` facade:
//! - fan-out to direct subscribers, in publish order
//! - round-robin delivery inside queue groups
//! - connection gating, backpressure and drain-complete shutdown
//! - fault injection and handler failures

mod queue_groups;
