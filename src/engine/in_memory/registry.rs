use std::collections::{BTreeMap, HashMap};

use super::balancer::RoundRobin;
use crate::handler::SharedHandler;

/// A handler chosen for one message, with the queue group it was picked from.
pub(super) struct Route {
    pub(super) handler: SharedHandler,
    pub(super) queue: Option<String>,
}

/// Direct subscribers and queue groups, keyed by exact topic.
#[derive(Default)]
pub(super) struct SubscriberRegistry {
    direct: HashMap<String, Vec<SharedHandler>>,
    groups: HashMap<String, BTreeMap<String, RoundRobin>>,
}

impl SubscriberRegistry {
    pub(super) fn add_direct(&mut self, topic: &str, handler: SharedHandler) {
        self.direct.entry(topic.to_string()).or_default().push(handler);
    }

    pub(super) fn add_member(&mut self, topic: &str, queue: &str, handler: SharedHandler) {
        self.groups
            .entry(topic.to_string())
            .or_default()
            .entry(queue.to_string())
            .or_default()
            .join(handler);
    }

    /// Handlers that receive the next message on `topic`.
    ///
    /// Direct subscribers come first in registration order, then one member
    /// per queue group in group-name order. Picking a member advances that
    /// group's cursor, so this is the single step the worker takes under the
    /// lock for each message.
    pub(super) fn route(&mut self, topic: &str) -> Vec<Route> {
        let mut routes: Vec<Route> = self
            .direct
            .get(topic)
            .map(|handlers| {
                handlers
                    .iter()
                    .map(|handler| Route {
                        handler: handler.clone(),
                        queue: None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        if let Some(groups) = self.groups.get_mut(topic) {
            for (queue, group) in groups.iter_mut() {
                if let Some(handler) = group.next() {
                    routes.push(Route {
                        handler,
                        queue: Some(queue.clone()),
                    });
                }
            }
        }

        routes
    }

    /// Remove everything subscribed to `topic`. Returns whether anything was there.
    pub(super) fn remove_topic(&mut self, topic: &str) -> bool {
        let had_direct = self.direct.remove(topic).is_some();
        let had_groups = self.groups.remove(topic).is_some();
        had_direct || had_groups
    }

    pub(super) fn clear(&mut self) {
        self.direct.clear();
        self.groups.clear();
    }

    /// Direct handlers plus queue-group members registered on `topic`.
    pub(super) fn subscriber_count(&self, topic: &str) -> usize {
        let direct = self.direct.get(topic).map_or(0, Vec::len);
        let members: usize = self
            .groups
            .get(topic)
            .map_or(0, |groups| groups.values().map(RoundRobin::len).sum());
        direct + members
    }
}
