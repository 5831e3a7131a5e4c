//! Event bus service.

use super::{DEFAULT_EVENT_VERSION, EventEnvelope, EventHandler, SubscriptionId, WILDCARD_TOPIC};
use crate::context::Payload;
use mockable::{Clock, DefaultClock};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::Arc;

/// History capacity used when nothing is configured.
pub const DEFAULT_MAX_EVENTS: usize = 1000;

/// Smallest history capacity the bus will accept.
pub const MIN_HISTORY_CAPACITY: usize = 10;

/// Event bus settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventBusConfig {
    /// Maximum number of envelopes kept in history.
    pub max_events: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            max_events: DEFAULT_MAX_EVENTS,
        }
    }
}

struct Subscription {
    id: SubscriptionId,
    handler: Arc<dyn EventHandler>,
}

/// Topic-based publish/subscribe hub with a bounded history.
pub struct EventBus {
    subscribers: RwLock<HashMap<String, Vec<Subscription>>>,
    history: Mutex<VecDeque<EventEnvelope>>,
    capacity: usize,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl EventBus {
    /// Creates a bus using the system clock.
    #[must_use]
    pub fn new(config: EventBusConfig) -> Self {
        Self::with_clock(config, Arc::new(DefaultClock))
    }

    /// Creates a bus stamping envelopes with `clock`.
    #[must_use]
    pub fn with_clock(config: EventBusConfig, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        let capacity = config.max_events.max(MIN_HISTORY_CAPACITY);
        Self {
            subscribers: RwLock::new(HashMap::new()),
            history: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            clock,
        }
    }

    /// Returns the effective history capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Registers `handler` for `topic` (or [`WILDCARD_TOPIC`]).
    pub fn subscribe(&self, topic: &str, handler: Arc<dyn EventHandler>) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.subscribers
            .write()
            .entry(topic.to_owned())
            .or_default()
            .push(Subscription { id, handler });
        tracing::debug!(topic, subscription_id = %id, "event handler subscribed");
        id
    }

    /// Removes a subscription. Returns `false` when it was not registered.
    pub fn unsubscribe(&self, topic: &str, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let Some(handlers) = subscribers.get_mut(topic) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|subscription| subscription.id != id);
        let removed = handlers.len() != before;
        if handlers.is_empty() {
            subscribers.remove(topic);
        }
        removed
    }

    /// Publishes an event and awaits every matching handler in order.
    pub async fn publish(
        &self,
        topic: &str,
        payload: Payload,
        source: &str,
        version: &str,
    ) -> EventEnvelope {
        let envelope = EventEnvelope::new(topic, source, payload, version, self.clock.utc());
        self.record(envelope.clone());

        let handlers = self.handlers_for(topic);
        tracing::debug!(
            topic,
            source,
            event_id = %envelope.id(),
            handlers = handlers.len(),
            "event published"
        );
        for handler in handlers {
            handler.handle(&envelope).await;
        }
        envelope
    }

    /// Publishes with the default envelope version.
    pub async fn publish_from(&self, topic: &str, payload: Payload, source: &str) -> EventEnvelope {
        self.publish(topic, payload, source, DEFAULT_EVENT_VERSION)
            .await
    }

    /// Returns every topic with subscribers or history, sorted.
    #[must_use]
    pub fn list_topics(&self) -> Vec<String> {
        let mut topics: BTreeSet<String> = self.subscribers.read().keys().cloned().collect();
        topics.extend(
            self.history
                .lock()
                .iter()
                .map(|event| event.topic().to_owned()),
        );
        topics.into_iter().collect()
    }

    /// Returns up to `limit` of the newest envelopes, oldest first.
    #[must_use]
    pub fn recent_events(&self, limit: usize) -> Vec<EventEnvelope> {
        let history = self.history.lock();
        let skip = history.len().saturating_sub(limit);
        history.iter().skip(skip).cloned().collect()
    }

    fn record(&self, envelope: EventEnvelope) {
        let mut history = self.history.lock();
        while history.len() >= self.capacity {
            history.pop_front();
        }
        history.push_back(envelope);
    }

    fn handlers_for(&self, topic: &str) -> Vec<Arc<dyn EventHandler>> {
        let subscribers = self.subscribers.read();
        let exact = subscribers.get(topic).into_iter().flatten();
        let wildcard = if topic == WILDCARD_TOPIC {
            None
        } else {
            subscribers.get(WILDCARD_TOPIC)
        };
        exact
            .chain(wildcard.into_iter().flatten())
            .map(|subscription| Arc::clone(&subscription.handler))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(EventBusConfig::default())
    }
}
