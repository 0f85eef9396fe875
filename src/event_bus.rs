//! Broadcast channel for named application events.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. The ticker and
//! the WebSocket read loop publish [`Event`]s through the bus, and any
//! number of consumers subscribe to receive them. The bus is constructed
//! explicitly and passed by reference; there is no process-wide singleton.
//!
//! Delivery is best effort: with no active receivers an event is dropped,
//! and lagging receivers lose the oldest events when the ring buffer fills.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tokio::sync::broadcast;

/// A named message on the bus: a topic, a string payload, and the time of
/// publication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Topic name, e.g. `tick` or `ws/msg`.
    pub topic: String,
    /// Opaque string payload.
    pub payload: String,
    /// Publication timestamp.
    pub at: DateTime<Utc>,
}

/// Broadcast bus for [`Event`]s.
///
/// Backed by a `tokio::broadcast` channel with a configurable capacity
/// (default 1024). When the ring buffer is full, the oldest events are
/// dropped for lagging receivers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event under `topic` to all subscribers.
    ///
    /// Returns the number of receivers that received the event.
    /// If there are no active receivers, the event is silently dropped.
    pub fn publish(&self, topic: &str, payload: impl Into<String>) -> usize {
        let event = Event {
            topic: topic.to_string(),
            payload: payload.into(),
            at: Utc::now(),
        };
        self.sender.send(event).unwrap_or(0)
    }

    /// Creates a new receiver that will receive all future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Per-subscriber topic filter.
///
/// The bus itself delivers every event to every receiver; consumers that
/// only care about certain topics apply a `TopicFilter` on their side.
#[derive(Debug, Default)]
pub struct TopicFilter {
    /// Explicitly subscribed topics. Ignored when `subscribe_all` is true.
    topics: HashSet<String>,
    /// Whether the wildcard `"*"` subscription is active.
    subscribe_all: bool,
}

impl TopicFilter {
    /// Creates a new empty filter that matches nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds topics to the filter. The topic `"*"` enables the wildcard.
    pub fn subscribe(&mut self, topics: &[&str]) {
        for topic in topics {
            if *topic == "*" {
                self.subscribe_all = true;
            } else {
                self.topics.insert((*topic).to_string());
            }
        }
    }

    /// Removes topics from the filter. Does not clear the wildcard.
    pub fn unsubscribe(&mut self, topics: &[&str]) {
        for topic in topics {
            self.topics.remove(*topic);
        }
    }

    /// Returns `true` if the given topic matches the filter.
    #[must_use]
    pub fn matches(&self, topic: &str) -> bool {
        self.subscribe_all || self.topics.contains(topic)
    }

    /// Returns the number of explicitly subscribed topics.
    #[must_use]
    pub fn count(&self) -> usize {
        self.topics.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}
