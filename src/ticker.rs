//! Periodic timer publishing onto the event bus.
//!
//! The interval counterpart of the demo UI's one-second timer: every tick
//! publishes `"<HH:MM:SS> @ <label>"` on a fixed topic until stopped.

use chrono::Utc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::event_bus::EventBus;

/// Default topic that tick events are published under.
pub const TICK_TOPIC: &str = "tick";

/// Periodic publisher of timestamped events.
#[derive(Debug)]
pub struct Ticker {
    bus: EventBus,
    interval: Duration,
    topic: String,
}

impl Ticker {
    /// Creates a ticker that publishes on `topic` every `interval`.
    #[must_use]
    pub fn new(bus: EventBus, interval: Duration, topic: impl Into<String>) -> Self {
        Self {
            bus,
            interval,
            topic: topic.into(),
        }
    }

    /// Spawns the background tick task.
    ///
    /// The first event fires one full interval after the spawn. `label` is
    /// appended to each payload after the timestamp.
    #[must_use]
    pub fn spawn(self, label: String) -> TickerHandle {
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; consume it so the
            // first published event waits a full period.
            interval.tick().await;
            loop {
                interval.tick().await;
                let stamp = Utc::now().format("%H:%M:%S");
                self.bus.publish(&self.topic, format!("{stamp} @ {label}"));
            }
        });
        TickerHandle { task }
    }
}

/// Handle for a running [`Ticker`] task.
#[derive(Debug)]
pub struct TickerHandle {
    task: JoinHandle<()>,
}

impl TickerHandle {
    /// Stops the tick task.
    pub fn stop(self) {
        self.task.abort();
    }
}
