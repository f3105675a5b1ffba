//! Change bus for the Erwin ride record engine.
//!
//! The bus carries coarse `RideChanged` events: no diff, only which ride was
//! touched. Subscribers re-read the affected record on receipt.
//!
//! # Design Principles
//!
//! - Events are published after facts are committed
//! - Delivery to other contexts is asynchronous and unordered relative to
//!   local writes
//! - Recovery publishes nothing

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::RwLock;

use crate::types::RideId;

/// A change event published after a committed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RideChanged {
    pub ride_id: RideId,
}

/// A subscription to change events from the shared store.
pub struct ChangeSubscription {
    receiver: Receiver<RideChanged>,
}

impl ChangeSubscription {
    fn new(receiver: Receiver<RideChanged>) -> Self {
        Self { receiver }
    }

    /// Blocks the current thread until the next change event arrives.
    ///
    /// Returns None once the bus has been dropped.
    pub fn recv(&self) -> Option<RideChanged> {
        self.receiver.recv().ok()
    }

    /// Attempts to receive a change event without blocking.
    ///
    /// Returns None if no event is queued. Useful for polling in UI event
    /// loops.
    pub fn try_recv(&self) -> Option<RideChanged> {
        self.receiver.try_recv().ok()
    }

    /// Drains every queued event, returning the affected ride ids in
    /// delivery order.
    pub fn drain(&self) -> Vec<RideChanged> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

/// The hub that fans change events out to every subscribed context.
#[derive(Debug)]
pub struct ChangeBus {
    subscribers: RwLock<Vec<Sender<RideChanged>>>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Registers a new subscriber.
    ///
    /// The subscription receives every event published after this call;
    /// events published earlier are not replayed.
    pub fn subscribe(&self) -> ChangeSubscription {
        let (sender, receiver) = mpsc::channel();
        self.subscribers
            .write()
            .expect("lock poisoned")
            .push(sender);
        ChangeSubscription::new(receiver)
    }

    /// Publishes a change event to every live subscriber.
    ///
    /// Dead subscribers (receiver dropped) are pruned during this call.
    /// Must be called after the SQLite commit.
    pub fn notify(&self, ride_id: &RideId) {
        let event = RideChanged {
            ride_id: ride_id.clone(),
        };
        let mut subscribers = self.subscribers.write().expect("lock poisoned");
        subscribers.retain(|sender| sender.send(event.clone()).is_ok());
    }

    /// Returns the number of registered subscribers.
    ///
    /// May include dead subscribers not yet pruned by a notify.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().expect("lock poisoned").len()
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_and_receive() {
        let bus = ChangeBus::new();
        let sub = bus.subscribe();

        bus.notify(&RideId::from_string("ride-1"));

        let event = sub.try_recv().unwrap();
        assert_eq!(event.ride_id.as_str(), "ride-1");
        assert!(sub.try_recv().is_none());
    }

    #[test]
    fn every_subscriber_sees_every_event() {
        let bus = ChangeBus::new();
        let sub1 = bus.subscribe();
        let sub2 = bus.subscribe();

        bus.notify(&RideId::from_string("ride-1"));
        bus.notify(&RideId::from_string("ride-2"));

        for sub in [&sub1, &sub2] {
            let ids: Vec<_> = sub.drain().into_iter().map(|e| e.ride_id).collect();
            assert_eq!(
                ids,
                vec![RideId::from_string("ride-1"), RideId::from_string("ride-2")]
            );
        }
    }

    #[test]
    fn no_event_before_subscribe() {
        let bus = ChangeBus::new();
        bus.notify(&RideId::from_string("ride-1"));

        let sub = bus.subscribe();
        assert!(sub.try_recv().is_none());
    }

    #[test]
    fn dead_subscriber_cleanup() {
        let bus = ChangeBus::new();
        {
            let _sub = bus.subscribe();
            assert_eq!(bus.subscriber_count(), 1);
        }

        bus.notify(&RideId::from_string("ride-1"));
        assert_eq!(bus.subscriber_count(), 0);
    }
}
