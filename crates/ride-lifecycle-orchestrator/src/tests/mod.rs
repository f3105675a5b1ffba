//! Integration tests for the lifecycle orchestrator.
//!
//! Test organization:
//!
//! - `transitions.rs`   - Transition legality and dual-copy effects
//! - `notifications.rs` - Outbound response emission and best-effort delivery

mod notifications;

use std::sync::Arc;

use erwin::{DriverId, DriverProfile, Erwin, NewRide, StoreContext};

use crate::notifier::ResponseNotifier;
use crate::RideLifecycle;

pub(crate) fn driver(id: &str, name: &str) -> DriverProfile {
    DriverProfile {
        id: DriverId::from_string(id),
        name: name.to_string(),
        available: true,
        photo: None,
    }
}

pub(crate) fn sample_request() -> NewRide {
    NewRide::new("Ada", "555-0100", "12 North St", "Airport", "2026-09-01", "08:30")
}

pub(crate) fn harness<N: ResponseNotifier>(
    notifier: N,
) -> (Arc<Erwin>, Arc<StoreContext>, RideLifecycle<N>) {
    let engine = Arc::new(Erwin::in_memory().unwrap());
    let context = Arc::new(StoreContext::new(engine.clone()));
    let lifecycle = RideLifecycle::new(context.clone(), Arc::new(notifier));
    (engine, context, lifecycle)
}
