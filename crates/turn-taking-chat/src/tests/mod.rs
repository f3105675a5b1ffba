//! Integration tests for the turn-taking channel.
//!
//! Test organization:
//!
//! - `protocol.rs` - Turn-taking gate, append-only ordering, fan-out effects
//! - `scenario.rs` - End-to-end dispatch scenario across two contexts


use std::sync::Arc;

use erwin::{Erwin, NewRide, RideId, StoreContext};

use crate::TurnTakingChannel;

pub(crate) fn ride_with_channel() -> (Arc<Erwin>, Arc<StoreContext>, RideId, TurnTakingChannel) {
    let engine = Arc::new(Erwin::in_memory().unwrap());
    let context = Arc::new(StoreContext::new(engine.clone()));
    let ride = engine
        .create_ride(NewRide::new(
            "Ada",
            "555-0100",
            "12 North St",
            "Airport",
            "2026-09-01",
            "08:30",
        ))
        .unwrap();
    let channel = TurnTakingChannel::open(context.clone(), ride.id.clone()).unwrap();
    (engine, context, ride.id, channel)
}
