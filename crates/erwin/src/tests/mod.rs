//! Integration tests for the Erwin ride record engine.
//!
//! Test organization:
//!
//! - `fanout.rs`      - Dual-copy consistency and the single write path
//! - `archive.rs`     - Archive overlay locality
//! - `persistence.rs` - On-disk reopen behavior
//! - `concurrency.rs` - Cross-context interleavings


use crate::types::{DriverId, NewRide, RideStatus};
use crate::Erwin;

pub(crate) fn sample_request() -> NewRide {
    NewRide::new("Ada", "555-0100", "12 North St", "Airport", "2026-09-01", "08:30")
}

/// Basic workflow test demonstrating core functionality.
#[test]
fn basic_workflow() {
    let engine = Erwin::in_memory().unwrap();
    let sub = engine.subscribe();

    // Create a ride.
    let ride = engine.create_ride(sample_request()).unwrap();
    assert_eq!(ride.status, RideStatus::Pending);
    assert!(ride.assigned_driver_id.is_none());

    // Assign it through the fan-out point.
    let driver = DriverId::from_string("driver-1");
    let updated = engine
        .apply_to_all_copies(&ride.id, |mut r| {
            r.status = RideStatus::Accepted;
            r.assigned_driver_id = Some(DriverId::from_string("driver-1"));
            r
        })
        .unwrap();
    assert_eq!(updated.status, RideStatus::Accepted);

    // Both copies agree.
    let global = engine.ride(&ride.id).unwrap().unwrap();
    let private = engine.driver_ride(&driver, &ride.id).unwrap().unwrap();
    assert_eq!(global.status, private.status);
    assert_eq!(global.messages, private.messages);

    // Two events: creation and the fan-out write.
    let events = sub.drain();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.ride_id == ride.id));
}
