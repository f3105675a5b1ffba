//! Outbound response emission tests.
//!
//! Rules covered:
//! - accept/decline/transfer each emit exactly one response after commit
//! - transfer carries the target driver
//! - complete emits nothing
//! - failed transitions emit nothing
//! - a failing notifier never rolls back the committed transition

use erwin::{DriverId, RideStatus};

use super::{driver, harness, sample_request};
use crate::{FailingNotifier, RecordingNotifier, ResponseAction};

#[test]
fn accept_emits_one_response() {
    let (engine, _ctx, lifecycle) = harness(RecordingNotifier::new());
    let ride = engine.create_ride(sample_request()).unwrap();
    let marco = driver("driver-1", "Marco");

    lifecycle.accept(&ride.id, &marco).unwrap();

    let responses = lifecycle.notifier().responses();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].action, ResponseAction::Accept);
    assert_eq!(responses[0].ride_id, ride.id);
    assert_eq!(responses[0].driver_id, marco.id);
    assert_eq!(responses[0].driver_name, "Marco");
    assert_eq!(responses[0].customer_name, "Ada");
    assert!(responses[0].transferred_to.is_none());
}

#[test]
fn decline_emits_one_response() {
    let (engine, _ctx, lifecycle) = harness(RecordingNotifier::new());
    let ride = engine.create_ride(sample_request()).unwrap();

    lifecycle.decline(&ride.id, &driver("driver-1", "Marco")).unwrap();

    let responses = lifecycle.notifier().responses();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].action, ResponseAction::Decline);
}

#[test]
fn transfer_emits_response_with_target() {
    let (engine, _ctx, lifecycle) = harness(RecordingNotifier::new());
    let ride = engine.create_ride(sample_request()).unwrap();
    let marco = driver("driver-1", "Marco");
    let target = DriverId::from_string("driver-2");

    lifecycle.accept(&ride.id, &marco).unwrap();
    lifecycle.notifier().clear();
    lifecycle.transfer(&ride.id, &marco, &target).unwrap();

    let responses = lifecycle.notifier().responses();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].action, ResponseAction::Transfer);
    assert_eq!(responses[0].transferred_to, Some(target));
}

#[test]
fn complete_emits_nothing() {
    let (engine, _ctx, lifecycle) = harness(RecordingNotifier::new());
    let ride = engine.create_ride(sample_request()).unwrap();
    let marco = driver("driver-1", "Marco");

    lifecycle.accept(&ride.id, &marco).unwrap();
    lifecycle.notifier().clear();
    lifecycle.complete(&ride.id, &marco.id).unwrap();

    assert!(lifecycle.notifier().is_empty());
}

#[test]
fn failed_transition_emits_nothing() {
    let (engine, _ctx, lifecycle) = harness(RecordingNotifier::new());
    let ride = engine.create_ride(sample_request()).unwrap();
    let marco = driver("driver-1", "Marco");

    lifecycle.accept(&ride.id, &marco).unwrap();
    lifecycle.notifier().clear();

    assert!(lifecycle.accept(&ride.id, &marco).is_err());
    assert!(lifecycle.notifier().is_empty());
}

#[test]
fn delivery_failure_keeps_committed_state() {
    let (engine, _ctx, lifecycle) = harness(FailingNotifier);
    let ride = engine.create_ride(sample_request()).unwrap();
    let marco = driver("driver-1", "Marco");

    // Delivery fails, the operation still succeeds.
    let updated = lifecycle.accept(&ride.id, &marco).unwrap();
    assert_eq!(updated.status, RideStatus::Accepted);

    // The committed state stays authoritative in both copies.
    let global = engine.ride(&ride.id).unwrap().unwrap();
    let private = engine.driver_ride(&marco.id, &ride.id).unwrap().unwrap();
    assert_eq!(global.status, RideStatus::Accepted);
    assert_eq!(private.status, RideStatus::Accepted);
}
