//! # ride-forwarding-dispatcher
//!
//! Driver-to-driver ride reassignment.
//!
//! The dispatcher filters the driver directory down to eligible targets and
//! delegates the actual reassignment to the lifecycle orchestrator.
//! Eligibility is checked at call time, never cached: availability can
//! change between a forwarding dialog opening and the driver confirming.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use erwin::{DriverId, DriverProfile, Erwin, NewRide, StoreContext};
//! use ride_forwarding_dispatcher::{eligible_drivers, ForwardingDispatcher};
//! use ride_lifecycle_orchestrator::{RecordingNotifier, RideLifecycle};
//!
//! let engine = Arc::new(Erwin::in_memory().unwrap());
//! let context = Arc::new(StoreContext::new(engine.clone()));
//! let lifecycle = RideLifecycle::new(context, Arc::new(RecordingNotifier::new()));
//! let dispatcher = ForwardingDispatcher::new(lifecycle);
//!
//! let marco = DriverProfile {
//!     id: DriverId::from_string("driver-1"),
//!     name: "Marco".to_string(),
//!     available: true,
//!     photo: None,
//! };
//! let nadia = DriverProfile {
//!     id: DriverId::from_string("driver-2"),
//!     name: "Nadia".to_string(),
//!     available: true,
//!     photo: None,
//! };
//! let directory = vec![marco.clone(), nadia.clone()];
//!
//! // Marco never shows up in his own forwarding list.
//! let targets = eligible_drivers(&directory, &marco.id);
//! assert_eq!(targets.len(), 1);
//! assert_eq!(targets[0].id, nadia.id);
//!
//! let ride = engine
//!     .create_ride(NewRide::new("Ada", "555-0100", "12 North St", "Airport", "2026-09-01", "08:30"))
//!     .unwrap();
//! dispatcher.lifecycle().accept(&ride.id, &marco).unwrap();
//! let forwarded = dispatcher.forward(&ride.id, &marco, &nadia.id, &directory).unwrap();
//! assert_eq!(forwarded.assigned_driver_id, Some(nadia.id));
//! ```

use erwin::{DriverId, DriverProfile, RideId, RideRecord};
use ride_lifecycle_orchestrator::{LifecycleError, ResponseNotifier, RideLifecycle};

/// Errors that can occur while forwarding a ride.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// The target driver is not in the eligible set at call time.
    #[error("ineligible forwarding target: {0}")]
    IneligibleTarget(DriverId),

    /// The underlying transfer failed.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Result type for forwarding operations.
pub type ForwardResult<T> = Result<T, ForwardError>;

/// Filters the driver directory to valid forwarding targets.
///
/// A driver is eligible when available and not the current driver.
pub fn eligible_drivers(directory: &[DriverProfile], current: &DriverId) -> Vec<DriverProfile> {
    directory
        .iter()
        .filter(|d| d.available && d.id != *current)
        .cloned()
        .collect()
}

/// Forwards rides between drivers through the lifecycle orchestrator.
pub struct ForwardingDispatcher<N: ResponseNotifier> {
    lifecycle: RideLifecycle<N>,
}

impl<N: ResponseNotifier> ForwardingDispatcher<N> {
    /// Creates a dispatcher over a lifecycle orchestrator.
    pub fn new(lifecycle: RideLifecycle<N>) -> Self {
        Self { lifecycle }
    }

    /// Returns the underlying lifecycle orchestrator.
    pub fn lifecycle(&self) -> &RideLifecycle<N> {
        &self.lifecycle
    }

    /// Forwards a ride to another driver.
    ///
    /// Eligibility is re-checked against the directory at call time; a
    /// target that went unavailable since the dialog opened fails with
    /// [`ForwardError::IneligibleTarget`]. On success, delegates to the
    /// lifecycle transfer and returns the updated record.
    pub fn forward(
        &self,
        id: &RideId,
        from: &DriverProfile,
        to: &DriverId,
        directory: &[DriverProfile],
    ) -> ForwardResult<RideRecord> {
        let eligible = eligible_drivers(directory, &from.id);
        if !eligible.iter().any(|d| d.id == *to) {
            tracing::debug!(ride_id = %id, target = %to, "forwarding target rejected");
            return Err(ForwardError::IneligibleTarget(to.clone()));
        }

        Ok(self.lifecycle.transfer(id, from, to)?)
    }
}
