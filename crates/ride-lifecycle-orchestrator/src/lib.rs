//! # ride-lifecycle-orchestrator
//!
//! The ride lifecycle state machine: accept, decline, transfer, complete.
//!
//! Every operation follows the strict order: acquire the per-ride guard,
//! re-read the authoritative record, validate the source state, fan the new
//! record out to every copy, then deliver the outbound response best-effort.
//! An invalid source state fails synchronously with no partial write; a
//! delivery failure is logged and never rolls back the committed transition.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use erwin::{DriverId, DriverProfile, Erwin, NewRide, RideStatus, StoreContext};
//! use ride_lifecycle_orchestrator::{RecordingNotifier, RideLifecycle};
//!
//! let engine = Arc::new(Erwin::in_memory().unwrap());
//! let context = Arc::new(StoreContext::new(engine.clone()));
//! let lifecycle = RideLifecycle::new(context, Arc::new(RecordingNotifier::new()));
//!
//! let ride = engine
//!     .create_ride(NewRide::new("Ada", "555-0100", "12 North St", "Airport", "2026-09-01", "08:30"))
//!     .unwrap();
//!
//! let driver = DriverProfile {
//!     id: DriverId::from_string("driver-1"),
//!     name: "Marco".to_string(),
//!     available: true,
//!     photo: None,
//! };
//!
//! let accepted = lifecycle.accept(&ride.id, &driver).unwrap();
//! assert_eq!(accepted.status, RideStatus::Accepted);
//! assert_eq!(lifecycle.notifier().len(), 1);
//!
//! // Accepting twice is an invalid transition.
//! assert!(lifecycle.accept(&ride.id, &driver).is_err());
//! ```

pub mod notifier;
mod orchestrator;

#[cfg(test)]
mod tests;

pub use notifier::{
    FailingNotifier, NotifyError, NullNotifier, RecordingNotifier, ResponseAction,
    ResponseNotifier, RideResponse,
};
pub use orchestrator::RideLifecycle;

use erwin::RideStatus;

/// Errors that can occur while driving the ride lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// Transition attempted from a state that does not permit it.
    ///
    /// The caller must re-fetch the authoritative record and retry or
    /// surface the error; there is no implicit correction.
    #[error("invalid transition: cannot {action} a {} ride", .from.as_str())]
    InvalidTransition {
        from: RideStatus,
        action: &'static str,
    },

    /// Store error, including ride-not-found and re-entrant transitions.
    #[error(transparent)]
    Store(#[from] erwin::ErwinError),
}

/// Result type for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;
