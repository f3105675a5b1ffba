//! # Erwin
//!
//! A SQLite-backed ride record engine that keeps every stored copy of a
//! record in agreement and broadcasts change events to open contexts.
//!
//! ## Non-negotiable Principles
//!
//! - **SQLite is the only durable store** - Every write commits to SQLite first
//! - **A record has up to two copies** - The global collection and the
//!   assigned driver's collection; both must agree on status and messages
//! - **Fan-out happens in exactly one place** - `apply_to_all_copies` is the
//!   only write path for existing records
//! - **Change events reflect committed reality** - Published after the copies
//!   are written
//! - **Reopen emits nothing** - Records found on disk produce no events
//!
//! ## Architecture
//!
//! ```text
//! WRITE:
//!   re-read global copy → mutate → global + driver copy → RideChanged
//!
//! READ:
//!   global copy (authoritative) | driver copy | archive overlay (local)
//!
//! REOPEN:
//!   SQLite → serve reads → continue
//! ```
//!
//! ## Example
//!
//! ```rust
//! use erwin::{Erwin, NewRide, RideStatus, DriverId};
//! use std::sync::Arc;
//!
//! let engine = Arc::new(Erwin::in_memory().unwrap());
//! let sub = engine.subscribe();
//!
//! // A ride request lands in the global collection.
//! let ride = engine
//!     .create_ride(NewRide::new("Ada", "555-0100", "12 North St", "Airport", "2026-09-01", "08:30"))
//!     .unwrap();
//! assert_eq!(sub.try_recv().unwrap().ride_id, ride.id);
//!
//! // Mutations go through the single fan-out point.
//! let driver = DriverId::from_string("driver-1");
//! let updated = engine
//!     .apply_to_all_copies(&ride.id, |mut r| {
//!         r.status = RideStatus::Accepted;
//!         r.assigned_driver_id = Some(DriverId::from_string("driver-1"));
//!         r
//!     })
//!     .unwrap();
//!
//! // Both copies agree.
//! let global = engine.ride(&ride.id).unwrap().unwrap();
//! let private = engine.driver_ride(&driver, &ride.id).unwrap().unwrap();
//! assert_eq!(global.status, private.status);
//! assert_eq!(updated.status, RideStatus::Accepted);
//! ```
//!
//! ## Crate Structure
//!
//! - [`erwin`] - The Erwin engine (brain)
//! - [`bus`] - Change event bus
//! - [`context`] - Per-UI-context handles (archive overlay, transition guard)
//! - [`sqlite`] - Durable storage
//! - [`types`] - Core types

pub mod bus;
pub mod context;
mod erwin;
pub mod sqlite;
pub mod types;

#[cfg(test)]
mod tests;

pub use crate::erwin::Erwin;
pub use bus::{ChangeBus, ChangeSubscription, RideChanged};
pub use context::{StoreContext, TransitionGuard};
pub use types::{
    ChatMessage, ChatSender, DriverId, DriverProfile, NewRide, RideId, RideRecord, RideStatus,
};

/// Errors that can occur in Erwin.
#[derive(Debug, thiserror::Error)]
pub enum ErwinError {
    /// SQLite error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Record encode/decode error.
    #[error("record codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// Ride has no copy in the global collection.
    #[error("ride not found: {0}")]
    RideNotFound(RideId),

    /// A transition for this ride is already in flight in this context.
    #[error("transition already in flight for ride: {0}")]
    TransitionInFlight(RideId),
}
