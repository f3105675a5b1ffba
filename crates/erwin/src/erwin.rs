//! The Erwin engine - the brain of the ride record store.
//!
//! Erwin coordinates durable writes, the dual-collection fan-out, and change
//! events.
//!
//! # Write Path (strict order)
//!
//! 1. Re-read the authoritative global copy
//! 2. Commit the mutated record to every copy (global, then driver)
//! 3. Publish a change event
//!
//! If step 2 fails on the global copy, nothing else runs. The two copy
//! writes are sequential, not transactional: the consistency model is
//! last-write-wins at whole-record granularity, so callers must always go
//! through this path rather than writing copies by hand.
//!
//! # Recovery (silent)
//!
//! Opening an existing database serves reads immediately. No change events
//! are published for records found on disk.

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;

use crate::bus::{ChangeBus, ChangeSubscription};
use crate::sqlite::{driver_collection, SqliteStore, GLOBAL_COLLECTION};
use crate::types::{DriverId, NewRide, RideId, RideRecord, RideStatus};
use crate::ErwinError;

/// The Erwin ride record engine.
///
/// One engine instance models the on-device shared store: every UI context
/// holds it behind an `Arc` and sees the same records and the same bus.
pub struct Erwin {
    sqlite: Mutex<SqliteStore>,
    bus: ChangeBus,
}

impl Erwin {
    /// Opens an engine backed by a SQLite database at the given path.
    ///
    /// Records already on disk are served immediately; no change events are
    /// published for them.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ErwinError> {
        let sqlite = SqliteStore::open(path)?;
        tracing::info!("erwin: store opened");
        Ok(Self {
            sqlite: Mutex::new(sqlite),
            bus: ChangeBus::new(),
        })
    }

    /// Creates an engine with an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn in_memory() -> Result<Self, ErwinError> {
        Ok(Self {
            sqlite: Mutex::new(SqliteStore::in_memory()?),
            bus: ChangeBus::new(),
        })
    }

    /// Builds the initial pending record for a ride request.
    pub fn record_from_request(ride: NewRide) -> RideRecord {
        let now = Utc::now();
        RideRecord {
            id: ride.id,
            customer_name: ride.customer_name,
            phone: ride.phone,
            pickup: ride.pickup,
            dropoff: ride.dropoff,
            date: ride.date,
            time: ride.time,
            status: RideStatus::Pending,
            assigned_driver_id: ride.assigned_driver_id,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Inserts a new ride request into the store.
    ///
    /// Writes the global copy, the driver copy when pre-assigned, and
    /// publishes a change event.
    pub fn create_ride(&self, ride: NewRide) -> Result<RideRecord, ErwinError> {
        let record = Self::record_from_request(ride);
        {
            let sqlite = self.sqlite.lock().expect("lock poisoned");
            sqlite.write(GLOBAL_COLLECTION, &record)?;
            if let Some(driver) = &record.assigned_driver_id {
                sqlite.write(&driver_collection(driver), &record)?;
            }
        }

        tracing::info!(ride_id = %record.id, "erwin: ride created");
        self.bus.notify(&record.id);
        Ok(record)
    }

    /// Reads the authoritative global copy of a ride.
    pub fn ride(&self, id: &RideId) -> Result<Option<RideRecord>, ErwinError> {
        self.sqlite
            .lock()
            .expect("lock poisoned")
            .read(GLOBAL_COLLECTION, id)
    }

    /// Reads a ride from a driver's private collection.
    pub fn driver_ride(
        &self,
        driver: &DriverId,
        id: &RideId,
    ) -> Result<Option<RideRecord>, ErwinError> {
        self.sqlite
            .lock()
            .expect("lock poisoned")
            .read(&driver_collection(driver), id)
    }

    /// Lists every ride in the global collection.
    pub fn rides(&self) -> Result<Vec<RideRecord>, ErwinError> {
        self.sqlite
            .lock()
            .expect("lock poisoned")
            .list(GLOBAL_COLLECTION)
    }

    /// Lists every ride in a driver's private collection.
    pub fn driver_rides(&self, driver: &DriverId) -> Result<Vec<RideRecord>, ErwinError> {
        self.sqlite
            .lock()
            .expect("lock poisoned")
            .list(&driver_collection(driver))
    }

    /// The single fan-out point: mutates a ride and updates every copy.
    ///
    /// Re-reads the authoritative global copy, applies the mutation, writes
    /// the global copy and the assigned driver's copy, removes a stale prior
    /// driver copy when the assignment changed, then publishes a change
    /// event. Returns the record as written.
    ///
    /// # Errors
    ///
    /// Returns [`ErwinError::RideNotFound`] if the ride has no global copy.
    pub fn apply_to_all_copies(
        &self,
        id: &RideId,
        mutation: impl FnOnce(RideRecord) -> RideRecord,
    ) -> Result<RideRecord, ErwinError> {
        let record = {
            let sqlite = self.sqlite.lock().expect("lock poisoned");

            let current = sqlite
                .read(GLOBAL_COLLECTION, id)?
                .ok_or_else(|| ErwinError::RideNotFound(id.clone()))?;
            let prior_driver = current.assigned_driver_id.clone();

            let mut next = mutation(current);
            next.updated_at = Utc::now();

            sqlite.write(GLOBAL_COLLECTION, &next)?;
            if let Some(driver) = &next.assigned_driver_id {
                sqlite.write(&driver_collection(driver), &next)?;
            }
            if let Some(prior) = prior_driver {
                if next.assigned_driver_id.as_ref() != Some(&prior) {
                    sqlite.remove(&driver_collection(&prior), id)?;
                    tracing::debug!(
                        ride_id = %id,
                        driver_id = %prior,
                        "erwin: removed stale driver copy"
                    );
                }
            }
            next
        };

        tracing::debug!(ride_id = %id, status = record.status.as_str(), "erwin: fan-out write");
        self.bus.notify(id);
        Ok(record)
    }

    /// Subscribes to change events from the shared store.
    pub fn subscribe(&self) -> ChangeSubscription {
        self.bus.subscribe()
    }
}
