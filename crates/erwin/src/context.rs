//! Per-context handles onto the shared store.
//!
//! A context models one independent running UI instance (a tab, a driver's
//! open view). Contexts share the engine and its bus, but each owns two
//! pieces of purely local state:
//!
//! - the archive overlay: which rides this viewer has hidden
//! - the transition guard: which rides have a state transition in flight
//!
//! Neither is written to the shared store and neither is visible to any
//! other context.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};

use crate::bus::ChangeSubscription;
use crate::erwin::Erwin;
use crate::types::{DriverId, RideId, RideRecord};
use crate::ErwinError;

/// One UI context's handle onto the shared store.
pub struct StoreContext {
    engine: Arc<Erwin>,
    archived: RwLock<HashSet<RideId>>,
    in_flight: Mutex<HashSet<RideId>>,
}

impl StoreContext {
    /// Creates a context over the shared engine.
    pub fn new(engine: Arc<Erwin>) -> Self {
        Self {
            engine,
            archived: RwLock::new(HashSet::new()),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Returns the shared engine.
    pub fn engine(&self) -> &Erwin {
        &self.engine
    }

    /// Subscribes this context to change events.
    pub fn subscribe(&self) -> ChangeSubscription {
        self.engine.subscribe()
    }

    // ========================================================================
    // Archive overlay
    // ========================================================================

    /// Hides or unhides a ride for this viewer only.
    ///
    /// Never touches the shared store: status, messages, and assignment are
    /// unchanged, no change event is published, and other contexts keep
    /// seeing the ride.
    pub fn set_archived(&self, id: &RideId, archived: bool) {
        let mut overlay = self.archived.write().expect("lock poisoned");
        if archived {
            overlay.insert(id.clone());
        } else {
            overlay.remove(id);
        }
    }

    /// True if this viewer has hidden the ride.
    pub fn is_archived(&self, id: &RideId) -> bool {
        self.archived.read().expect("lock poisoned").contains(id)
    }

    /// Lists global rides with this viewer's hidden rides filtered out.
    pub fn visible_rides(&self) -> Result<Vec<RideRecord>, ErwinError> {
        let overlay = self.archived.read().expect("lock poisoned");
        Ok(self
            .engine
            .rides()?
            .into_iter()
            .filter(|r| !overlay.contains(&r.id))
            .collect())
    }

    /// Lists a driver's rides with this viewer's hidden rides filtered out.
    pub fn visible_driver_rides(&self, driver: &DriverId) -> Result<Vec<RideRecord>, ErwinError> {
        let overlay = self.archived.read().expect("lock poisoned");
        Ok(self
            .engine
            .driver_rides(driver)?
            .into_iter()
            .filter(|r| !overlay.contains(&r.id))
            .collect())
    }

    // ========================================================================
    // Transition guard
    // ========================================================================

    /// Marks a transition as in flight for a ride.
    ///
    /// Rejects re-entrant calls from this context: while the returned guard
    /// is alive, a second `begin_transition` for the same ride fails with
    /// [`ErwinError::TransitionInFlight`]. The slot is released when the
    /// guard drops, on every exit path. The guard is scoped to this context;
    /// two different contexts can still race (last-write-wins).
    pub fn begin_transition(&self, id: &RideId) -> Result<TransitionGuard<'_>, ErwinError> {
        let mut in_flight = self.in_flight.lock().expect("lock poisoned");
        if !in_flight.insert(id.clone()) {
            return Err(ErwinError::TransitionInFlight(id.clone()));
        }
        Ok(TransitionGuard {
            slots: &self.in_flight,
            ride: id.clone(),
        })
    }
}

/// RAII guard for an in-flight transition on one ride.
pub struct TransitionGuard<'a> {
    slots: &'a Mutex<HashSet<RideId>>,
    ride: RideId,
}

impl Drop for TransitionGuard<'_> {
    fn drop(&mut self) {
        self.slots
            .lock()
            .expect("lock poisoned")
            .remove(&self.ride);
    }
}
