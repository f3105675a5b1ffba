//! The ride lifecycle state machine.
//!
//! Legal transitions:
//!
//! ```text
//! Pending  --accept-->   Accepted --complete--> Completed
//! Pending  --decline-->  Declined
//! Pending | Accepted --transfer--> Transferred (momentary) --> Pending, reassigned
//! ```
//!
//! Archiving is a viewer-local overlay on [`StoreContext`], not a
//! transition, and never passes through this module.
//!
//! # Operation order (strict)
//!
//! 1. Acquire the per-ride transition guard (re-entrancy rejection)
//! 2. Re-read the authoritative record and validate the source state
//! 3. Fan the new record out to every copy
//! 4. Deliver the outbound response, best-effort
//!
//! A validation failure stops before any write. A delivery failure after the
//! fan-out is logged and dropped; the committed local state stays
//! authoritative.

use std::sync::Arc;

use chrono::Utc;

use erwin::{DriverId, DriverProfile, ErwinError, RideId, RideRecord, RideStatus, StoreContext};

use crate::notifier::{ResponseAction, ResponseNotifier, RideResponse};
use crate::{LifecycleError, LifecycleResult};

/// Drives ride state transitions for one UI context.
pub struct RideLifecycle<N: ResponseNotifier> {
    context: Arc<StoreContext>,
    notifier: Arc<N>,
}

impl<N: ResponseNotifier> RideLifecycle<N> {
    /// Creates an orchestrator over a context and an outbound notifier.
    pub fn new(context: Arc<StoreContext>, notifier: Arc<N>) -> Self {
        Self { context, notifier }
    }

    /// Returns the outbound notifier.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Accepts a pending ride for a driver.
    ///
    /// Valid only from `Pending`. Sets `Accepted` and the assignment, writes
    /// every copy, then notifies the rider's intake endpoint best-effort.
    pub fn accept(&self, id: &RideId, driver: &DriverProfile) -> LifecycleResult<RideRecord> {
        let _guard = self.context.begin_transition(id)?;

        let current = self.authoritative(id)?;
        if current.status != RideStatus::Pending {
            return Err(LifecycleError::InvalidTransition {
                from: current.status,
                action: "accept",
            });
        }

        let driver_id = driver.id.clone();
        let updated = self.context.engine().apply_to_all_copies(id, move |mut r| {
            r.status = RideStatus::Accepted;
            r.assigned_driver_id = Some(driver_id);
            r
        })?;

        tracing::info!(ride_id = %id, driver_id = %driver.id, "ride accepted");
        self.notify_best_effort(&updated, driver, ResponseAction::Accept, None);
        Ok(updated)
    }

    /// Declines a pending ride.
    ///
    /// Valid only from `Pending`. Does not reassign.
    pub fn decline(&self, id: &RideId, driver: &DriverProfile) -> LifecycleResult<RideRecord> {
        let _guard = self.context.begin_transition(id)?;

        let current = self.authoritative(id)?;
        if current.status != RideStatus::Pending {
            return Err(LifecycleError::InvalidTransition {
                from: current.status,
                action: "decline",
            });
        }

        let updated = self.context.engine().apply_to_all_copies(id, |mut r| {
            r.status = RideStatus::Declined;
            r
        })?;

        tracing::info!(ride_id = %id, driver_id = %driver.id, "ride declined");
        self.notify_best_effort(&updated, driver, ResponseAction::Decline, None);
        Ok(updated)
    }

    /// Completes an accepted ride.
    ///
    /// Valid only from `Accepted` with a matching assignment.
    pub fn complete(&self, id: &RideId, driver: &DriverId) -> LifecycleResult<RideRecord> {
        let _guard = self.context.begin_transition(id)?;

        let current = self.authoritative(id)?;
        if current.status != RideStatus::Accepted
            || current.assigned_driver_id.as_ref() != Some(driver)
        {
            return Err(LifecycleError::InvalidTransition {
                from: current.status,
                action: "complete",
            });
        }

        let updated = self.context.engine().apply_to_all_copies(id, |mut r| {
            r.status = RideStatus::Completed;
            r
        })?;

        tracing::info!(ride_id = %id, driver_id = %driver, "ride completed");
        Ok(updated)
    }

    /// Transfers a ride from its current driver to another.
    ///
    /// Valid while `assigned_driver_id == from.id` and the status is
    /// `Pending` or `Accepted`. The record passes momentarily through
    /// `Transferred` (observable on the bus), then lands as `Pending`
    /// assigned to the target so the receiving driver can accept it. The
    /// prior driver's copy is removed by the reassigning fan-out.
    pub fn transfer(
        &self,
        id: &RideId,
        from: &DriverProfile,
        to: &DriverId,
    ) -> LifecycleResult<RideRecord> {
        let _guard = self.context.begin_transition(id)?;

        let current = self.authoritative(id)?;
        let holds_ride = current.assigned_driver_id.as_ref() == Some(&from.id);
        let transferable = matches!(current.status, RideStatus::Pending | RideStatus::Accepted);
        if !holds_ride || !transferable {
            return Err(LifecycleError::InvalidTransition {
                from: current.status,
                action: "transfer",
            });
        }

        let engine = self.context.engine();
        engine.apply_to_all_copies(id, |mut r| {
            r.status = RideStatus::Transferred;
            r
        })?;

        let target = to.clone();
        let updated = engine.apply_to_all_copies(id, move |mut r| {
            r.status = RideStatus::Pending;
            r.assigned_driver_id = Some(target);
            r
        })?;

        tracing::info!(ride_id = %id, from = %from.id, to = %to, "ride transferred");
        self.notify_best_effort(&updated, from, ResponseAction::Transfer, Some(to.clone()));
        Ok(updated)
    }

    /// Re-reads the authoritative global copy immediately before a
    /// transition is computed.
    fn authoritative(&self, id: &RideId) -> LifecycleResult<RideRecord> {
        self.context
            .engine()
            .ride(id)?
            .ok_or_else(|| LifecycleError::Store(ErwinError::RideNotFound(id.clone())))
    }

    /// Delivers the outbound response; failure is logged, never rolled back.
    fn notify_best_effort(
        &self,
        record: &RideRecord,
        driver: &DriverProfile,
        action: ResponseAction,
        transferred_to: Option<DriverId>,
    ) {
        let response = RideResponse {
            ride_id: record.id.clone(),
            driver_id: driver.id.clone(),
            driver_name: driver.name.clone(),
            action,
            transferred_to,
            customer_name: record.customer_name.clone(),
            sent_at: Utc::now(),
        };

        if let Err(err) = self.notifier.deliver(response) {
            tracing::warn!(
                ride_id = %record.id,
                action = action.as_str(),
                error = %err,
                "ride response delivery failed; local state stays committed"
            );
        }
    }
}
