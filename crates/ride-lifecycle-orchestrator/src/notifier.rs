//! Outbound ride-response notification contracts.
//!
//! The orchestrator tells the outside world (the rider's intake endpoint)
//! about committed transitions. Delivery is fire-and-forget: a failure is
//! logged by the caller and never rolls back the committed local write.
//!
//! # Design Principles
//!
//! - The orchestrator emits responses, the notifier decides what they mean
//! - Responses reflect committed state only
//! - Tests assert emission, not downstream behavior

use chrono::{DateTime, Utc};
use erwin::{DriverId, RideId};
use serde::Serialize;

/// The driver action a response reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseAction {
    Accept,
    Decline,
    Transfer,
}

impl ResponseAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Decline => "decline",
            Self::Transfer => "transfer",
        }
    }
}

/// The payload delivered to the external intake endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RideResponse {
    pub ride_id: RideId,
    pub driver_id: DriverId,
    pub driver_name: String,
    pub action: ResponseAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transferred_to: Option<DriverId>,
    pub customer_name: String,
    pub sent_at: DateTime<Utc>,
}

/// Delivery failure reported by a notifier.
#[derive(Debug, thiserror::Error)]
#[error("ride response delivery failed: {0}")]
pub struct NotifyError(pub String);

/// Delivers ride responses to the external intake endpoint.
///
/// Implementations decide the transport (webhook, queue, log). Delivery
/// happens after the local transition is committed.
pub trait ResponseNotifier: Send + Sync {
    fn deliver(&self, response: RideResponse) -> Result<(), NotifyError>;
}

/// A no-op notifier that discards all responses.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl ResponseNotifier for NullNotifier {
    fn deliver(&self, _response: RideResponse) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// A notifier that records all responses for testing.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    responses: std::sync::Mutex<Vec<RideResponse>>,
}

impl RecordingNotifier {
    /// Creates a new recording notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded responses.
    pub fn responses(&self) -> Vec<RideResponse> {
        self.responses.lock().expect("lock poisoned").clone()
    }

    /// Clears all recorded responses.
    pub fn clear(&self) {
        self.responses.lock().expect("lock poisoned").clear();
    }

    /// Returns the number of recorded responses.
    pub fn len(&self) -> usize {
        self.responses.lock().expect("lock poisoned").len()
    }

    /// Returns true if no responses have been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResponseNotifier for RecordingNotifier {
    fn deliver(&self, response: RideResponse) -> Result<(), NotifyError> {
        self.responses
            .lock()
            .expect("lock poisoned")
            .push(response);
        Ok(())
    }
}

/// A notifier that fails every delivery.
///
/// Pins the best-effort contract in tests: a failed delivery must leave the
/// committed local state untouched.
#[derive(Debug, Default)]
pub struct FailingNotifier;

impl ResponseNotifier for FailingNotifier {
    fn deliver(&self, _response: RideResponse) -> Result<(), NotifyError> {
        Err(NotifyError("intake endpoint unreachable".to_string()))
    }
}
