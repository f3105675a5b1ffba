//! Core types for the Erwin ride record engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a ride (UUID string).
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RideId(pub String);

impl RideId {
    /// Creates a new random ride ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Creates a ride ID from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the ride ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RideId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RideId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RideId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RideId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Unique identifier for a driver (UUID string).
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverId(pub String);

impl DriverId {
    /// Creates a driver ID from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the driver ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DriverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DriverId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DriverId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Lifecycle status of a ride record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RideStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
    Transferred,
    Completed,
}

impl RideStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Transferred => "transferred",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "accepted" => Self::Accepted,
            "declined" => Self::Declined,
            "transferred" => Self::Transferred,
            "completed" => Self::Completed,
            _ => Self::Pending,
        }
    }
}

/// Which side of the conversation authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSender {
    Driver,
    Rider,
}

impl ChatSender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Driver => "driver",
            Self::Rider => "rider",
        }
    }
}

/// A single message in a ride's conversation.
///
/// Messages are append-only and strictly ordered by `id`. Ids are epoch
/// milliseconds made strictly monotonic per ride; they only need local
/// monotonicity, never global uniqueness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub text: String,
    pub sender: ChatSender,
    pub sent_at: DateTime<Utc>,
}

/// The unit of dispatch state tracked by the engine.
///
/// A record lives in the global collection and, once assigned, in the
/// assigned driver's collection. Both copies must agree on `status` and
/// `messages` after every successful write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideRecord {
    pub id: RideId,
    pub customer_name: String,
    pub phone: String,
    pub pickup: String,
    pub dropoff: String,
    pub date: String,
    pub time: String,
    pub status: RideStatus,
    pub assigned_driver_id: Option<DriverId>,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RideRecord {
    /// Returns the most recent message, if any.
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// True when the rider sent the last message and is waiting for the
    /// driver to reply.
    pub fn is_waiting_for_response(&self) -> bool {
        matches!(self.last_message(), Some(m) if m.sender == ChatSender::Rider)
    }

    /// Returns the next strictly-increasing message id for this ride.
    ///
    /// Wall-clock millis are used when they are ahead of the last id;
    /// otherwise the last id is bumped by one so rapid sends never collide.
    pub fn next_message_id(&self, now_ms: i64) -> i64 {
        match self.last_message() {
            Some(last) if last.id >= now_ms => last.id + 1,
            _ => now_ms,
        }
    }
}

/// A ride request to be inserted.
///
/// Record creation happens outside the dispatch core (ride request
/// submission), but embedders and tests need a constructor.
#[derive(Debug, Clone)]
pub struct NewRide {
    pub id: RideId,
    pub customer_name: String,
    pub phone: String,
    pub pickup: String,
    pub dropoff: String,
    pub date: String,
    pub time: String,
    pub assigned_driver_id: Option<DriverId>,
}

impl NewRide {
    /// Creates a new pending, unassigned ride request with a generated ID.
    pub fn new(
        customer_name: impl Into<String>,
        phone: impl Into<String>,
        pickup: impl Into<String>,
        dropoff: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            id: RideId::new(),
            customer_name: customer_name.into(),
            phone: phone.into(),
            pickup: pickup.into(),
            dropoff: dropoff.into(),
            date: date.into(),
            time: time.into(),
            assigned_driver_id: None,
        }
    }
}

/// A driver directory entry.
///
/// Read-only input to forwarding; the engine never mutates availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverProfile {
    pub id: DriverId,
    pub name: String,
    pub available: bool,
    pub photo: Option<String>,
}
