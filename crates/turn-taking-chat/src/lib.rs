//! # turn-taking-chat
//!
//! Driver-rider messaging over a ride record, with the rider gated behind a
//! waiting-for-response turn rule.
//!
//! The channel is stateless: the message sequence and the wait state are
//! always recomputed from the store, so any number of open contexts converge
//! after each change event.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use erwin::{ChatSender, Erwin, NewRide, StoreContext};
//! use turn_taking_chat::{SendOutcome, TurnTakingChannel};
//!
//! let engine = Arc::new(Erwin::in_memory().unwrap());
//! let context = Arc::new(StoreContext::new(engine.clone()));
//! let ride = engine
//!     .create_ride(NewRide::new("Ada", "555-0100", "12 North St", "Airport", "2026-09-01", "08:30"))
//!     .unwrap();
//!
//! let channel = TurnTakingChannel::open(context, ride.id.clone()).unwrap();
//!
//! // The rider's first send goes through.
//! let outcome = channel.send(ChatSender::Rider, "where are you?").unwrap();
//! assert!(matches!(outcome, SendOutcome::Sent(_)));
//! assert!(channel.is_waiting_for_response().unwrap());
//!
//! // A second rider send is a silent no-op until the driver replies.
//! assert_eq!(
//!     channel.send(ChatSender::Rider, "hello??").unwrap(),
//!     SendOutcome::WaitingForReply
//! );
//!
//! channel.send(ChatSender::Driver, "two minutes out").unwrap();
//! assert!(!channel.is_waiting_for_response().unwrap());
//! ```

mod channel;

#[cfg(test)]
mod tests;

pub use channel::{SendOutcome, TurnTakingChannel};

/// Errors that can occur on a chat channel.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Message text is empty or whitespace-only.
    #[error("message text is empty")]
    EmptyMessage,

    /// Store error, including ride-not-found.
    #[error(transparent)]
    Store(#[from] erwin::ErwinError),
}

/// Result type for chat operations.
pub type ChatResult<T> = Result<T, ChatError>;
