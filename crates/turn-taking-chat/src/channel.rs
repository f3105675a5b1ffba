//! The turn-taking chat channel.
//!
//! Strict alternation is enforced on the rider side only: once the rider
//! sends, the rider may not send again until the driver replies. The driver
//! side has no such gate. The wait state is never stored; it is always
//! computed from the last message's sender on a fresh read, so every open
//! context recomputes it after each change event.

use std::sync::Arc;

use erwin::sqlite::SqliteStore;
use erwin::{ChatMessage, ChatSender, ErwinError, RideId, StoreContext};

use crate::{ChatError, ChatResult};

/// The result of a send attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The message was appended and fanned out to every copy.
    Sent(ChatMessage),
    /// Silent no-op: the rider is still waiting for the driver's reply.
    WaitingForReply,
}

impl SendOutcome {
    /// Returns the appended message, if one was sent.
    pub fn message(self) -> Option<ChatMessage> {
        match self {
            Self::Sent(message) => Some(message),
            Self::WaitingForReply => None,
        }
    }
}

/// A chat channel over one ride's message sequence.
///
/// The channel holds no message state of its own: every read goes back to
/// the store, so a channel stays correct across writes from other contexts.
pub struct TurnTakingChannel {
    context: Arc<StoreContext>,
    ride_id: RideId,
}

impl TurnTakingChannel {
    /// Opens a channel on a ride.
    ///
    /// Fails if the ride has no copy in the global collection.
    pub fn open(context: Arc<StoreContext>, ride_id: RideId) -> ChatResult<Self> {
        context
            .engine()
            .ride(&ride_id)?
            .ok_or_else(|| ChatError::Store(ErwinError::RideNotFound(ride_id.clone())))?;
        Ok(Self { context, ride_id })
    }

    /// The ride this channel is attached to.
    pub fn ride_id(&self) -> &RideId {
        &self.ride_id
    }

    /// Reads the ride's full message sequence from the store.
    pub fn messages(&self) -> ChatResult<Vec<ChatMessage>> {
        Ok(self.authoritative()?.messages)
    }

    /// True when the rider sent the last message and must wait for the
    /// driver to reply.
    pub fn is_waiting_for_response(&self) -> ChatResult<bool> {
        Ok(self.authoritative()?.is_waiting_for_response())
    }

    /// Sends a message on the channel.
    ///
    /// Empty or whitespace-only text fails with [`ChatError::EmptyMessage`]
    /// before anything is written. A rider send while the rider is already
    /// waiting is a silent no-op: nothing is written and no event is
    /// published. An accepted message is appended with a strictly increasing
    /// id and fanned out to both collections.
    pub fn send(&self, sender: ChatSender, text: &str) -> ChatResult<SendOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        // Re-read immediately before computing the next state.
        let current = self.authoritative()?;
        if sender == ChatSender::Rider && current.is_waiting_for_response() {
            tracing::debug!(ride_id = %self.ride_id, "rider send gated: waiting for reply");
            return Ok(SendOutcome::WaitingForReply);
        }

        let body = text.to_string();
        let updated = self
            .context
            .engine()
            .apply_to_all_copies(&self.ride_id, move |mut r| {
                let id = r.next_message_id(SqliteStore::now_millis());
                r.messages.push(ChatMessage {
                    id,
                    text: body,
                    sender,
                    sent_at: chrono::Utc::now(),
                });
                r
            })?;

        let message = updated
            .last_message()
            .cloned()
            .expect("append produced no message");
        tracing::debug!(
            ride_id = %self.ride_id,
            sender = sender.as_str(),
            message_id = message.id,
            "chat message appended"
        );
        Ok(SendOutcome::Sent(message))
    }

    fn authoritative(&self) -> ChatResult<erwin::RideRecord> {
        self.context
            .engine()
            .ride(&self.ride_id)?
            .ok_or_else(|| ChatError::Store(ErwinError::RideNotFound(self.ride_id.clone())))
    }
}
