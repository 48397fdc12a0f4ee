//! Per-user poll builder sessions.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::builder::{Advance, InvalidInput, PollBuilder, Stage};

/// Cancels a session from any step (whole message, case-insensitive).
pub const EXIT_KEYWORD: &str = "exit";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The user already has a builder, possibly in another chat.
    #[error("user already has a poll in progress (chat {chat_id})")]
    AlreadyInProgress { chat_id: i64 },
}

/// Outcome of feeding one message to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// "exit"; the session is gone.
    Cancelled,
    /// The step accepted the input. On [`Advance::Finished`] the session has already been removed.
    Stepped(Advance),
    /// The step rejected the input; session and stage unchanged.
    Rejected { stage: Stage, error: InvalidInput },
}

/// Map from user id to that user's builder. Every operation locks only the user's shard entry,
/// so start/advance/end for one user are atomic and different users never wait on each other.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<i64, PollBuilder>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Opens a builder at TITLE bound to `chat_id`. Fails if the user has one anywhere.
    pub fn start_session(&self, user_id: i64, chat_id: i64) -> Result<PollBuilder, SessionError> {
        match self.sessions.entry(user_id) {
            Entry::Occupied(existing) => Err(SessionError::AlreadyInProgress {
                chat_id: existing.get().chat_id(),
            }),
            Entry::Vacant(slot) => {
                let builder = PollBuilder::new(chat_id);
                slot.insert(builder.clone());
                info!(user_id, chat_id, "Poll builder session started");
                Ok(builder)
            }
        }
    }

    /// Snapshot of the user's builder.
    pub fn get_session(&self, user_id: i64) -> Option<PollBuilder> {
        self.sessions.get(&user_id).map(|b| b.value().clone())
    }

    /// Whether the user has a builder bound to `chat_id`.
    pub fn has_session_in(&self, user_id: i64, chat_id: i64) -> bool {
        self.sessions
            .get(&user_id)
            .is_some_and(|b| b.chat_id() == chat_id)
    }

    /// Removes the user's builder. Returns whether one existed.
    pub fn end_session(&self, user_id: i64) -> bool {
        let removed = self.sessions.remove(&user_id).is_some();
        if removed {
            info!(user_id, "Poll builder session ended");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Routes a message from `user_id` in `chat_id` to their builder.
    ///
    /// Returns `None` when the user has no session or the session belongs to another chat.
    /// "exit" removes the session before any step logic runs; a finished builder is removed
    /// in the same critical section that completed it.
    pub fn advance(&self, user_id: i64, chat_id: i64, input: &str) -> Option<SessionEvent> {
        let Entry::Occupied(mut entry) = self.sessions.entry(user_id) else {
            return None;
        };
        if entry.get().chat_id() != chat_id {
            debug!(user_id, chat_id, "Message outside the session's chat, ignored");
            return None;
        }

        if input.eq_ignore_ascii_case(EXIT_KEYWORD) {
            entry.remove();
            info!(user_id, chat_id, "Poll builder session cancelled");
            return Some(SessionEvent::Cancelled);
        }

        let stage = entry.get().stage();
        let event = match entry.get_mut().apply(input) {
            Ok(Advance::Finished(poll)) => {
                entry.remove();
                info!(user_id, chat_id, "Poll builder finished, session removed");
                SessionEvent::Stepped(Advance::Finished(poll))
            }
            Ok(advance) => SessionEvent::Stepped(advance),
            Err(invalid) => {
                debug!(user_id, %stage, error = %invalid, "Step rejected input");
                SessionEvent::Rejected {
                    stage,
                    error: invalid,
                }
            }
        };
        Some(event)
    }
}
