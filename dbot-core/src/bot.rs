//! Outbound side of the bot.
//!
//! [`Bot`] is transport-agnostic; dbot-telegram implements it with teloxide, tests implement it
//! with an in-memory recorder.

use crate::error::Result;
use crate::types::{Chat, Message};
use async_trait::async_trait;

/// Sends plain-text replies. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;

    /// Replies in the chat the given message came from.
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_message(&message.chat, text).await
    }
}
