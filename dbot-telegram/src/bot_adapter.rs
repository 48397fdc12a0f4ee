//! Wraps teloxide::Bot and implements [`dbot_core::Bot`]. Tests substitute another Bot impl.

use async_trait::async_trait;
use dbot_core::{Bot as CoreBot, Chat, DbotError, Result};
use teloxide::{prelude::*, types::ChatId};
use tracing::warn;

/// Builds a teloxide Bot, pointing it at `api_url` when given (e.g. a local Bot API server or a mock).
/// An unparsable URL is logged and ignored.
pub fn build_teloxide_bot(token: &str, api_url: Option<&str>) -> teloxide::Bot {
    let bot = teloxide::Bot::new(token);
    match api_url.map(reqwest::Url::parse) {
        Some(Ok(url)) => bot.set_api_url(url),
        Some(Err(e)) => {
            warn!(error = %e, "Invalid TELEGRAM_API_URL, using default");
            bot
        }
        None => bot,
    }
}

/// Thin wrapper around teloxide::Bot that implements dbot-core's Bot trait.
#[derive(Clone)]
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(|e| DbotError::Bot(e.to_string()))?;
        Ok(())
    }
}
