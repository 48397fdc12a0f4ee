//! REPL runner: converts teloxide messages to core::Message and passes them to HandlerChain.

use anyhow::Result;
use dbot_core::{HandlerResponse, ToCoreMessage};
use handler_chain::HandlerChain;
use teloxide::prelude::*;
use tracing::{error, info, instrument, warn};

use super::adapters::TelegramMessageWrapper;

/// Runs the chain for one message and logs a failure instead of returning it.
///
/// Awaited by the REPL so a chat's messages reach the chain in the order they were sent;
/// teloxide already runs different chats concurrently.
pub async fn dispatch(chain: &HandlerChain, message: &dbot_core::Message) -> Option<HandlerResponse> {
    match chain.handle(message).await {
        Ok(response) => Some(response),
        Err(e) => {
            error!(error = %e, user_id = message.user.id, "Handler chain failed");
            None
        }
    }
}

/// Starts the REPL with the given teloxide Bot and HandlerChain.
#[instrument(skip(bot, handler_chain))]
pub async fn run_repl(bot: teloxide::Bot, handler_chain: HandlerChain) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => info!(
            username = ?me.user.username,
            "Connected to Telegram"
        ),
        Err(e) => warn!(error = %e, "getMe failed; starting REPL anyway"),
    }

    let chain = handler_chain;
    teloxide::repl(bot, move |_bot: Bot, msg: teloxide::types::Message| {
        let chain = chain.clone();

        async move {
            let core_msg = TelegramMessageWrapper(&msg).to_core();

            info!(
                user_id = core_msg.user.id,
                chat_id = core_msg.chat.id,
                message_id = %core_msg.id,
                "Received message"
            );

            dispatch(&chain, &core_msg).await;
            Ok(())
        }
    })
    .await;

    Ok(())
}
