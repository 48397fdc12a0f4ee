//! Wiring and main loop.

use anyhow::{Context, Result};
use dbot_core::{init_tracing, Bot};
use dbot_telegram::{build_teloxide_bot, run_repl, TelegramBotAdapter};
use handler_chain::HandlerChain;
use poll_handlers::{SessionRegistry, StrawpollHandler};
use std::sync::Arc;
use strawpoll_client::{PollApi, StrawpollClient};
use tracing::{info, instrument};

use crate::config::BotConfig;

/// Chain with the strawpoll handler. `sessions` is shared by every message task.
pub fn build_handler_chain(
    sessions: Arc<SessionRegistry>,
    api: Arc<dyn PollApi>,
    bot: Arc<dyn Bot>,
) -> HandlerChain {
    HandlerChain::new().add_handler(Arc::new(StrawpollHandler::new(sessions, api, bot)))
}

/// Main entry: validate config, init logging, build the poll client and handler chain, then run the REPL.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(&config.log_file)?;

    info!(
        strawpoll_api_url = %config.strawpoll_api_url,
        timeout_secs = config.strawpoll_timeout_secs,
        "Initializing bot"
    );

    let client = StrawpollClient::new(config.strawpoll_config())
        .context("Failed to build strawpoll client")?;
    let teloxide_bot = build_teloxide_bot(&config.bot_token, config.telegram_api_url.as_deref());
    let reply_bot: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    let sessions = Arc::new(SessionRegistry::new());

    let handler_chain = build_handler_chain(sessions, Arc::new(client), reply_bot);

    info!("Bot started successfully");
    run_repl(teloxide_bot, handler_chain).await
}
