//! Bot configuration: Telegram connection, logging, poll API. Loaded from env.

use anyhow::{Context, Result};
use dbot_core::DbotError;
use std::env;
use std::time::Duration;
use strawpoll_client::{StrawpollConfig, DEFAULT_API_URL, DEFAULT_POLL_URL, DEFAULT_TIMEOUT_SECS};

pub const DEFAULT_LOG_FILE: &str = "logs/strawpoll-bot.log";

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// LOG_FILE
    pub log_file: String,
    /// STRAWPOLL_API_URL
    pub strawpoll_api_url: String,
    /// STRAWPOLL_POLL_URL
    pub strawpoll_poll_url: String,
    /// STRAWPOLL_TIMEOUT_SECS
    pub strawpoll_timeout_secs: u64,
}

impl BotConfig {
    /// Loads from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").context("BOT_TOKEN not set")?,
        };
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
        let strawpoll_api_url =
            env::var("STRAWPOLL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let strawpoll_poll_url =
            env::var("STRAWPOLL_POLL_URL").unwrap_or_else(|_| DEFAULT_POLL_URL.to_string());
        let strawpoll_timeout_secs = match env::var("STRAWPOLL_TIMEOUT_SECS") {
            Ok(s) => s
                .trim()
                .parse()
                .with_context(|| format!("STRAWPOLL_TIMEOUT_SECS is not a number: {}", s))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
            strawpoll_api_url,
            strawpoll_poll_url,
            strawpoll_timeout_secs,
        })
    }

    /// URL settings must parse; the timeout must be non-zero.
    pub fn validate(&self) -> dbot_core::Result<()> {
        let urls = [
            ("TELEGRAM_API_URL", self.telegram_api_url.as_deref()),
            ("STRAWPOLL_API_URL", Some(self.strawpoll_api_url.as_str())),
            ("STRAWPOLL_POLL_URL", Some(self.strawpoll_poll_url.as_str())),
        ];
        for (name, value) in urls {
            if let Some(url_str) = value {
                if reqwest::Url::parse(url_str).is_err() {
                    return Err(DbotError::Config(format!(
                        "{} is set but not a valid URL: {}",
                        name, url_str
                    )));
                }
            }
        }
        if self.strawpoll_timeout_secs == 0 {
            return Err(DbotError::Config(
                "STRAWPOLL_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn strawpoll_config(&self) -> StrawpollConfig {
        StrawpollConfig {
            api_url: self.strawpoll_api_url.clone(),
            poll_url: self.strawpoll_poll_url.clone(),
            timeout: Duration::from_secs(self.strawpoll_timeout_secs),
        }
    }
}
