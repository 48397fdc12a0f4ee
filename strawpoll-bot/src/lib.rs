//! # strawpoll-bot
//!
//! Telegram bot serving the `strawpoll` command. Loads config from env, wires
//! [`poll_handlers::StrawpollHandler`] into a [`handler_chain::HandlerChain`] and runs the REPL.

pub mod cli;
pub mod config;
pub mod runner;

pub use cli::{Cli, Commands};
pub use config::BotConfig;
pub use runner::{build_handler_chain, run_bot};
