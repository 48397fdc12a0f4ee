//! # poll-handlers
//!
//! The `strawpoll` chat command. `strawpoll view <id>` prints a poll's tallies; `strawpoll create`
//! opens a per-user [`PollBuilder`] session that is fed by the user's following messages in the
//! same chat until the poll is submitted or the user says "exit".
//!
//! - [`SessionRegistry`]: at most one builder per user, atomic start/advance/end.
//! - [`PollBuilder`]: TITLE → OPTIONS → MULTI → CAPTCHA → DONE.
//! - [`StrawpollHandler`]: the [`dbot_core::Handler`] wiring commands, sessions and the poll API.

mod builder;
mod command;
mod handler;
pub mod messages;
mod session;

pub use builder::{parse_yes_no, Advance, InvalidInput, PollBuilder, Stage, DONE_KEYWORD, MIN_OPTIONS};
pub use command::{parse_command, parse_session_command, StrawpollCommand, COMMAND_NAMES};
pub use handler::StrawpollHandler;
pub use session::{SessionError, SessionEvent, SessionRegistry, EXIT_KEYWORD};
