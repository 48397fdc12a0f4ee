//! # strawpoll-client
//!
//! Client for the strawpoll.me v2 HTTP API.
//!
//! - [`StrawpollClient::submit_poll`]: `POST <api>` with `{title, options, multi, captcha, dupcheck}`;
//!   success is HTTP 201 with a JSON body carrying a positive integer `id`.
//! - [`StrawpollClient::fetch_results`]: `GET <api>/<id>`; a non-null `error` field means the id is unknown.
//!
//! Both calls are bounded by the configured timeout; a timeout surfaces as [`StrawpollError::Transport`].
//! [`PollApi`] abstracts the two calls so handlers can run against an in-process fake.
//!
//! ## Example
//!
//! ```rust,no_run
//! use strawpoll_client::{PollApi, PollDefinition, StrawpollClient, StrawpollConfig};
//!
//! async fn example() -> Result<(), strawpoll_client::StrawpollError> {
//!     let client = StrawpollClient::new(StrawpollConfig::default())?;
//!     let poll = PollDefinition::new("Best color?", vec!["Red".into(), "Blue".into()], true, false);
//!     let created = client.submit_poll(&poll).await?;
//!     println!("{} -> {}", created.id, created.url);
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::{
    PollApi, StrawpollClient, StrawpollConfig, DEFAULT_API_URL, DEFAULT_POLL_URL,
    DEFAULT_TIMEOUT_SECS, USER_AGENT,
};
pub use error::{Result, StrawpollError};
pub use types::{CreatedPoll, PollDefinition, PollResult, DUPCHECK_NORMAL};
