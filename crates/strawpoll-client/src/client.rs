//! HTTP implementation of [`PollApi`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::{info, instrument, warn};

use crate::error::{Result, StrawpollError};
use crate::types::{CreateResponse, CreatedPoll, PollDefinition, PollResult, ResultsResponse};

pub const DEFAULT_API_URL: &str = "https://strawpoll.me/api/v2/polls";
pub const DEFAULT_POLL_URL: &str = "https://strawpoll.me";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// The API rejects requests without a browser-like agent.
pub const USER_AGENT: &str = "Mozilla/5.0";

/// The two poll API calls the bot makes.
#[async_trait]
pub trait PollApi: Send + Sync {
    /// Creates a poll and returns its id and public URL.
    async fn submit_poll(&self, poll: &PollDefinition) -> Result<CreatedPoll>;
    /// Reads the current tallies of the poll with the given id.
    async fn fetch_results(&self, poll_id: &str) -> Result<PollResult>;
}

/// Where the API lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct StrawpollConfig {
    /// Poll collection endpoint; results are read from `<api_url>/<id>`.
    pub api_url: String,
    /// Base of public poll pages.
    pub poll_url: String,
    pub timeout: Duration,
}

impl Default for StrawpollConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            poll_url: DEFAULT_POLL_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// reqwest-backed poll API client. Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct StrawpollClient {
    client: Client,
    api_url: Url,
    poll_url: String,
}

impl StrawpollClient {
    pub fn new(config: StrawpollConfig) -> Result<Self> {
        let api_url = Url::parse(&config.api_url)
            .map_err(|e| StrawpollError::InvalidUrl(format!("{}: {}", config.api_url, e)))?;
        if api_url.cannot_be_a_base() {
            return Err(StrawpollError::InvalidUrl(config.api_url));
        }
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            api_url,
            poll_url: config.poll_url.trim_end_matches('/').to_string(),
        })
    }

    /// Public page of a poll.
    pub fn poll_url(&self, id: u64) -> String {
        format!("{}/{}", self.poll_url, id)
    }

    /// `<api_url>/<poll_id>`, with the id percent-encoded as one path segment.
    fn results_url(&self, poll_id: &str) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| StrawpollError::InvalidUrl(self.api_url.to_string()))?
            .pop_if_empty()
            .push(poll_id);
        Ok(url)
    }
}

#[async_trait]
impl PollApi for StrawpollClient {
    #[instrument(skip(self, poll), fields(options = poll.options.len()))]
    async fn submit_poll(&self, poll: &PollDefinition) -> Result<CreatedPoll> {
        info!(
            title_preview = %poll.title.chars().take(50).collect::<String>(),
            multi = poll.multi,
            captcha = poll.captcha,
            "step: strawpoll create request"
        );

        let response = self
            .client
            .post(self.api_url.clone())
            .json(poll)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Creating poll returned unexpected status");
            return Err(StrawpollError::UnexpectedStatus(status));
        }

        let body = response.text().await?;
        let id = parse_created_id(&body)?;

        info!(poll_id = id, "step: strawpoll create done");
        Ok(CreatedPoll {
            id,
            url: self.poll_url(id),
        })
    }

    #[instrument(skip(self))]
    async fn fetch_results(&self, poll_id: &str) -> Result<PollResult> {
        let url = self.results_url(poll_id)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let result = parse_results(poll_id, status, &body)?;
        info!(
            title_preview = %result.title.chars().take(50).collect::<String>(),
            options = result.votes.len(),
            "step: strawpoll results fetched"
        );
        Ok(result)
    }
}

/// Extracts the id from a creation body. Anything but a positive integer is [`StrawpollError::MissingId`].
fn parse_created_id(body: &str) -> Result<u64> {
    let parsed: CreateResponse =
        serde_json::from_str(body).map_err(|e| StrawpollError::Malformed(e.to_string()))?;
    parsed
        .id
        .as_ref()
        .and_then(serde_json::Value::as_u64)
        .filter(|id| *id > 0)
        .ok_or(StrawpollError::MissingId)
}

/// Parses a results body. The `error` field is checked before the status so an error-marked
/// 404 still reads as "not found".
fn parse_results(poll_id: &str, status: StatusCode, body: &str) -> Result<PollResult> {
    let parsed: ResultsResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) if !status.is_success() => return Err(StrawpollError::UnexpectedStatus(status)),
        Err(e) => return Err(StrawpollError::Malformed(e.to_string())),
    };

    match parsed.error {
        Some(serde_json::Value::Null) | None => {}
        Some(serde_json::Value::String(reason)) => return Err(StrawpollError::NotFound(reason)),
        Some(other) => return Err(StrawpollError::NotFound(other.to_string())),
    }
    if !status.is_success() {
        return Err(StrawpollError::UnexpectedStatus(status));
    }

    let missing = |field: &str| StrawpollError::Malformed(format!("missing field `{}`", field));
    let title = parsed.title.ok_or_else(|| missing("title"))?;
    let multi = parsed.multi.ok_or_else(|| missing("multi"))?;
    let options = parsed.options.ok_or_else(|| missing("options"))?;
    let votes = parsed.votes.ok_or_else(|| missing("votes"))?;

    if options.len() != votes.len() {
        return Err(StrawpollError::Malformed(format!(
            "{} options but {} vote counts",
            options.len(),
            votes.len()
        )));
    }

    Ok(PollResult {
        id: poll_id.to_string(),
        title,
        multi,
        votes: options.into_iter().zip(votes).collect(),
    })
}
