//! Request and response shapes of the poll API.

use serde::{Deserialize, Serialize};

/// Duplicate-vote detection mode sent with every new poll.
pub const DUPCHECK_NORMAL: &str = "normal";

/// A finished poll definition, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollDefinition {
    pub title: String,
    pub options: Vec<String>,
    pub multi: bool,
    pub captcha: bool,
    pub dupcheck: String,
}

impl PollDefinition {
    pub fn new(title: impl Into<String>, options: Vec<String>, multi: bool, captcha: bool) -> Self {
        Self {
            title: title.into(),
            options,
            multi,
            captcha,
            dupcheck: DUPCHECK_NORMAL.to_string(),
        }
    }
}

/// A poll the API accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPoll {
    pub id: u64,
    /// Public poll page, `<poll url>/<id>`.
    pub url: String,
}

/// Current tallies of one poll. `votes` keeps the API's option order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollResult {
    pub id: String,
    pub title: String,
    pub multi: bool,
    pub votes: Vec<(String, u64)>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateResponse {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResultsResponse {
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub multi: Option<bool>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub votes: Option<Vec<u64>>,
}
