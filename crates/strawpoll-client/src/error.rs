use thiserror::Error;

/// Failures of a poll API call. Callers turn every variant into a chat reply.
#[derive(Error, Debug)]
pub enum StrawpollError {
    /// Connection, TLS, timeout or body-read failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response status {0}")]
    UnexpectedStatus(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    Malformed(String),

    /// The creation call succeeded but carried no usable poll id.
    #[error("response did not contain a poll id")]
    MissingId,

    /// The results body carried a non-null `error` field.
    #[error("poll not found: {0}")]
    NotFound(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, StrawpollError>;
