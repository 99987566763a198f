use thiserror::Error;

/// Errors raised while constructing a [`Contest`](crate::models::Contest).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContestError {
    #[error("Contest '{event}' ends before it starts")]
    InvalidInterval { event: String },

    #[error("Contest '{event}' names no resource")]
    MissingResource { event: String },

    #[error("Invalid timestamp '{value}'")]
    InvalidTimestamp { value: String },
}

/// Validation errors for the `/manual` command body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManualContestError {
    #[error("Missing field '{0}'")]
    MissingField(&'static str),

    #[error("Field '{0}' cannot be empty")]
    EmptyField(&'static str),

    #[error("'{0}' is not an http(s) link")]
    InvalidUrl(String),

    #[error(transparent)]
    Contest(#[from] ContestError),
}

/// Failures talking to the contest API. These never leave the fetcher.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("API request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Could not decode API response: {0}")]
    Decode(#[source] reqwest::Error),
}
