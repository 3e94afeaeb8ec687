//! Error types
//!
//! `ApiError` covers everything that can go wrong talking to the REST API,
//! `ListError` the client-side refusals of the list screens.

use thiserror::Error;

use crate::models::RecordId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Request never produced a response (offline, DNS, CORS...)
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-2xx HTTP status
    #[error("Server responded with {status}: {body}")]
    Status { status: u16, body: String },

    /// 2xx response whose envelope reports a failure code
    #[error("Request rejected (code {code}): {message}")]
    Rejected { code: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ApiError::Status { status: 401, .. } | ApiError::Rejected { code: 401, .. }
        )
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ListError {
    #[error("Another change is still in progress")]
    Busy,

    #[error("Entry {0} is no longer in the list")]
    NotFound(RecordId),

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid API base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
