//! Error types
//!
//! Extraction itself never fails: a missing field is an empty field. Errors
//! only exist at the edges, for bad input, failed fetches, and internal faults.

use std::time::Duration;

use hyper::StatusCode;

/// Request rejected before any fetch happens (HTTP 400)
#[derive(thiserror::Error, Debug)]
pub enum RequestError {
    #[error("Either an MC number or a DOT number is required")]
    MissingIdentifier,
    #[error("Invalid MC number '{0}': expected 4-8 digits")]
    InvalidMc(String),
    #[error("Invalid DOT number '{0}': expected 5-9 digits")]
    InvalidDot(String),
    #[error("Invalid JSON body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

/// SAFER could not be reached or answered badly.
///
/// Callers get a 200 with `found: false` plus the message, meaning
/// "verification unavailable", not "carrier does not exist".
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("SAFER request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("SAFER request failed: {0}")]
    Transport(String),
    #[error("SAFER returned HTTP {0}")]
    Status(u16),
    #[error("Failed to read SAFER response: {0}")]
    Body(String),
}

impl FetchError {
    /// Classify a reqwest failure; `timeout` is the limit the client was built with.
    pub fn from_reqwest(e: reqwest::Error, timeout: Duration) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(timeout)
        } else if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else if e.is_body() || e.is_decode() {
            FetchError::Body(e.to_string())
        } else {
            FetchError::Transport(e.to_string())
        }
    }

    /// Classify a ureq failure; `timeout` is the agent's global limit.
    pub fn from_ureq(e: ureq::Error, timeout: Duration) -> Self {
        match e {
            ureq::Error::StatusCode(code) => FetchError::Status(code),
            ureq::Error::Timeout(_) => FetchError::Timeout(timeout),
            other => FetchError::Transport(other.to_string()),
        }
    }
}

/// Anything that escapes the per-request contract (HTTP 500)
#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error("Carrier verification is temporarily unavailable")]
    Internal(String),
}

/// Invalid service configuration
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid SAFER base URL '{url}': {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("fetch timeout must be greater than zero")]
    ZeroTimeout,
    #[error("user agent must not be empty")]
    EmptyUserAgent,
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
