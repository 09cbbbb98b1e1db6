//! Internal error types for reaper-reqwest.

use thiserror::Error;

/// Result type alias for reaper-reqwest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Internal error type for reaper-reqwest operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// URL could not be parsed.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl From<Error> for reaper_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if e.is_timeout() {
                    reaper_core::Error::timeout()
                        .with_message(e.to_string())
                        .with_source(e)
                } else if e.is_connect() {
                    reaper_core::Error::network_error()
                        .with_message("Connection failed")
                        .with_source(e)
                } else if e.is_builder() {
                    reaper_core::Error::internal_error()
                        .with_message(e.to_string())
                        .with_source(e)
                } else {
                    reaper_core::Error::network_error()
                        .with_message(e.to_string())
                        .with_source(e)
                }
            }
            Error::Serde(e) => reaper_core::Error::serialization()
                .with_message(e.to_string())
                .with_source(e),
            Error::Url(e) => reaper_core::Error::invalid_input()
                .with_message(e.to_string())
                .with_source(e),
        }
    }
}
