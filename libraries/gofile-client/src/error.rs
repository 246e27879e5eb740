//! Error types for the Gofile client.

use thiserror::Error;

/// Errors that can occur when talking to the Gofile API.
///
/// Every public operation either succeeds or fails with exactly one of these.
#[derive(Error, Debug)]
pub enum GofileError {
    /// The operation needs an account token and none is set
    #[error("A token is required for this action but none is set")]
    TokenRequired,

    /// The server rejected the token during validation
    #[error("The token was rejected by the server")]
    TokenInvalid,

    /// File or directory missing (or of the wrong kind)
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Argument rejected before any request was made
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unrecognized content option name
    #[error("{0} doesn't appear to be a valid option")]
    InvalidOption(String),

    /// Server answered with a non-"ok" status
    #[error("Gofile server responded with: {0}")]
    ResponseError(String),

    /// Network failure or undecodable response body
    #[error("Transport error: {0}")]
    TransportError(#[from] reqwest::Error),
}

impl GofileError {
    /// Error code for a [`GofileError::ResponseError`], if this is one.
    pub fn response_code(&self) -> Option<&str> {
        match self {
            Self::ResponseError(code) => Some(code),
            _ => None,
        }
    }
}

/// Result type for Gofile client operations.
pub type Result<T> = std::result::Result<T, GofileError>;
