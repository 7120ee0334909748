//! CDEK-related errors.

use thiserror::Error;

/// Errors that can occur when talking to the CDEK API.
///
/// These never escape the client's public surface: every public operation
/// catches them, logs, and degrades to `None`.
#[derive(Debug, Error)]
pub enum CdekError {
    /// HTTP request failed (transport, timeout).
    #[error("CDEK request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("CDEK API error: {status} - {body}")]
    Api { status: u16, body: String },

    /// Failed to parse a response body.
    #[error("CDEK response error: {0}")]
    Response(String),

    /// Token exchange did not yield a usable token.
    #[error("CDEK token error: {0}")]
    Token(String),
}
