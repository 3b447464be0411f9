//! API error types.

use thiserror::Error;

/// Failure of a single API request.
///
/// The state machines treat every variant the same way (log and keep prior
/// state); the variants exist so logs say what actually went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Base URL or endpoint path could not be turned into a URL.
    #[error("invalid url {url}: {message}")]
    Url {
        /// Offending URL text.
        url: String,
        /// Parser message.
        message: String,
    },

    /// Request could not be sent or the response body could not be read.
    #[error("request to {url} failed: {message}")]
    Transport {
        /// Request URL.
        url: String,
        /// Transport error message.
        message: String,
    },

    /// Backend answered with a non-2xx status.
    #[error("{url} returned status {status}: {body}")]
    Status {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// Response body did not match the expected shape.
    #[error("failed to decode response from {url}: {message}")]
    Decode {
        /// Request URL.
        url: String,
        /// Decoder message.
        message: String,
    },

    /// Local file for a document upload could not be read.
    #[error("failed to read {path}: {message}")]
    File {
        /// File path.
        path: String,
        /// I/O error message.
        message: String,
    },
}
