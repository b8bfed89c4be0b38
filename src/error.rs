use std::time::Duration;

use thiserror::Error;

/// Errors returned by Bing Image Creator operations.
#[derive(Error, Debug)]
pub enum BingError {
    /// The caller supplied an unusable prompt or cookie.
    #[error("{0}")]
    InvalidArgument(String),

    /// Bing answered the submission without a redirect.
    #[error("No redirect received from Bing. Cookie may be invalid or expired.")]
    Authentication,

    /// A job id or URL could not be extracted from Bing's response.
    #[error("{0}")]
    Parse(String),

    /// Bing returned a non-success HTTP status while polling.
    #[error("HTTP {status}: {status_text}")]
    UpstreamHttp { status: u16, status_text: String },

    /// Bing reported an explicit generation error (e.g. content policy).
    #[error("Bing error: {0}")]
    UpstreamGeneration(String),

    /// A poll returned a JSON payload that is neither pending nor an error.
    #[error("Unexpected response from Bing: {0}")]
    UnexpectedResponse(String),

    /// The overall generation budget ran out before images were ready.
    #[error("Image generation timed out after {} seconds", .timeout.as_secs_f64())]
    GenerationTimeout { timeout: Duration },

    /// A single request did not finish within its budget.
    #[error("Request timed out after {}ms", .timeout.as_millis())]
    RequestTimeout { timeout: Duration },

    /// The completion payload held no usable image URLs.
    #[error("No images found in response")]
    NoImagesFound,

    /// Network-level request failure with context.
    #[error("{context}: {source}")]
    Network {
        context: String,
        source: reqwest::Error,
    },
}

impl BingError {
    /// Whether a fresh call has a reasonable chance of succeeding.
    ///
    /// The client never retries on its own; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BingError::GenerationTimeout { .. }
                | BingError::RequestTimeout { .. }
                | BingError::Network { .. }
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, BingError>;
