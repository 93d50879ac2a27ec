//! Provider error types.

use thiserror::Error;

/// Errors that can occur when talking to a text-generation backend.
///
/// The evaluator absorbs these into its `Failed` result; there is no retry
/// layer, so no retryability classification is needed.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}
