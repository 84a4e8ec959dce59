//! Error types and result aliases

use thiserror::Error;

/// Errors produced by extraction, selection, and coordination
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The request is malformed or missing a field required by its mode
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Search or marker lookup located nothing to extract
    #[error("no content found: {0}")]
    NoContentFound(String),

    /// A visual-selection descriptor could not be re-located in the page
    #[error("selected element could not be resolved: {0}")]
    ElementNotResolved(String),

    /// The in-page counterpart is absent or did not answer
    #[error("no response from page: {0}")]
    NoResponse(String),

    /// The page is not on the supported site
    #[error("unsupported domain: {0}")]
    DomainMismatch(String),

    /// Persisted state could not be serialized or deserialized
    #[error("storage serialization failed: {0}")]
    Storage(#[from] serde_json::Error),
}

/// Result type alias using ExtractError
pub type Result<T> = std::result::Result<T, ExtractError>;
