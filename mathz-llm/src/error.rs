//! LLM error types.

use thiserror::Error;

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed.
    #[error("LLM request failed: {0}")]
    RequestFailed(String),

    /// The endpoint rejected the credential (HTTP 401/403).
    #[error("LLM authentication failed (HTTP {status}): {message}")]
    Authentication {
        status: u16,
        message: String,
    },

    /// LLM provider is unavailable.
    #[error("LLM provider unavailable: {0}")]
    Unavailable(String),

    /// LLM response was not valid JSON or did not deserialize into the target type.
    #[error("Failed to parse LLM response as JSON: {0}")]
    ParseError(String),

    /// LLM response deserialized but violated the output contract.
    #[error("LLM output schema validation failed: {0}")]
    SchemaValidation(String),

    /// The JSON Schema for the requested output type could not be built.
    #[error("Failed to build JSON Schema: {0}")]
    Schema(String),

    /// The model declined to answer.
    #[error("LLM refused the request: {0}")]
    Refused(String),

    /// The model stopped before completing its output.
    #[error("LLM output truncated (finish_reason = {0})")]
    Truncated(String),

    /// The reply carried no content at all.
    #[error("LLM returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            LlmError::Unavailable(err.to_string())
        } else if err.is_decode() {
            LlmError::ParseError(err.to_string())
        } else {
            LlmError::RequestFailed(err.to_string())
        }
    }
}
