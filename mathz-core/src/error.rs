//! Error types for the MATHZ core library.

use mathz_llm::LlmError;
use thiserror::Error;

/// Top-level error type for all MATHZ operations.
#[derive(Error, Debug)]
pub enum MathzError {
    /// Configuration file is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No API key in the environment or the config file.
    #[error("Missing API credential: set {env_var} (or `llm.api_key` in the config file)")]
    MissingCredential {
        /// Environment variable that was checked.
        env_var: String,
    },

    /// The problem statement cannot be sent.
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    /// The completion call or its reply failed.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, MathzError>;
