//! # mathz-core — Math Word-Problem Solver
//!
//! Turns a free-text math problem into a [`MathSolution`]: a final answer, a
//! step-by-step explanation, and Python code that computes the answer.
//!
//! The flow is a single call:
//!
//! ```text
//! problem ──► create_math_prompt() ──► LlmClient (strict json_schema) ──► MathSolution
//! ```
//!
//! The generated code is returned as text and never executed.
//!
//! Credentials never touch the process environment: [`MathzConfig`] resolves
//! the API key once and hands it to the transport explicitly.

pub mod config;
pub mod error;
pub mod prompt;
pub mod solver;
pub mod types;

pub use config::MathzConfig;
pub use error::{MathzError, Result};
pub use solver::Solver;
pub use types::MathSolution;
