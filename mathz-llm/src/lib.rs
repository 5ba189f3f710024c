//! # mathz-llm — Structured-Output LLM Client for MATHZ
//!
//! Provides one capability: send a system + user prompt to a chat-completion
//! endpoint and get back a reply constrained to a JSON Schema.
//!
//!   - **OpenAI-compatible API** (`/v1/chat/completions`, strict `json_schema`
//!     response format)
//!   - **Any other backend** by implementing [`CompletionTransport`]
//!
//! Every call is a single request. There is no retry, fallback, or caching
//! layer: a failed call surfaces as an [`LlmError`] to the caller.
//!
//! # Architecture
//!
//! ```text
//! LlmClient::generate_structured::<T>()
//!     │  builds ChatRequest { model, [system, user], json_schema(T) }
//!     ▼
//! CompletionTransport::complete()          ← OpenAiTransport / test stubs
//!     │  returns ChatResponse { content, refusal, finish_reason, usage }
//!     ▼
//! parse_structured::<T>() + T::validate()  → T
//! ```

pub mod client;
pub mod error;
pub mod prompt;
pub mod transport;
pub mod types;

pub use client::{LlmClient, StructuredOutput};
pub use error::LlmError;
pub use transport::{CompletionTransport, OpenAiTransport};
pub use types::{ApiKey, ChatMessage, ChatRequest, ChatResponse, ResponseFormat, Role, Usage};
