//! Transports. The only layer that talks to a completion endpoint.

use std::future::Future;
use std::time::Instant;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::types::{ApiKey, ChatRequest, ChatResponse, Usage};

/// Capability: send a chat request, receive the provider's reply.
///
/// Implementations perform exactly one round-trip per call.
pub trait CompletionTransport {
    fn complete(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, LlmError>> + Send;
}

/// OpenAI-compatible chat-completions transport.
#[derive(Debug, Clone)]
pub struct OpenAiTransport {
    http: Client,
    base_url: String,
    api_key: ApiKey,
}

impl OpenAiTransport {
    /// Create a transport for `base_url` (without the `/v1/...` suffix).
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: ApiKey) -> Self {
        Self::with_client(base_url, api_key, Client::new())
    }

    /// Same as [`Self::new`] over a caller-configured HTTP client.
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, api_key: ApiKey, http: Client) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Full URL of the chat-completions endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

impl CompletionTransport for OpenAiTransport {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let url = self.endpoint();
        debug!(model = %request.model, %url, "sending chat completion");

        let start = Instant::now();
        let resp = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .json(request)
            .send()
            .await?;
        let latency_ms = start.elapsed().as_millis() as u64;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            warn!("OpenAI API returned HTTP {}", status);
            return Err(classify_status(status, &body));
        }

        let mut response = parse_completion_body(&body)?;
        response.latency_ms = latency_ms;
        debug!(
            latency_ms,
            completion_tokens = response.usage.map(|u| u.completion_tokens).unwrap_or(0),
            "chat completion received"
        );
        Ok(response)
    }
}

/// Map a non-success HTTP status to an error.
#[must_use]
pub fn classify_status(status: StatusCode, body: &str) -> LlmError {
    let message = error_message(body).unwrap_or_else(|| body.trim().to_string());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Authentication {
            status: status.as_u16(),
            message,
        },
        _ => LlmError::RequestFailed(format!("HTTP {status}: {message}")),
    }
}

/// Extract `error.message` from an OpenAI error body.
fn error_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }
    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error.message)
}

#[derive(Debug, Deserialize)]
struct CompletionBody {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
    refusal: Option<String>,
}

/// Parse a successful chat-completions body. Only the first choice is used.
///
/// # Errors
///
/// Returns [`LlmError::ParseError`] if the body is not JSON or has no choices.
pub fn parse_completion_body(body: &str) -> Result<ChatResponse, LlmError> {
    let parsed: CompletionBody = serde_json::from_str(body)
        .map_err(|e| LlmError::ParseError(format!("completion body: {e}")))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::ParseError("completion body has no choices".into()))?;

    Ok(ChatResponse {
        content: choice.message.content,
        refusal: choice.message.refusal,
        finish_reason: choice.finish_reason,
        model: parsed.model,
        usage: parsed.usage,
        latency_ms: 0,
    })
}
