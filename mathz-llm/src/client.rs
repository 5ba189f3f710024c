//! LLM client: schema-constrained generation over any transport.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::transport::CompletionTransport;
use crate::types::{ChatRequest, ResponseFormat};

/// A type the model can be asked to produce.
///
/// The JSON Schema sent to the provider is derived from the type itself, so
/// the request constraint and the parser can never drift apart.
pub trait StructuredOutput: DeserializeOwned + JsonSchema {
    /// Schema name sent to the provider (`[a-zA-Z0-9_-]+`).
    const NAME: &'static str;
    /// What the output represents.
    const DESCRIPTION: &'static str;

    /// Checks that serde cannot express (e.g. non-empty strings).
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the value is unusable.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// The strict `json_schema` response format for this type.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Schema`] if the derived schema cannot be serialized.
    fn response_format() -> Result<ResponseFormat, LlmError> {
        Ok(ResponseFormat::json_schema(
            Self::NAME,
            Some(Self::DESCRIPTION.to_string()),
            json_schema_for::<Self>()?,
        ))
    }
}

/// JSON Schema for `T` in the form accepted by strict structured outputs.
///
/// The `$schema` meta key is dropped; everything else is kept as derived.
///
/// # Errors
///
/// Returns [`LlmError::Schema`] if the schema does not serialize to a JSON object.
pub fn json_schema_for<T: JsonSchema>() -> Result<serde_json::Value, LlmError> {
    let root = schemars::schema_for!(T);
    let mut value = serde_json::to_value(&root).map_err(|e| LlmError::Schema(e.to_string()))?;
    let obj = value
        .as_object_mut()
        .ok_or_else(|| LlmError::Schema(format!("schema for {} is not an object", T::schema_name())))?;
    obj.remove("$schema");
    Ok(value)
}

/// Parse raw LLM text as structured JSON.
///
/// # Errors
///
/// Returns `Err` if the text is not valid JSON or doesn't match the expected type.
pub fn parse_structured<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    serde_json::from_str(text)
        .map_err(|e| LlmError::ParseError(format!("JSON parse error: {e}; raw text: '{text}'")))
}

/// The main LLM client: one model, one transport.
#[derive(Debug, Clone)]
pub struct LlmClient<T> {
    transport: T,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl<T: CompletionTransport> LlmClient<T> {
    /// Create a new LLM client.
    #[must_use]
    pub fn new(transport: T, model: impl Into<String>) -> Self {
        Self {
            transport,
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the output token cap.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the request that [`Self::generate_structured`] would send.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Schema`] if the schema for `R` cannot be built.
    pub fn build_request<R: StructuredOutput>(
        &self,
        system: &str,
        user: &str,
    ) -> Result<ChatRequest, LlmError> {
        Ok(ChatRequest::new(self.model.clone())
            .system(system)
            .user(user)
            .with_response_format(R::response_format()?)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens))
    }

    /// Send one request and parse the reply into `R`.
    ///
    /// # Errors
    ///
    /// Transport errors pass through unchanged. A refusal, truncated output,
    /// empty content, undecodable JSON, or a value failing
    /// [`StructuredOutput::validate`] are all errors; nothing is retried.
    pub async fn generate_structured<R: StructuredOutput>(
        &self,
        system: &str,
        user: &str,
    ) -> Result<R, LlmError> {
        let request = self.build_request::<R>(system, user)?;
        let response = self.transport.complete(&request).await?;

        if let Some(refusal) = response.refusal.filter(|r| !r.trim().is_empty()) {
            warn!(schema = R::NAME, "model refused structured request");
            return Err(LlmError::Refused(refusal));
        }
        if let Some(reason) = response.finish_reason.as_deref() {
            if reason == "length" || reason == "content_filter" {
                warn!(schema = R::NAME, finish_reason = reason, "structured output cut short");
                return Err(LlmError::Truncated(reason.to_string()));
            }
        }

        let content = response
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        let value: R = parse_structured(&content)?;
        value.validate().map_err(|reason| {
            warn!(schema = R::NAME, %reason, "structured output rejected");
            LlmError::SchemaValidation(reason)
        })?;

        debug!(
            schema = R::NAME,
            model = %response.model,
            latency_ms = response.latency_ms,
            "structured output accepted"
        );
        Ok(value)
    }
}
