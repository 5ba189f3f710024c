//! Problem solver: one problem in, one [`MathSolution`] out.

use std::time::Instant;

use mathz_llm::prompt::PromptTemplate;
use mathz_llm::{ApiKey, CompletionTransport, LlmClient, OpenAiTransport};
use tracing::info;

use crate::config::MathzConfig;
use crate::error::{MathzError, Result};
use crate::prompt::{self, PROBLEM_PLACEHOLDER};
use crate::types::MathSolution;

/// Solves math word problems through a schema-constrained completion call.
#[derive(Debug, Clone)]
pub struct Solver<T> {
    client: LlmClient<T>,
    template: PromptTemplate,
}

impl<T: CompletionTransport> Solver<T> {
    /// Create a solver using the built-in prompt template.
    #[must_use]
    pub fn new(client: LlmClient<T>) -> Self {
        Self {
            client,
            template: prompt::builtin_template(),
        }
    }

    /// Build a solver over `transport` from the model and prompt settings in `config`.
    ///
    /// # Errors
    /// Returns `MathzError::Config` if the configured prompt template is unusable.
    pub fn from_config(config: &MathzConfig, transport: T) -> Result<Self> {
        let client = LlmClient::new(transport, config.llm.model.clone())
            .with_temperature(config.llm.temperature)
            .with_max_tokens(config.llm.max_tokens);
        Self::new(client).with_template(config.prompt_template()?)
    }

    /// Replace the prompt template.
    ///
    /// # Errors
    /// Returns `MathzError::Config` if the template drops `{problem_text}`.
    pub fn with_template(mut self, template: PromptTemplate) -> Result<Self> {
        prompt::check_template(&template)?;
        self.template = template;
        Ok(self)
    }

    #[must_use]
    pub fn client(&self) -> &LlmClient<T> {
        &self.client
    }

    /// Render `(system, user)` prompts for a problem.
    #[must_use]
    pub fn render_prompt(&self, problem_text: &str) -> (String, String) {
        self.template.render(&[(PROBLEM_PLACEHOLDER, problem_text)])
    }

    /// Solve one problem with a single completion call.
    ///
    /// The problem text is inserted into the prompt exactly as given.
    ///
    /// # Errors
    /// - `MathzError::InvalidProblem` for a blank problem (no call is made).
    /// - `MathzError::Llm` for transport failures and replies that are
    ///   refused, truncated, malformed, or have an empty field.
    pub async fn solve(&self, problem_text: &str) -> Result<MathSolution> {
        if problem_text.trim().is_empty() {
            return Err(MathzError::InvalidProblem("problem statement is empty".into()));
        }

        let (system, user) = self.render_prompt(problem_text);
        info!(
            model = self.client.model(),
            prompt_version = %self.template.version,
            problem_chars = problem_text.chars().count(),
            "solving problem"
        );

        let start = Instant::now();
        let solution: MathSolution = self.client.generate_structured(&system, &user).await?;
        info!(elapsed_ms = start.elapsed().as_millis() as u64, "problem solved");
        Ok(solution)
    }
}

impl Solver<OpenAiTransport> {
    /// Build an OpenAI-backed solver, reading the API key via
    /// [`MathzConfig::resolve_api_key`].
    ///
    /// The credential is resolved before anything else, so a missing key fails
    /// here and no request is ever attempted.
    ///
    /// # Errors
    /// `MathzError::MissingCredential` or `MathzError::Config`.
    pub fn openai(config: &MathzConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;
        Self::openai_with_key(config, api_key)
    }

    /// Build an OpenAI-backed solver with an already-resolved key.
    ///
    /// # Errors
    /// `MathzError::Config` if the configured prompt template is unusable.
    pub fn openai_with_key(config: &MathzConfig, api_key: ApiKey) -> Result<Self> {
        let transport = OpenAiTransport::new(config.llm.base_url.clone(), api_key);
        Self::from_config(config, transport)
    }
}
