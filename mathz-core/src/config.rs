//! Configuration for MATHZ.
//!
//! Maps directly to `mathz.toml`. Every key is optional:
//!
//! ```toml
//! [general]
//! log_level = "info"
//! log_format = "text"   # or "json"
//!
//! [llm]
//! base_url = "https://api.openai.com"
//! model = "gpt-4o-mini"
//! api_key_env = "OPENAI_API_KEY"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use mathz_llm::ApiKey;
use mathz_llm::prompt::PromptTemplate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MathzError, Result};
use crate::prompt;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "mathz.toml";

/// Top-level MATHZ configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MathzConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Completion endpoint settings.
    #[serde(default)]
    pub llm: LlmSettings,
}

impl MathzConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `MathzError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| MathzError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// A relative `llm.prompt_file` is resolved against the directory that
    /// holds the config file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)
            .map_err(|e| MathzError::Config(format!("{}: {e}", path.display())))?;
        if let (Some(dir), Some(prompt_file)) = (path.parent(), config.llm.prompt_file.as_mut()) {
            if prompt_file.is_relative() {
                *prompt_file = dir.join(&*prompt_file);
            }
        }
        Ok(config)
    }

    /// Load from `path` if given (it must exist), otherwise from
    /// [`DEFAULT_CONFIG_FILE`] if present, otherwise defaults.
    ///
    /// # Errors
    /// Returns an error if a file is selected but cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    debug!("loading config from {}", default.display());
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Resolve the API key from the process environment, then the file.
    ///
    /// # Errors
    /// Returns `MathzError::MissingCredential` if neither source has a key.
    pub fn resolve_api_key(&self) -> Result<ApiKey> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// [`Self::resolve_api_key`] with an explicit environment lookup.
    ///
    /// # Errors
    /// Returns `MathzError::MissingCredential` if neither source has a key.
    pub fn resolve_api_key_with<F>(&self, lookup: F) -> Result<ApiKey>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(&self.llm.api_key_env)
            .and_then(ApiKey::new)
            .or_else(|| self.llm.api_key.clone().and_then(ApiKey::new))
            .ok_or_else(|| MathzError::MissingCredential {
                env_var: self.llm.api_key_env.clone(),
            })
    }

    /// The prompt template to use: `llm.prompt_file` if set, else built-in.
    ///
    /// # Errors
    /// Returns `MathzError::Config` if the file cannot be loaded or drops the
    /// problem placeholder.
    pub fn prompt_template(&self) -> Result<PromptTemplate> {
        let template = match &self.llm.prompt_file {
            Some(path) => PromptTemplate::from_file(path).map_err(MathzError::Config)?,
            None => prompt::builtin_template(),
        };
        prompt::check_template(&template)?;
        Ok(template)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when `RUST_LOG` is unset: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log line format on stderr.
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Completion endpoint settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Base URL of the OpenAI-compatible API (no `/v1` suffix).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Fallback API key when the environment variable is unset.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Sampling temperature (provider default when unset).
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Output token cap (provider default when unset).
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// TOML prompt template replacing the built-in one. Relative paths are
    /// taken from the config file's directory.
    #[serde(default)]
    pub prompt_file: Option<PathBuf>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            api_key: None,
            temperature: None,
            max_tokens: None,
            prompt_file: None,
        }
    }
}

impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key_env", &self.api_key_env)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("prompt_file", &self.prompt_file)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

fn default_log_level() -> String {
    "info".to_string()
}
fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}
