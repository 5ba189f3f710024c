//! Prompt templates.
//!
//! A template is a system/user prompt pair with `{key}` placeholders. Built-in
//! templates live as `const` strings in the crates that use them; a template
//! can also be loaded from a versioned TOML file:
//!
//! ```toml
//! [prompt]
//! version = "1.1"
//! system = "You are an expert mathematics tutor."
//! user = """
//! Solve: {problem_text}
//! """
//! ```

use std::path::Path;

use serde::Deserialize;

/// Simple template interpolation for prompts.
///
/// Replaces `{key}` with the corresponding value. Substituted values are not
/// re-scanned, so braces inside a value survive untouched.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    'scan: while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        if let Some(close) = after.find('}') {
            let key = &after[..close];
            for (name, value) in vars {
                if *name == key {
                    out.push_str(value);
                    rest = &after[close + 1..];
                    continue 'scan;
                }
            }
        }
        out.push('{');
        rest = after;
    }
    out.push_str(rest);
    out
}

/// Whether `template` contains the `{key}` placeholder.
#[must_use]
pub fn has_placeholder(template: &str, key: &str) -> bool {
    template.contains(&format!("{{{key}}}"))
}

#[derive(Debug, Clone, Deserialize)]
struct TomlPromptFile {
    prompt: PromptTemplate,
}

/// A loaded, ready-to-render prompt template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PromptTemplate {
    /// Prompt version string (e.g., "1.0").
    #[serde(default = "default_version")]
    pub version: String,
    /// System prompt template.
    pub system: String,
    /// User prompt template.
    pub user: String,
}

fn default_version() -> String {
    "unversioned".to_string()
}

impl PromptTemplate {
    /// Create a template from compiled-in strings.
    #[must_use]
    pub fn builtin(system: &str, user: &str) -> Self {
        Self {
            version: "builtin".into(),
            system: system.into(),
            user: user.into(),
        }
    }

    /// Parse a template from a TOML document with a `[prompt]` table.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or a field is missing.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        let parsed: TomlPromptFile =
            toml::from_str(content).map_err(|e| format!("invalid prompt template: {e}"))?;
        Ok(parsed.prompt)
    }

    /// Load a template from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        Self::from_toml(&content).map_err(|e| format!("{}: {e}", path.display()))
    }

    /// Render both prompts, returning `(system, user)`.
    #[must_use]
    pub fn render(&self, vars: &[(&str, &str)]) -> (String, String) {
        (
            render_template(&self.system, vars),
            render_template(&self.user, vars),
        )
    }
}
