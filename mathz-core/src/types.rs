//! The solution record returned for every solved problem.

use std::fmt;

use mathz_llm::StructuredOutput;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Solution to a high school mathematics problem with explanation and Python code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MathSolution {
    /// The final numerical answer to the problem
    pub answer: String,
    /// A detailed, step-by-step explanation of how to solve the problem
    pub explanation: String,
    /// Python code that implements the solution and returns the answer
    pub code: String,
}

impl MathSolution {
    /// Names of fields that are empty or whitespace-only.
    #[must_use]
    pub fn blank_fields(&self) -> Vec<&'static str> {
        [
            ("answer", &self.answer),
            ("explanation", &self.explanation),
            ("code", &self.code),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Pretty JSON form of the record.
    ///
    /// # Errors
    ///
    /// Only fails if serialization itself fails, which cannot happen for
    /// plain strings.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl StructuredOutput for MathSolution {
    const NAME: &'static str = "MathSolution";
    const DESCRIPTION: &'static str =
        "Solution to a high school mathematics problem with explanation and Python code";

    fn validate(&self) -> Result<(), String> {
        let blank = self.blank_fields();
        if blank.is_empty() {
            Ok(())
        } else {
            Err(format!("empty field(s): {}", blank.join(", ")))
        }
    }
}

impl fmt::Display for MathSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Answer: {}", self.answer)?;
        writeln!(f, "\nStep-by-step solution:\n{}", self.explanation)?;
        write!(f, "\nPython code:\n{}", self.code)
    }
}
