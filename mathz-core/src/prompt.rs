//! Prompt templates for math problem solving.
//!
//! The built-in templates are compiled in; a replacement can be loaded from a
//! TOML file (see [`mathz_llm::prompt::PromptTemplate::from_file`]) as long as
//! its user prompt keeps the `{problem_text}` placeholder.

use mathz_llm::prompt::{PromptTemplate, has_placeholder, render_template};

use crate::error::{MathzError, Result};

/// Placeholder the problem statement is substituted into.
pub const PROBLEM_PLACEHOLDER: &str = "problem_text";

/// System prompt sent with every problem.
pub const MATH_TUTOR_SYSTEM: &str = "You are an expert mathematics tutor.";

/// User prompt template. `{problem_text}` is replaced verbatim.
pub const MATH_PROBLEM_USER: &str = r"
Solve the following high school mathematics problem:
{problem_text}
Provide your solution in the following format:
1. The final numerical answer to the problem
2. A detailed, step-by-step explanation of how to solve the problem
3. Python code that implements the solution and returns the answer
Ensure that your Python code is executable and follows these guidelines:
- Use only Python's built-in functions and the math module
- Include comments explaining each step
- Handle potential edge cases or invalid inputs
- Return the final answer as the last line of the function
Remember, this is a high school level problem, so advanced mathematical concepts or libraries should not be necessary.
";

/// The compiled-in template pair.
#[must_use]
pub fn builtin_template() -> PromptTemplate {
    PromptTemplate::builtin(MATH_TUTOR_SYSTEM, MATH_PROBLEM_USER)
}

/// Render the built-in user prompt for `problem_text`.
#[must_use]
pub fn create_math_prompt(problem_text: &str) -> String {
    render_template(MATH_PROBLEM_USER, &[(PROBLEM_PLACEHOLDER, problem_text)])
}

/// Reject templates that would drop the problem from the prompt.
///
/// # Errors
///
/// Returns [`MathzError::Config`] if the user prompt lacks `{problem_text}`.
pub fn check_template(template: &PromptTemplate) -> Result<()> {
    if has_placeholder(&template.user, PROBLEM_PLACEHOLDER) {
        Ok(())
    } else {
        Err(MathzError::Config(format!(
            "prompt template {} has no {{{PROBLEM_PLACEHOLDER}}} placeholder in its user prompt",
            template.version
        )))
    }
}
