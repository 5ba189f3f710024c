//! Solver integration tests: full solve flow over a recording stub transport.
//!
//! No test here touches the network: every request is captured by
//! `RecordingTransport` and answered with a canned reply.

use std::sync::Arc;

use parking_lot::Mutex;
use proptest::prelude::*;

use mathz_core::config::MathzConfig;
use mathz_core::{MathSolution, MathzError, Solver};
use mathz_llm::types::{ChatRequest, ChatResponse, ResponseFormat, Role};
use mathz_llm::{CompletionTransport, LlmError};

const RECTANGLE: &str = "A rectangle has a length that is 3 units longer than its width. \
If the perimeter of the rectangle is 26 units, what are the dimensions of the rectangle?";

const RECTANGLE_REPLY: &str = r#"{
    "answer": "Width = 5 units, Length = 8 units",
    "explanation": "Let w be the width. Then the length is w + 3. The perimeter is 2(w + w + 3) = 26, so 4w + 6 = 26 and w = 5.",
    "code": "def solve():\n    # perimeter = 2 * (w + (w + 3))\n    w = (26 / 2 - 3) / 2\n    return w, w + 3\n\nsolve()"
}"#;

// ---------------------------------------------------------------------------
// Stub transport
// ---------------------------------------------------------------------------

#[derive(Clone)]
enum Reply {
    Content(String),
    Fail(fn() -> LlmError),
}

#[derive(Clone)]
struct RecordingTransport {
    reply: Reply,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl RecordingTransport {
    fn replying(content: &str) -> Self {
        Self {
            reply: Reply::Content(content.to_string()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn failing(err: fn() -> LlmError) -> Self {
        Self {
            reply: Reply::Fail(err),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    fn last_request(&self) -> ChatRequest {
        self.requests
            .lock()
            .last()
            .cloned()
            .expect("at least one request")
    }
}

impl CompletionTransport for RecordingTransport {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        self.requests.lock().push(request.clone());
        match &self.reply {
            Reply::Content(text) => Ok(ChatResponse {
                content: Some(text.clone()),
                finish_reason: Some("stop".into()),
                model: request.model.clone(),
                ..ChatResponse::default()
            }),
            Reply::Fail(make) => Err(make()),
        }
    }
}

fn solver(transport: RecordingTransport) -> Solver<RecordingTransport> {
    Solver::from_config(&MathzConfig::default(), transport).expect("default config is valid")
}

// ---------------------------------------------------------------------------
// Successful solve
// ---------------------------------------------------------------------------

#[tokio::test]
async fn solves_rectangle_problem() {
    let transport = RecordingTransport::replying(RECTANGLE_REPLY);
    let solution = solver(transport.clone())
        .solve(RECTANGLE)
        .await
        .expect("should solve");

    assert_eq!(solution.answer, "Width = 5 units, Length = 8 units");
    assert!(solution.explanation.contains("w = 5"));
    assert!(solution.code.contains("def solve()"));
    assert!(solution.blank_fields().is_empty());
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn request_has_system_role_model_and_strict_schema() {
    let transport = RecordingTransport::replying(RECTANGLE_REPLY);
    solver(transport.clone()).solve(RECTANGLE).await.expect("should solve");

    let request = transport.last_request();
    assert_eq!(request.model, "gpt-4o-mini");
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, Role::System);
    assert_eq!(request.messages[0].content, "You are an expert mathematics tutor.");
    assert_eq!(request.messages[1].role, Role::User);

    match request.response_format {
        Some(ResponseFormat::JsonSchema { json_schema }) => {
            assert_eq!(json_schema.name, "MathSolution");
            assert!(json_schema.strict);
            assert_eq!(json_schema.schema["additionalProperties"], false);
        }
        other => panic!("expected json_schema response format, got {other:?}"),
    }
}

#[tokio::test]
async fn config_model_and_sampling_reach_the_request() {
    let config = MathzConfig::from_toml(
        "[llm]\nmodel = \"gpt-4o\"\ntemperature = 0.0\nmax_tokens = 800\n",
    )
    .expect("parse");
    let transport = RecordingTransport::replying(RECTANGLE_REPLY);
    Solver::from_config(&config, transport.clone())
        .expect("valid")
        .solve(RECTANGLE)
        .await
        .expect("should solve");

    let request = transport.last_request();
    assert_eq!(request.model, "gpt-4o");
    assert_eq!(request.temperature, Some(0.0));
    assert_eq!(request.max_tokens, Some(800));
}

// ---------------------------------------------------------------------------
// Malformed replies are failures, never partial records
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_field_is_reported() {
    let transport = RecordingTransport::replying(r#"{"answer": "8", "explanation": "because"}"#);
    let err = solver(transport).solve(RECTANGLE).await.unwrap_err();
    assert!(
        matches!(err, MathzError::Llm(LlmError::ParseError(ref msg)) if msg.contains("code")),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn empty_field_is_reported() {
    let transport =
        RecordingTransport::replying(r#"{"answer": "8", "explanation": "", "code": "print(8)"}"#);
    let err = solver(transport).solve(RECTANGLE).await.unwrap_err();
    assert!(
        matches!(err, MathzError::Llm(LlmError::SchemaValidation(ref msg)) if msg.contains("explanation")),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn non_json_reply_is_reported() {
    let transport = RecordingTransport::replying("The answer is 5 and 8.");
    let err = solver(transport).solve(RECTANGLE).await.unwrap_err();
    assert!(matches!(err, MathzError::Llm(LlmError::ParseError(_))));
}

#[tokio::test]
async fn transport_errors_propagate_unchanged() {
    let transport = RecordingTransport::failing(|| LlmError::Authentication {
        status: 401,
        message: "Incorrect API key provided".into(),
    });
    let err = solver(transport.clone()).solve(RECTANGLE).await.unwrap_err();
    assert!(matches!(
        err,
        MathzError::Llm(LlmError::Authentication { status: 401, .. })
    ));
    assert_eq!(transport.calls(), 1, "no retry after a failure");
}

// ---------------------------------------------------------------------------
// Failures that happen before any request
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blank_problem_makes_no_call() {
    let transport = RecordingTransport::replying(RECTANGLE_REPLY);
    let solver = solver(transport.clone());
    for problem in ["", "   ", "\n\t"] {
        let err = solver.solve(problem).await.unwrap_err();
        assert!(matches!(err, MathzError::InvalidProblem(_)));
    }
    assert_eq!(transport.calls(), 0);
}

#[test]
fn missing_credential_fails_at_startup() {
    let config = MathzConfig::from_toml("[llm]\napi_key_env = \"MATHZ_TEST_KEY_THAT_IS_NEVER_SET\"\n")
        .expect("parse");
    match Solver::openai(&config) {
        Err(MathzError::MissingCredential { env_var }) => {
            assert_eq!(env_var, "MATHZ_TEST_KEY_THAT_IS_NEVER_SET");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("solver built without a credential"),
    }
}

#[test]
fn file_credential_builds_openai_solver() {
    let config = MathzConfig::from_toml(
        "[llm]\napi_key_env = \"MATHZ_TEST_KEY_THAT_IS_NEVER_SET\"\napi_key = \"sk-test\"\n",
    )
    .expect("parse");
    let solver = Solver::openai(&config).expect("credential from file");
    assert_eq!(solver.client().model(), "gpt-4o-mini");
    assert_eq!(
        solver.client().transport().endpoint(),
        "https://api.openai.com/v1/chat/completions"
    );
}

// ---------------------------------------------------------------------------
// Property: the problem reaches the endpoint verbatim
// ---------------------------------------------------------------------------

fn block_on<F: std::future::Future>(fut: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
        .block_on(fut)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prompt_contains_problem_verbatim(problem in "\\PC*[a-zA-Z0-9]\\PC*") {
        let transport = RecordingTransport::replying(RECTANGLE_REPLY);
        let solution: MathSolution = block_on(solver(transport.clone()).solve(&problem))
            .expect("should solve");
        prop_assert!(!solution.answer.is_empty());

        let request = transport.last_request();
        let user = request.first_content(Role::User).expect("user message");
        prop_assert!(user.contains(problem.as_str()));
    }

    #[test]
    fn braces_in_problem_are_not_treated_as_placeholders(
        prefix in "[a-z ]{1,10}",
        key in "[a-z_]{1,12}",
    ) {
        let problem = format!("{prefix}{{{key}}} and {{problem_text}}");
        let transport = RecordingTransport::replying(RECTANGLE_REPLY);
        block_on(solver(transport.clone()).solve(&problem)).expect("should solve");

        let request = transport.last_request();
        let user = request.first_content(Role::User).expect("user message");
        prop_assert!(user.contains(problem.as_str()));
    }
}
