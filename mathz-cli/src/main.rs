//! `mathz`: solve a math word problem with a schema-constrained LLM call.
//!
//! # Usage
//!
//! ```bash
//! # Built-in example problem (needs OPENAI_API_KEY in the env or .env)
//! cargo run -p mathz-cli --
//!
//! # Your own problem, another model
//! cargo run -p mathz-cli -- --model gpt-4o "What is the sum of the first 50 odd numbers?"
//!
//! # JSON only, e.g. for piping into jq
//! cargo run -p mathz-cli -- --json "Solve 3x + 7 = 22"
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use mathz_core::config::{GeneralConfig, LogFormat};
use mathz_core::{MathzConfig, Solver};

const EXAMPLE_PROBLEM: &str = "A rectangle has a length that is 3 units longer than its width. \
If the perimeter of the rectangle is 26 units, what are the dimensions of the rectangle?";

#[derive(Debug, Parser)]
#[command(name = "mathz", version, about = "Solve a math word problem with an LLM")]
struct Args {
    /// Problem statement (defaults to a built-in example).
    problem: Option<String>,

    /// Config file (defaults to ./mathz.toml if present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Model identifier, overriding `llm.model`.
    #[arg(long)]
    model: Option<String>,

    /// Print only the JSON record.
    #[arg(long)]
    json: bool,
}

fn init_tracing(general: &GeneralConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&general.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match general.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let dotenv_path = dotenv::dotenv().ok();

    let mut config = MathzConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(model) = args.model {
        config.llm.model = model;
    }

    init_tracing(&config.general);
    match dotenv_path {
        Some(path) => debug!("loaded environment from {}", path.display()),
        None => debug!("no .env file found"),
    }
    debug!(?config, "configuration loaded");

    let solver = Solver::openai(&config).context("initialising solver")?;

    let problem = args.problem.as_deref().unwrap_or(EXAMPLE_PROBLEM);
    let solution = solver.solve(problem).await.context("solving problem")?;

    println!("{}", solution.to_json_pretty()?);
    if !args.json {
        println!("{solution}");
    }
    Ok(())
}
