use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rubofix::cli::Cli;
use rubofix::config::Config;
use rubofix::linter::RubocopLinter;
use rubofix::model::OpenAiClient;
use rubofix::orchestrator::{Orchestrator, RunOutcome};
use rubofix::prompts::PromptEngine;
use rubofix::report::StdoutReporter;

/// Exit status for anything that is broken rather than merely unfinished.
const EXIT_FATAL: i32 = 2;

fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn fatal(e: impl std::fmt::Display) -> ! {
    eprintln!("error: {e}");
    std::process::exit(EXIT_FATAL);
}

fn main() {
    let cli = Cli::parse();

    // config first so we fail fast
    let config = Config::load(&cli).unwrap_or_else(|e| fatal(e));
    init_logging(config.debug);
    info!(?config, "config loaded");

    let repo_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let prompts = PromptEngine::new(config.prompt_dir.as_deref()).unwrap_or_else(|e| fatal(e));
    let linter =
        RubocopLinter::new(config.linter.clone(), repo_root).unwrap_or_else(|e| fatal(e));
    let model = OpenAiClient::from_config(&config);
    let reporter = StdoutReporter {
        debug: config.debug,
    };

    let orchestrator = Orchestrator::new(linter, model, prompts, reporter, config);
    match orchestrator.run() {
        Ok(outcome) => {
            if let RunOutcome::Remaining { fixed, left } = outcome {
                info!(fixed, left, "run limit reached");
            }
            std::process::exit(outcome.exit_code());
        }
        Err(e) => fatal(e),
    }
}
