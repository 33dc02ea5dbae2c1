//! Binary entrypoint for the debug log viewer.
use std::process::ExitCode;

use clap::Parser;
use llm_trace_cli::{is_broken_pipe, run, Cli};
use llm_trace_core::TraceConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "llm_trace_store=warn,llm_trace_cli=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // clap prints usage and exits with status 2 on bad arguments
    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();

    match run(&cli, TraceConfig::from_env(), &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if is_broken_pipe(&err) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
