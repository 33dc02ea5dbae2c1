//! Operator commands for the LLM debug log
//!
//! ```text
//! llm-debug              # print the whole log
//! llm-debug tail [N]     # last N lines (default 50)
//! llm-debug clear        # truncate the log
//! ```
use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use llm_trace_core::{TraceConfig, TraceError};
use llm_trace_store::{LogStore, DEFAULT_TAIL_LINES};

#[derive(Debug, Parser)]
#[command(name = "llm-debug", about = "View or clear the LLM pipeline debug log")]
pub struct Cli {
    /// Log file to read (defaults to $LLM_DEBUG_LOG, then llm_debug.log)
    #[arg(long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print the last N lines of the log
    Tail {
        #[arg(default_value_t = DEFAULT_TAIL_LINES, value_parser = parse_line_count)]
        lines: usize,
    },
    /// Empty the log
    Clear,
}

fn parse_line_count(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("'{raw}' is not a positive line count")),
        Ok(n) => Ok(n),
    }
}

impl Cli {
    /// Store selected by `--file`, falling back to `config`
    pub fn store(&self, config: TraceConfig) -> LogStore {
        let config = match &self.file {
            Some(path) => config.with_path(path.clone()),
            None => config,
        };
        LogStore::from_config(&config)
    }
}

/// Execute the selected command, writing operator output to `out`
pub fn run<W: Write>(cli: &Cli, config: TraceConfig, out: &mut W) -> anyhow::Result<()> {
    let store = cli.store(config);
    tracing::debug!(path = %store.path().display(), command = ?cli.command, "llm-debug");

    match &cli.command {
        None => {
            store.dump_to(out)?;
        }
        Some(Command::Tail { lines }) => {
            store.tail_to(*lines, out)?;
        }
        Some(Command::Clear) => {
            store.clear()?;
            writeln!(out, "Debug log cleared: {}", store.path().display())
                .and_then(|_| out.flush())
                .map_err(TraceError::OutputFailure)?;
        }
    }
    Ok(())
}

/// The operator's pipe closed early (`llm-debug | head`); not worth reporting
pub fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.downcast_ref::<TraceError>()
        .is_some_and(TraceError::is_broken_pipe)
}
