//! Unified Error Model
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("WRITE/{}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("READ/{}: {source}", .path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CLEAR/{}: {source}", .path.display())]
    ClearFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The operator's output (stdout, a pipe) refused the bytes
    #[error("OUTPUT/{0}")]
    OutputFailure(#[source] std::io::Error),

    #[error("CONFIG/{0}")]
    Config(String),
}

impl TraceError {
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailure { path: path.into(), source }
    }

    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFailure { path: path.into(), source }
    }

    pub fn clear(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ClearFailure { path: path.into(), source }
    }

    /// Reader closed the pipe (`llm-debug | head`)
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, Self::OutputFailure(e) if e.kind() == std::io::ErrorKind::BrokenPipe)
    }
}
