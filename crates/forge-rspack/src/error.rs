use std::fmt;

use forge_rspack_config::ConfigError;
use thiserror::Error;

/// Result type alias for plugin operations.
pub type Result<T, E = PluginError> = std::result::Result<T, E>;

/// Which family of bundles a compilation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessKind {
    Main,
    Renderer,
    Preload,
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProcessKind::Main => "main process",
            ProcessKind::Renderer => "renderer",
            ProcessKind::Preload => "preload",
        })
    }
}

/// A compilation that did not produce usable output.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The compiler finished but its statistics contain errors.
    #[error("Compilation errors in the {process}: {report}")]
    Stats {
        process: ProcessKind,
        /// The compiler's own textual report.
        report: String,
    },

    /// The compiler itself failed.
    #[error("{process} compilation failed: {source}")]
    Fatal {
        process: ProcessKind,
        #[source]
        source: anyhow::Error,
    },

    /// The compiler hung up before reporting a first result.
    #[error("{0} compiler stopped before reporting a result")]
    Closed(ProcessKind),
}

impl CompileError {
    pub fn process(&self) -> ProcessKind {
        match self {
            CompileError::Stats { process, .. } | CompileError::Fatal { process, .. } => *process,
            CompileError::Closed(process) => *process,
        }
    }
}

/// Error variants surfaced to the host build tool.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("could not determine the Electron version: {0}")]
    ElectronVersion(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure reported by an external collaborator (compiler, dev server,
    /// logger, native rebuilder).
    #[error(transparent)]
    External(#[from] anyhow::Error),
}
