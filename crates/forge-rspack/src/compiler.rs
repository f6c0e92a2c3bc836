//! Compiler abstraction
//!
//! The bundler engine itself lives outside this crate. It is consumed through
//! the [`Compiler`] trait: run a batch of configurations once, watch a single
//! configuration, or build a long-lived multi-configuration compiler that a
//! [`DevServer`](crate::DevServer) drives.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use forge_rspack_config::BundlerConfig;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;

/// Statistics of one configuration's compilation
#[derive(Debug, Clone, Default)]
pub struct CompileStats {
    /// Configuration name, if any
    pub name: Option<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Human readable report, as printed to a terminal
    pub report: String,
    /// Serializable statistics snapshot
    pub json: Value,
}

impl CompileStats {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl fmt::Display for CompileStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.report)
    }
}

/// Statistics of a batched run, one entry per configuration in input order
#[derive(Debug, Clone, Default)]
pub struct MultiStats {
    pub stats: Vec<CompileStats>,
}

impl MultiStats {
    pub fn has_errors(&self) -> bool {
        self.stats.iter().any(CompileStats::has_errors)
    }
}

impl fmt::Display for MultiStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stats) in self.stats.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{stats}")?;
        }
        Ok(())
    }
}

/// Result of one watch-mode rebuild
#[derive(Debug)]
pub enum WatchEvent {
    Built(CompileStats),
    Failed(anyhow::Error),
}

/// A running watch-mode compilation
pub trait Watching: Send + Sync {
    /// Stop watching. In-flight compiles finish or abort as the compiler sees fit.
    fn close(&self);
}

/// Handle returned by [`Compiler::watch`]
pub struct WatchSession {
    pub watching: Box<dyn Watching>,
    /// One event per rebuild; closes when the watcher stops
    pub events: UnboundedReceiver<WatchEvent>,
}

/// Opaque multi-configuration compiler instance, handed to the dev server
pub type CompilerHandle = Arc<dyn Any + Send + Sync>;

/// Completion of one configuration inside a multi-compiler
#[derive(Debug)]
pub enum CompileEvent {
    Done { index: usize, stats: CompileStats },
    Failed { index: usize, error: anyhow::Error },
}

impl CompileEvent {
    /// Index of the configuration the event belongs to
    pub fn index(&self) -> usize {
        match self {
            CompileEvent::Done { index, .. } | CompileEvent::Failed { index, .. } => *index,
        }
    }
}

/// Handle returned by [`Compiler::multi`]
pub struct MultiCompiler {
    pub handle: CompilerHandle,
    /// One event per configuration per build; closes with the compiler
    pub events: UnboundedReceiver<CompileEvent>,
}

#[async_trait]
pub trait Compiler: Send + Sync {
    /// Compile every configuration once, as a single batch.
    ///
    /// `Err` is a fatal compiler failure. Compilation errors are reported
    /// through the returned statistics.
    async fn run(&self, configs: Vec<BundlerConfig>) -> anyhow::Result<MultiStats>;

    /// Compile one configuration and recompile on every source change.
    fn watch(&self, config: BundlerConfig) -> anyhow::Result<WatchSession>;

    /// Build a multi-configuration compiler without starting it.
    fn multi(&self, configs: Vec<BundlerConfig>) -> anyhow::Result<MultiCompiler>;
}
