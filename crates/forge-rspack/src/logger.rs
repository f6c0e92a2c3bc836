//! Log sinks for development mode.
//!
//! Each concurrently building bundle writes into its own [`LogTab`]. The
//! [`Logger`] owning the tabs is started once per development session and
//! stopped at teardown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

/// A named output pane
pub trait LogTab: Send + Sync {
    fn log(&self, text: &str);
}

#[async_trait]
pub trait Logger: Send + Sync {
    async fn start(&self) -> anyhow::Result<()>;

    fn stop(&self);

    fn create_tab(&self, label: &str) -> Arc<dyn LogTab>;

    /// Where the output can be viewed
    fn url(&self) -> String;
}

/// Builds the logger for a session from the configured logger port
pub type LoggerFactory = Arc<dyn Fn(u32) -> Arc<dyn Logger> + Send + Sync>;

pub fn tracing_logger_factory() -> LoggerFactory {
    Arc::new(|port| Arc::new(TracingLogger::new(port)))
}

/// Logger writing every tab into `tracing` events labelled with the tab name
#[derive(Debug)]
pub struct TracingLogger {
    port: u32,
    running: AtomicBool,
}

impl TracingLogger {
    pub fn new(port: u32) -> Self {
        Self {
            port,
            running: AtomicBool::new(false),
        }
    }

    pub fn port(&self) -> u32 {
        self.port
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Logger for TracingLogger {
    async fn start(&self) -> anyhow::Result<()> {
        self.running.store(true, Ordering::SeqCst);
        tracing::debug!(port = self.port, "logger started");
        Ok(())
    }

    fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            tracing::debug!(port = self.port, "logger stopped");
        }
    }

    fn create_tab(&self, label: &str) -> Arc<dyn LogTab> {
        Arc::new(TracingTab {
            label: label.to_string(),
        })
    }

    fn url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}

struct TracingTab {
    label: String,
}

impl LogTab for TracingTab {
    fn log(&self, text: &str) {
        for line in text.lines().filter(|line| !line.trim().is_empty()) {
            tracing::info!(target: "forge_rspack::output", tab = %self.label, "{line}");
        }
    }
}
