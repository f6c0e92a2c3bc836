//! The plugin object the host build tool drives.
//!
//! [`RspackPlugin`] owns the validated configuration and the external
//! collaborators, and tracks every live resource (watchers, dev servers,
//! loggers, background tasks) so that a single [`teardown`](RspackPlugin::teardown)
//! releases all of them.

mod compile;
mod dev;
mod hooks;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use forge_rspack_config::{ConfigLoader, FileConfigLoader, Mode, PluginConfig};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::compiler::{Compiler, Watching};
use crate::dev_server::{DevServer, ServerHandle};
use crate::error::{PluginError, Result};
use crate::generator::{default_preprocessor, ConfigGenerator, Preprocessor};
use crate::logger::{tracing_logger_factory, Logger, LoggerFactory};
use crate::rebuild::{NativeRebuilder, SkipRebuild};

pub use hooks::{ChildExit, HookName, StartOutcome, StartTask};

/// What [`RspackPlugin::exit_handler`] should do
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExitOptions {
    /// Release watchers, servers and loggers
    pub cleanup: bool,
    /// Terminate the process afterwards
    pub exit: bool,
}

#[derive(Default)]
struct Resources {
    watchers: Vec<Box<dyn Watching>>,
    servers: Vec<Box<dyn ServerHandle>>,
    loggers: Vec<Arc<dyn Logger>>,
    tasks: Vec<JoinHandle<()>>,
}

impl Resources {
    fn is_empty(&self) -> bool {
        self.watchers.is_empty()
            && self.servers.is_empty()
            && self.loggers.is_empty()
            && self.tasks.is_empty()
    }
}

pub struct RspackPlugin {
    config: Arc<PluginConfig>,
    project_dir: PathBuf,
    base_dir: PathBuf,
    port: u32,
    logger_port: u32,
    is_prod: AtomicBool,
    already_started: AtomicBool,
    compiler: Arc<dyn Compiler>,
    dev_server: Arc<dyn DevServer>,
    logger_factory: LoggerFactory,
    config_loader: Arc<dyn ConfigLoader>,
    preprocessor: Preprocessor,
    rebuilder: Arc<dyn NativeRebuilder>,
    resources: Mutex<Resources>,
}

impl RspackPlugin {
    /// Create a plugin for the project at `project_dir`.
    ///
    /// Fails before anything is started when a port is out of range or an
    /// entry point name is used twice.
    pub fn new(
        config: PluginConfig,
        project_dir: impl Into<PathBuf>,
        compiler: Arc<dyn Compiler>,
        dev_server: Arc<dyn DevServer>,
    ) -> Result<Self> {
        config.validate()?;

        let project_dir = project_dir.into();
        Ok(Self {
            port: config.port(),
            logger_port: config.logger_port(),
            config: Arc::new(config),
            base_dir: project_dir.join(".rspack"),
            project_dir,
            is_prod: AtomicBool::new(false),
            already_started: AtomicBool::new(false),
            compiler,
            dev_server,
            logger_factory: tracing_logger_factory(),
            config_loader: Arc::new(FileConfigLoader),
            preprocessor: default_preprocessor(),
            rebuilder: Arc::new(SkipRebuild),
            resources: Mutex::new(Resources::default()),
        })
    }

    pub fn with_logger_factory(mut self, factory: LoggerFactory) -> Self {
        self.logger_factory = factory;
        self
    }

    pub fn with_config_loader(mut self, loader: Arc<dyn ConfigLoader>) -> Self {
        self.config_loader = loader;
        self
    }

    pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn with_native_rebuilder(mut self, rebuilder: Arc<dyn NativeRebuilder>) -> Self {
        self.rebuilder = rebuilder;
        self
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// `<project>/.rspack`, where every bundle is written
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn port(&self) -> u32 {
        self.port
    }

    pub fn logger_port(&self) -> u32 {
        self.logger_port
    }

    pub fn is_prod(&self) -> bool {
        self.is_prod.load(Ordering::SeqCst)
    }

    pub fn set_prod(&self, is_prod: bool) {
        self.is_prod.store(is_prod, Ordering::SeqCst);
    }

    pub fn mode(&self) -> Mode {
        Mode::from_production(self.is_prod())
    }

    /// Generator for the current mode
    pub fn config_generator(&self) -> ConfigGenerator {
        ConfigGenerator::new(self.config.clone(), &self.project_dir, self.mode(), self.port)
            .with_loader(self.config_loader.clone())
            .with_preprocessor(self.preprocessor.clone())
    }

    /// Hook process interruption: on Ctrl-C every resource is released and
    /// the process exits.
    ///
    /// Outside a Tokio runtime nothing is hooked; dropping the plugin still
    /// releases its resources.
    pub fn init(self: &Arc<Self>) {
        let Ok(runtime) = Handle::try_current() else {
            tracing::debug!("no async runtime, process events not hooked");
            return;
        };

        tracing::debug!("hooking process events");
        let plugin = Arc::downgrade(self);
        let task = runtime.spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                if let Some(plugin) = plugin.upgrade() {
                    plugin.exit_handler(
                        ExitOptions {
                            cleanup: true,
                            exit: true,
                        },
                        None,
                    );
                }
            }
        });
        self.resources.lock().tasks.push(task);
    }

    pub fn exit_handler(&self, options: ExitOptions, err: Option<&PluginError>) {
        tracing::debug!(?options, "handling process exit");
        if options.cleanup {
            self.teardown();
        }
        if let Some(err) = err {
            tracing::error!("{err}");
        }
        if options.exit {
            std::process::exit(i32::from(err.is_some()));
        }
    }

    /// Close every watcher, dev server and logger. Safe to call repeatedly.
    pub fn teardown(&self) {
        let resources = std::mem::take(&mut *self.resources.lock());
        if resources.is_empty() {
            return;
        }

        for task in resources.tasks {
            task.abort();
        }
        for watcher in resources.watchers {
            tracing::debug!("cleaning rspack watcher");
            watcher.close();
        }
        for server in resources.servers {
            tracing::debug!("cleaning http server");
            server.close();
        }
        for logger in resources.loggers {
            tracing::debug!("stopping logger");
            logger.stop();
        }
    }

    fn track_watcher(&self, watcher: Box<dyn Watching>) {
        self.resources.lock().watchers.push(watcher);
    }

    fn track_server(&self, server: Box<dyn ServerHandle>) {
        self.resources.lock().servers.push(server);
    }

    fn track_logger(&self, logger: Arc<dyn Logger>) {
        self.resources.lock().loggers.push(logger);
    }

    fn track_task(&self, task: JoinHandle<()>) {
        self.resources.lock().tasks.push(task);
    }
}

impl Drop for RspackPlugin {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for RspackPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RspackPlugin")
            .field("project_dir", &self.project_dir)
            .field("port", &self.port)
            .field("logger_port", &self.logger_port)
            .field("mode", &self.mode())
            .finish_non_exhaustive()
    }
}
