//! In-memory collaborators driving the plugin without a real bundler.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use forge_rspack::{
    BundlerConfig, CompileEvent, CompileStats, Compiler, CompilerHandle, DevServer, LogTab, Logger,
    LoggerFactory, MultiCompiler, MultiStats, NativeRebuilder, PluginConfig, RebuildRequest,
    RspackPlugin, ServerHandle, WatchEvent, WatchSession, Watching,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::mpsc::{self, UnboundedSender};

type ErrorPolicy = Box<dyn Fn(&BundlerConfig) -> Vec<String> + Send + Sync>;

/// Compiler returning canned statistics.
///
/// Every configuration builds cleanly unless the error policy reports errors
/// for it. `multi` reports one first build per configuration right away.
pub struct FakeCompiler {
    errors: ErrorPolicy,
    fatal: Option<String>,
    pub runs: Mutex<Vec<Vec<BundlerConfig>>>,
    pub watched: Mutex<Vec<BundlerConfig>>,
    pub multi_configs: Mutex<Vec<BundlerConfig>>,
    pub watchers_closed: Arc<AtomicUsize>,
    watch_events: Mutex<Option<UnboundedSender<WatchEvent>>>,
    multi_events: Mutex<Option<UnboundedSender<CompileEvent>>>,
}

impl FakeCompiler {
    pub fn new() -> Self {
        Self::with_errors(|_| Vec::new())
    }

    pub fn with_errors(policy: impl Fn(&BundlerConfig) -> Vec<String> + Send + Sync + 'static) -> Self {
        Self {
            errors: Box::new(policy),
            fatal: None,
            runs: Mutex::new(Vec::new()),
            watched: Mutex::new(Vec::new()),
            multi_configs: Mutex::new(Vec::new()),
            watchers_closed: Arc::new(AtomicUsize::new(0)),
            watch_events: Mutex::new(None),
            multi_events: Mutex::new(None),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fatal: Some(message.to_string()),
            ..Self::new()
        }
    }

    pub fn stats_for(&self, config: &BundlerConfig) -> CompileStats {
        let name = config
            .entry_names()
            .first()
            .map(|name| name.to_string())
            .unwrap_or_else(|| "main".to_string());
        let errors = (self.errors)(config);
        CompileStats {
            report: if errors.is_empty() {
                format!("{name} compiled successfully")
            } else {
                format!("{name}: {}", errors.join(", "))
            },
            json: json!({ "name": name, "errors": errors }),
            name: Some(name),
            errors,
            warnings: Vec::new(),
        }
    }

    /// Push a rebuild result into the active watcher
    pub fn rebuild_main(&self, event: WatchEvent) {
        if let Some(tx) = self.watch_events.lock().as_ref() {
            let _ = tx.send(event);
        }
    }

    pub fn emit(&self, event: CompileEvent) {
        if let Some(tx) = self.multi_events.lock().as_ref() {
            let _ = tx.send(event);
        }
    }
}

#[async_trait]
impl Compiler for FakeCompiler {
    async fn run(&self, configs: Vec<BundlerConfig>) -> anyhow::Result<MultiStats> {
        self.runs.lock().push(configs.clone());
        if let Some(message) = &self.fatal {
            anyhow::bail!("{message}");
        }
        Ok(MultiStats {
            stats: configs.iter().map(|config| self.stats_for(config)).collect(),
        })
    }

    fn watch(&self, config: BundlerConfig) -> anyhow::Result<WatchSession> {
        let (tx, rx) = mpsc::unbounded_channel();
        let first = match &self.fatal {
            Some(message) => WatchEvent::Failed(anyhow::anyhow!("{message}")),
            None => WatchEvent::Built(self.stats_for(&config)),
        };
        let _ = tx.send(first);
        self.watched.lock().push(config);
        *self.watch_events.lock() = Some(tx);

        Ok(WatchSession {
            watching: Box::new(FakeWatching(self.watchers_closed.clone())),
            events: rx,
        })
    }

    fn multi(&self, configs: Vec<BundlerConfig>) -> anyhow::Result<MultiCompiler> {
        let (tx, rx) = mpsc::unbounded_channel();
        for (index, config) in configs.iter().enumerate() {
            let _ = tx.send(CompileEvent::Done {
                index,
                stats: self.stats_for(config),
            });
        }
        let handle: CompilerHandle = Arc::new(configs.len());
        *self.multi_configs.lock() = configs;
        *self.multi_events.lock() = Some(tx);
        Ok(MultiCompiler { handle, events: rx })
    }
}

struct FakeWatching(Arc<AtomicUsize>);

impl Watching for FakeWatching {
    fn close(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct FakeDevServer {
    pub options: Mutex<Option<Value>>,
    /// Configuration count of the compiler the server was started with
    pub served_configs: Mutex<Option<usize>>,
    pub closed: Arc<AtomicUsize>,
}

#[async_trait]
impl DevServer for FakeDevServer {
    async fn start(
        &self,
        compiler: CompilerHandle,
        options: Value,
    ) -> anyhow::Result<Box<dyn ServerHandle>> {
        *self.served_configs.lock() = compiler.downcast_ref::<usize>().copied();
        *self.options.lock() = Some(options);
        Ok(Box::new(FakeServer(self.closed.clone())))
    }
}

struct FakeServer(Arc<AtomicUsize>);

impl ServerHandle for FakeServer {
    fn close(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct FakeTab {
    pub lines: Mutex<Vec<String>>,
}

impl LogTab for FakeTab {
    fn log(&self, text: &str) {
        self.lines.lock().push(text.to_string());
    }
}

pub struct FakeLogger {
    pub port: u32,
    pub started: AtomicBool,
    pub stopped: AtomicUsize,
    pub tabs: Mutex<Vec<(String, Arc<FakeTab>)>>,
}

impl FakeLogger {
    pub fn tab(&self, label: &str) -> Option<Arc<FakeTab>> {
        self.tabs
            .lock()
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, tab)| tab.clone())
    }

    pub fn labels(&self) -> Vec<String> {
        self.tabs.lock().iter().map(|(name, _)| name.clone()).collect()
    }
}

#[async_trait]
impl Logger for FakeLogger {
    async fn start(&self) -> anyhow::Result<()> {
        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) {
        self.stopped.fetch_add(1, Ordering::SeqCst);
    }

    fn create_tab(&self, label: &str) -> Arc<dyn LogTab> {
        let tab = Arc::new(FakeTab::default());
        self.tabs.lock().push((label.to_string(), tab.clone()));
        tab
    }

    fn url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}

/// Factory handing out loggers while keeping them reachable from the test
#[derive(Clone, Default)]
pub struct LoggerSlot(Arc<Mutex<Option<Arc<FakeLogger>>>>);

impl LoggerSlot {
    pub fn factory(&self) -> LoggerFactory {
        let slot = self.0.clone();
        Arc::new(move |port| {
            let logger = Arc::new(FakeLogger {
                port,
                started: AtomicBool::new(false),
                stopped: AtomicUsize::new(0),
                tabs: Mutex::new(Vec::new()),
            });
            *slot.lock() = Some(logger.clone());
            logger as Arc<dyn Logger>
        })
    }

    pub fn get(&self) -> Arc<FakeLogger> {
        self.0.lock().clone().expect("logger was created")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRebuild {
    pub electron_version: String,
    pub platform: String,
    pub arch: String,
    pub rebuild_config: Value,
}

#[derive(Default)]
pub struct FakeRebuilder {
    pub requests: Mutex<Vec<RecordedRebuild>>,
}

#[async_trait]
impl NativeRebuilder for FakeRebuilder {
    async fn rebuild(&self, request: RebuildRequest<'_>) -> anyhow::Result<()> {
        self.requests.lock().push(RecordedRebuild {
            electron_version: request.electron_version.to_string(),
            platform: request.platform.to_string(),
            arch: request.arch.to_string(),
            rebuild_config: request.rebuild_config.clone(),
        });
        Ok(())
    }
}

/// `package.json` of a typical project using the plugin
pub fn write_manifest(dir: &Path, main: &str) {
    let manifest = json!({
        "name": "app",
        "main": main,
        "devDependencies": { "electron": "^28.1.0" },
        "config": { "forge": { "plugins": [] }, "theme": "dark" }
    });
    std::fs::write(
        dir.join("package.json"),
        serde_json::to_string_pretty(&manifest).unwrap(),
    )
    .unwrap();
}

pub fn plugin_config(value: Value) -> PluginConfig {
    PluginConfig::from_value(value).unwrap()
}

/// One local window with a preload, one sandboxed window without
pub fn app_config() -> PluginConfig {
    plugin_config(json!({
        "mainConfig": { "entry": "./src/main.js" },
        "jsonStats": true,
        "renderer": {
            "config": {},
            "jsonStats": true,
            "entryPoints": [
                {
                    "name": "main_window",
                    "html": "./src/index.html",
                    "js": "./src/renderer.js",
                    "preload": { "js": "./src/preload.js" }
                },
                {
                    "name": "about",
                    "html": "./src/about.html",
                    "js": "./src/about.js",
                    "nodeIntegration": true
                }
            ]
        }
    }))
}

pub struct Harness {
    pub plugin: Arc<RspackPlugin>,
    pub compiler: Arc<FakeCompiler>,
    pub dev_server: Arc<FakeDevServer>,
    pub loggers: LoggerSlot,
    pub rebuilder: Arc<FakeRebuilder>,
}

pub fn harness(config: PluginConfig, project_dir: &Path, compiler: FakeCompiler) -> Harness {
    let compiler = Arc::new(compiler);
    let dev_server = Arc::new(FakeDevServer::default());
    let loggers = LoggerSlot::default();
    let rebuilder = Arc::new(FakeRebuilder::default());

    let plugin = RspackPlugin::new(config, project_dir, compiler.clone(), dev_server.clone())
        .unwrap()
        .with_logger_factory(loggers.factory())
        .with_native_rebuilder(rebuilder.clone());

    Harness {
        plugin: Arc::new(plugin),
        compiler,
        dev_server,
        loggers,
        rebuilder,
    }
}
