#![cfg_attr(docsrs, feature(doc_cfg))]

//! # forge-rspack
//!
//! Electron Forge rspack plugin: turns a declarative list of Electron entry
//! points into bundler configurations and drives their compilation.
//!
//! The bundler, dev server, log viewer and native module rebuilder are
//! external collaborators behind the [`Compiler`], [`DevServer`], [`Logger`]
//! and [`NativeRebuilder`] traits.
//!
//! ## Quick Start
//!
//! ### Inspect the generated configurations
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use forge_rspack::{ConfigGenerator, Mode, PluginConfig};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PluginConfig::from_value(json!({
//!     "mainConfig": { "entry": "./src/main.js" },
//!     "renderer": {
//!         "config": {},
//!         "entryPoints": [
//!             { "name": "main_window", "html": "./src/index.html", "js": "./src/renderer.js" }
//!         ]
//!     }
//! }))?;
//!
//! let generator = ConfigGenerator::new(Arc::new(config), "/path/to/app", Mode::Production, 3000);
//! println!("{}", serde_json::to_string_pretty(&generator.main_config().await?)?);
//! for renderer in generator.renderer_configs().await? {
//!     println!("{}", serde_json::to_string_pretty(&renderer)?);
//! }
//! # Ok(()) }
//! ```
//!
//! ### Package a build
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use forge_rspack::{Compiler, DevServer, ForgeConfig, PluginConfig, RspackPlugin};
//! # async fn package(
//! #     config: PluginConfig,
//! #     compiler: Arc<dyn Compiler>,
//! #     dev_server: Arc<dyn DevServer>,
//! # ) -> forge_rspack::Result<()> {
//! let plugin = Arc::new(RspackPlugin::new(config, "/path/to/app", compiler, dev_server)?);
//! plugin.init();
//!
//! let forge = plugin.resolve_forge_config(ForgeConfig::default());
//! plugin.pre_package(&forge, "linux", "x64").await?;
//! # Ok(()) }
//! ```

pub mod classify;
pub mod compiler;
pub mod defines;
pub mod dev_server;
pub mod error;
pub mod generator;
pub mod logger;
pub mod packaging;
pub mod plugin;
pub mod rebuild;

pub use forge_rspack_config::{
    BundlerConfig, ConfigError, ConfigSource, Devtool, EntryPoint, EntryPointKind, Expression,
    Mode, PluginConfig, PreloadEntryPoint, RendererConfig, Target, TargetSetting,
};

pub use classify::{classify, Buckets, RendererTarget};
pub use compiler::{
    CompileEvent, CompileStats, Compiler, CompilerHandle, MultiCompiler, MultiStats, WatchEvent,
    WatchSession, Watching,
};
pub use defines::{body_constant, constant_prefix, preload_constant, ConstantInjector};
pub use dev_server::{dev_server_options, DevServer, ServerHandle};
pub use error::{CompileError, PluginError, ProcessKind, Result};
pub use generator::{default_preprocessor, ConfigGenerator, Preprocessor, SANDBOXED_PRELOAD_EXTERNALS};
pub use logger::{tracing_logger_factory, LogTab, Logger, LoggerFactory, TracingLogger};
pub use packaging::{check_manifest_main, ForgeConfig, IgnoreFilter, IgnoreRule, PackagerConfig};
pub use plugin::{ChildExit, ExitOptions, HookName, RspackPlugin, StartOutcome, StartTask};
pub use rebuild::{electron_version, NativeRebuilder, RebuildRequest, SkipRebuild};
