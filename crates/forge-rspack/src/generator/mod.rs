//! Bundler configuration synthesis.
//!
//! [`ConfigGenerator`] turns the plugin options into the configurations handed
//! to the compiler: one for the main process (see `main.rs`) and one or more
//! per renderer bucket (see `renderer.rs`). Each is layered as
//! base → user configuration → entry-specific settings with
//! [`BundlerConfig::merge`].

mod main;
mod renderer;

pub use renderer::SANDBOXED_PRELOAD_EXTERNALS;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use forge_rspack_config::{
    BundlerConfig, ConfigFactory, ConfigLoader, ConfigSource, Expression, FactoryArgs,
    FileConfigLoader, Mode, PluginConfig, Result as ConfigResult,
};
use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde_json::json;

use crate::defines::ConstantInjector;
use crate::error::Result;

/// Strategy turning a config factory into a configuration.
///
/// Replace it to call factories with a custom environment.
pub type Preprocessor =
    Arc<dyn Fn(ConfigFactory, Mode) -> BoxFuture<'static, ConfigResult<BundlerConfig>> + Send + Sync>;

/// Calls the factory with an empty environment and `{ mode }`.
pub fn default_preprocessor() -> Preprocessor {
    Arc::new(|factory, mode| {
        Box::pin(async move { factory.call(json!({}), FactoryArgs { mode }).await })
    })
}

pub struct ConfigGenerator {
    config: Arc<PluginConfig>,
    project_dir: PathBuf,
    rspack_dir: PathBuf,
    mode: Mode,
    port: u32,
    loader: Arc<dyn ConfigLoader>,
    preprocess: Preprocessor,
}

impl ConfigGenerator {
    pub fn new(
        config: Arc<PluginConfig>,
        project_dir: impl Into<PathBuf>,
        mode: Mode,
        port: u32,
    ) -> Self {
        let project_dir = project_dir.into();
        Self {
            config,
            rspack_dir: project_dir.join(".rspack"),
            project_dir,
            mode,
            port,
            loader: Arc::new(FileConfigLoader),
            preprocess: default_preprocessor(),
        }
    }

    pub fn with_loader(mut self, loader: Arc<dyn ConfigLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_preprocessor(mut self, preprocess: Preprocessor) -> Self {
        self.preprocess = preprocess;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_prod(&self) -> bool {
        self.mode.is_production()
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// `<project>/.rspack`
    pub fn rspack_dir(&self) -> &Path {
        &self.rspack_dir
    }

    pub fn plugin_config(&self) -> &PluginConfig {
        &self.config
    }

    /// Resolve a user configuration: inline objects are cloned, factories go
    /// through the preprocessor and paths through the loader.
    pub async fn resolve_config(&self, source: &ConfigSource) -> Result<BundlerConfig> {
        let config = match source {
            ConfigSource::Inline(config) => config.as_ref().clone(),
            ConfigSource::Factory(factory) => (self.preprocess)(factory.clone(), self.mode).await?,
            ConfigSource::Path(path) => self.loader.load(&self.project_dir.join(path)).await?,
        };
        Ok(config)
    }

    pub fn constant_injector(&self) -> ConstantInjector {
        ConstantInjector::new(self.mode, self.port, &self.rspack_dir)
    }

    /// Cross-process constants for every configured entry point
    pub fn defines(&self) -> IndexMap<String, Expression> {
        self.constant_injector().defines(self.config.entry_points())
    }

    /// `source-map` in production, `eval-source-map` in development
    fn renderer_devtool(&self) -> &'static str {
        if self.is_prod() {
            "source-map"
        } else {
            "eval-source-map"
        }
    }
}
