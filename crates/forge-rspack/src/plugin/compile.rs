use std::path::{Path, PathBuf};
use std::sync::Arc;

use forge_rspack_config::BundlerConfig;
use serde_json::Value;

use super::RspackPlugin;
use crate::compiler::{CompileStats, WatchEvent, WatchSession};
use crate::error::{CompileError, ProcessKind, Result};
use crate::logger::{LogTab, Logger};

impl RspackPlugin {
    /// Build the main process bundle.
    ///
    /// With `watch` the compiler keeps rebuilding on change and this returns
    /// after the first build; later results go to the "Main Process" tab.
    /// Only a fatal compiler failure of that first build is an error in watch
    /// mode. A one-shot build also fails when its statistics report errors.
    pub async fn compile_main(&self, watch: bool, logger: Option<&Arc<dyn Logger>>) -> Result<()> {
        let tab = logger.map(|logger| logger.create_tab("Main Process"));

        let config = self.config_generator().main_config().await?;
        let stats_file = self
            .config
            .json_stats
            .then(|| self.base_dir.join("main").join("stats-main.json"));

        if watch {
            let WatchSession {
                watching,
                mut events,
            } = self.compiler.watch(config).map_err(|source| CompileError::Fatal {
                process: ProcessKind::Main,
                source,
            })?;
            self.track_watcher(watching);

            match events.recv().await {
                Some(WatchEvent::Built(stats)) => {
                    report_main(tab.as_deref(), stats_file.as_deref(), &stats).await?;
                }
                Some(WatchEvent::Failed(source)) => {
                    return Err(CompileError::Fatal {
                        process: ProcessKind::Main,
                        source,
                    }
                    .into());
                }
                None => return Err(CompileError::Closed(ProcessKind::Main).into()),
            }

            let task = tokio::spawn(async move {
                while let Some(event) = events.recv().await {
                    match event {
                        WatchEvent::Built(stats) => {
                            if let Err(err) =
                                report_main(tab.as_deref(), stats_file.as_deref(), &stats).await
                            {
                                tracing::warn!("could not record main process stats: {err}");
                            }
                        }
                        WatchEvent::Failed(err) => {
                            tracing::debug!("main process rebuild failed: {err:#}");
                            if let Some(tab) = &tab {
                                tab.log(&format!("{err:#}"));
                            }
                        }
                    }
                }
            });
            self.track_task(task);
            return Ok(());
        }

        let stats = self
            .compiler
            .run(vec![config])
            .await
            .map_err(|source| CompileError::Fatal {
                process: ProcessKind::Main,
                source,
            })?
            .stats
            .into_iter()
            .next()
            .unwrap_or_default();

        report_main(tab.as_deref(), stats_file.as_deref(), &stats).await?;
        if stats.has_errors() {
            return Err(CompileError::Stats {
                process: ProcessKind::Main,
                report: stats.report,
            }
            .into());
        }
        Ok(())
    }

    /// Build every renderer and preload bundle in one batched compiler run.
    ///
    /// Statistics files are written before errors are checked so a failed
    /// build still leaves them behind.
    pub async fn compile_renderers(&self, watch: bool) -> Result<()> {
        let configs = self.config_generator().renderer_configs().await?;
        if configs.is_empty() {
            tracing::debug!("no renderer entry points, skipping renderer compilation");
            return Ok(());
        }

        let stats_files = configs
            .iter()
            .enumerate()
            .map(|(index, config)| self.renderer_stats_file(index, config))
            .collect::<Vec<_>>();

        let multi = self
            .compiler
            .run(configs)
            .await
            .map_err(|source| CompileError::Fatal {
                process: ProcessKind::Renderer,
                source,
            })?;

        if self.config.renderer.json_stats {
            for (path, stats) in stats_files.iter().zip(&multi.stats) {
                tracing::debug!(path = %path.display(), "Writing JSON stats for renderer config");
                write_stats(path, &stats.json).await?;
            }
        }

        for stats in multi.stats.iter().filter(|stats| stats.has_warnings()) {
            tracing::warn!(
                config = stats.name.as_deref().unwrap_or("renderer"),
                count = stats.warnings.len(),
                "renderer compiled with warnings"
            );
        }

        if !watch && multi.has_errors() {
            return Err(CompileError::Stats {
                process: ProcessKind::Renderer,
                report: multi.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// `.rspack/renderer/stats-<entry>.json`, with a `-preload` suffix for
    /// preload bundles so a window and its preload never share a file.
    fn renderer_stats_file(&self, index: usize, config: &BundlerConfig) -> PathBuf {
        let name = config
            .entry_names()
            .first()
            .map(|name| name.to_string())
            .unwrap_or_else(|| format!("renderer-{index}"));
        let suffix = if config.is_preload_bundle() { "-preload" } else { "" };
        self.base_dir
            .join("renderer")
            .join(format!("stats-{name}{suffix}.json"))
    }
}

async fn report_main(
    tab: Option<&dyn LogTab>,
    stats_file: Option<&Path>,
    stats: &CompileStats,
) -> Result<()> {
    if let Some(tab) = tab {
        tab.log(&stats.report);
    }
    if stats.has_warnings() {
        tracing::warn!(count = stats.warnings.len(), "main process compiled with warnings");
    }
    if let Some(path) = stats_file {
        tracing::debug!("Writing JSON stats for main config");
        write_stats(path, &stats.json).await?;
    }
    Ok(())
}

async fn write_stats(path: &Path, json: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, serde_json::to_string_pretty(json)?).await?;
    Ok(())
}
