use forge_rspack_config::{
    BundlerConfig, ConfigSource, Devtool, Entry, EntryPoint, NodeOptions, OutputOptions, Plugin,
};
use serde_json::Value;

use super::ConfigGenerator;
use crate::classify::{classify, RendererTarget};
use crate::error::Result;

/// Modules a sandboxed preload receives from Electron instead of the bundle
pub const SANDBOXED_PRELOAD_EXTERNALS: [&str; 6] = [
    "electron",
    "electron/renderer",
    "electron/common",
    "events",
    "timers",
    "url",
];

const WINDOW_FILENAME: &str = "[name]/index.js";
const PRELOAD_FILENAME: &str = "[name]/preload.js";

impl ConfigGenerator {
    /// Configurations for every renderer bucket, in bucket order.
    ///
    /// Empty buckets produce nothing.
    pub async fn renderer_configs(&self) -> Result<Vec<BundlerConfig>> {
        Ok(self
            .targeted_renderer_configs()
            .await?
            .into_iter()
            .map(|(_, config)| config)
            .collect())
    }

    /// Same as [`renderer_configs`](Self::renderer_configs), paired with the
    /// bucket each configuration was generated for.
    pub async fn targeted_renderer_configs(&self) -> Result<Vec<(RendererTarget, BundlerConfig)>> {
        let renderer = &self.plugin_config().renderer;
        let buckets = classify(&renderer.entry_points, renderer.node_integration);

        let mut configs = Vec::new();
        for (target, entries) in buckets.iter() {
            if target.is_preload() {
                for config in self.preload_configs(target, entries).await? {
                    configs.push((target, config));
                }
            } else if let Some(config) = self.window_config(target, entries).await? {
                configs.push((target, config));
            }
        }

        tracing::debug!(count = configs.len(), mode = %self.mode(), "generated renderer configs");
        Ok(configs)
    }

    /// Settings every renderer bucket starts from
    pub fn renderer_base_config(&self, target: RendererTarget) -> BundlerConfig {
        BundlerConfig {
            target: Some(target.target().into()),
            devtool: Some(Devtool::named(self.renderer_devtool())),
            mode: Some(self.mode()),
            output: Some(self.renderer_output(WINDOW_FILENAME)),
            node: Some(NodeOptions::preserve_globals().into()),
            ..Default::default()
        }
    }

    fn renderer_output(&self, filename: &str) -> OutputOptions {
        OutputOptions {
            path: Some(self.rspack_dir().join("renderer")),
            filename: Some(filename.to_string()),
            global_object: Some("self".to_string()),
            public_path: (!self.is_prod()).then(|| "/".to_string()),
            ..Default::default()
        }
    }

    /// One configuration holding every window (or headless body) of a
    /// `Web` / `ElectronRenderer` bucket.
    pub async fn window_config(
        &self,
        target: RendererTarget,
        entries: &[&EntryPoint],
    ) -> Result<Option<BundlerConfig>> {
        if entries.is_empty() {
            return Ok(None);
        }

        let user = self.resolve_config(&self.plugin_config().renderer.config).await?;

        let mut bundles = Vec::with_capacity(entries.len());
        let mut plugins = Vec::new();
        for entry in entries {
            let mut sources = entry.prefixed_entries.clone();
            sources.extend(entry.js().map(str::to_string));
            bundles.push((entry.name.clone(), sources));

            if let Some(html) = entry.html() {
                plugins.push(Plugin::html(&entry.name, html, &entry.additional_chunks));
            }
        }

        let specific = BundlerConfig {
            entry: Some(Entry::named(bundles)),
            output: Some(self.renderer_output(WINDOW_FILENAME)),
            plugins,
            ..Default::default()
        };

        let config = self.renderer_base_config(target).merge(user)?.merge(specific)?;
        Ok(Some(config))
    }

    /// Configurations for a preload bucket.
    ///
    /// Entries without a preload-specific config share one configuration.
    /// Every entry with its own config is built separately so one entry's
    /// override never leaks into another's build.
    pub async fn preload_configs(
        &self,
        target: RendererTarget,
        entries: &[&EntryPoint],
    ) -> Result<Vec<BundlerConfig>> {
        let (overridden, shared): (Vec<&EntryPoint>, Vec<&EntryPoint>) = entries
            .iter()
            .copied()
            .partition(|entry| entry.preload().is_some_and(|p| p.config.is_some()));

        let mut configs = Vec::with_capacity(overridden.len() + 1);
        if !shared.is_empty() {
            configs.push(
                self.preload_config(target, &shared, &self.plugin_config().renderer.config)
                    .await?,
            );
        }
        for entry in overridden {
            if let Some(source) = entry.preload().and_then(|p| p.config.as_ref()) {
                configs.push(self.preload_config(target, &[entry], source).await?);
            }
        }
        Ok(configs)
    }

    async fn preload_config(
        &self,
        target: RendererTarget,
        entries: &[&EntryPoint],
        source: &ConfigSource,
    ) -> Result<BundlerConfig> {
        let user = self.resolve_config(source).await?;

        let bundles = entries
            .iter()
            .filter_map(|entry| {
                let preload = entry.preload()?;
                let mut sources = entry.prefixed_entries.clone();
                sources.extend(preload.prefixed_entries.iter().cloned());
                sources.push(preload.js.clone());
                Some((entry.name.clone(), sources))
            })
            .collect::<Vec<_>>();

        let sandboxed = target == RendererTarget::SandboxedPreload;
        let specific = BundlerConfig {
            target: Some(target.target().into()),
            entry: Some(Entry::named(bundles)),
            output: Some(self.renderer_output(PRELOAD_FILENAME)),
            externals: if sandboxed {
                SANDBOXED_PRELOAD_EXTERNALS.iter().map(|s| Value::from(*s)).collect()
            } else {
                Vec::new()
            },
            externals_type: sandboxed.then(|| "commonjs2".to_string()),
            ..Default::default()
        };

        Ok(self.renderer_base_config(target).merge(user)?.merge(specific)?)
    }
}
