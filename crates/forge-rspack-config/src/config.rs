//! Top-level plugin configuration.
//!
//! This module provides [`PluginConfig`], the options a project hands to the
//! plugin, and the renderer section nested inside it. For file discovery, see
//! the `discovery` module.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::dev::{
    validate_port, DEFAULT_CONTENT_SECURITY_POLICY, DEFAULT_LOGGER_PORT, DEFAULT_PORT,
};
use crate::entry_point::EntryPoint;
use crate::error::{ConfigError, Result as ConfigResult};
use crate::source::ConfigSource;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
    /// Bundler configuration for the main process
    #[serde(default)]
    pub main_config: ConfigSource,

    /// Write `stats-main.json` after the main build
    #[serde(default)]
    pub json_stats: bool,

    #[serde(default)]
    pub renderer: RendererConfig,

    /// Renderer dev server port
    #[serde(default)]
    pub port: Option<u32>,

    /// Log viewer port
    #[serde(default)]
    pub logger_port: Option<u32>,

    /// Ship `*.js.map` files in the packaged application
    #[serde(default)]
    pub package_source_maps: bool,

    /// Ship `stats-*.json` files in the packaged application
    #[serde(default)]
    pub package_json_stats: bool,

    /// Content-Security-Policy header used by the dev server
    #[serde(default)]
    pub dev_content_security_policy: Option<String>,

    /// Dev server options layered between the built-in defaults and the
    /// options the plugin always controls (`port`, `static`, CSP header)
    #[serde(default)]
    pub dev_server: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererConfig {
    /// Bundler configuration shared by every renderer bundle
    #[serde(default)]
    pub config: ConfigSource,

    /// Write `stats-<entry>.json` after the renderer build
    #[serde(default)]
    pub json_stats: bool,

    /// Default `nodeIntegration` for entry points that leave it unset
    #[serde(default)]
    pub node_integration: Option<bool>,

    #[serde(default)]
    pub entry_points: Vec<EntryPoint>,
}

impl PluginConfig {
    /// Create from serde_json::Value
    ///
    /// # Example
    ///
    /// ```
    /// use forge_rspack_config::PluginConfig;
    /// use serde_json::json;
    ///
    /// let config = PluginConfig::from_value(json!({
    ///     "mainConfig": { "entry": "./src/main.js" },
    ///     "renderer": {
    ///         "config": {},
    ///         "entryPoints": [
    ///             { "name": "main_window", "html": "./src/index.html", "js": "./src/renderer.js" }
    ///         ]
    ///     }
    /// }))
    /// .unwrap();
    /// assert_eq!(config.port(), 3000);
    /// assert_eq!(config.renderer.entry_points.len(), 1);
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        let config = Self::parse(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Deserialize without validating.
    ///
    /// Bundler config sources are parsed first so that a bad option is
    /// reported with its full path, e.g. `renderer.config.devtool`.
    pub(crate) fn parse(value: Value) -> ConfigResult<Self> {
        check_config_sources(&value)?;
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            message: e.to_string(),
        })
    }

    pub fn port(&self) -> u32 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn logger_port(&self) -> u32 {
        self.logger_port.unwrap_or(DEFAULT_LOGGER_PORT)
    }

    pub fn content_security_policy(&self) -> &str {
        self.dev_content_security_policy
            .as_deref()
            .unwrap_or(DEFAULT_CONTENT_SECURITY_POLICY)
    }

    /// Checks that need no file system access: both ports and entry point
    /// name uniqueness.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_port("port", self.port())?;
        validate_port("loggerPort", self.logger_port())?;
        self.renderer.validate()
    }

    pub fn entry_points(&self) -> &[EntryPoint] {
        &self.renderer.entry_points
    }
}

fn check_config_sources(value: &Value) -> ConfigResult<()> {
    let mut sources = vec![
        ("mainConfig".to_string(), value.get("mainConfig")),
        ("renderer.config".to_string(), value.pointer("/renderer/config")),
    ];
    let entry_points = value.pointer("/renderer/entryPoints").and_then(Value::as_array);
    for (index, entry) in entry_points.into_iter().flatten().enumerate() {
        sources.push((
            format!("renderer.entryPoints[{index}].preload.config"),
            entry.pointer("/preload/config"),
        ));
    }

    for (field, source) in sources {
        if let Some(source) = source.filter(|source| !source.is_null()) {
            ConfigSource::from_value_at(source.clone(), &field)?;
        }
    }
    Ok(())
}

impl RendererConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        let mut seen = HashSet::new();
        for entry in &self.entry_points {
            if !seen.insert(entry.name.as_str()) {
                return Err(ConfigError::DuplicateEntryPoint(entry.name.clone()));
            }
        }
        Ok(())
    }
}
