//! File-based config discovery for CLI use
//!
//! Handles finding and loading plugin configuration files from a project root.

use std::fs;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format as _, Json, Toml};
use figment::Figment;
use serde::Deserialize;
use serde_json::Value;

use crate::config::PluginConfig;
use crate::error::{ConfigError, Result};

/// Key holding the plugin options inside `package.json`
pub const PACKAGE_JSON_KEY: &str = "forgeRspack";

/// Prefix of environment variables overriding discovered options
pub const ENV_PREFIX: &str = "FORGE_RSPACK_";

const CONFIG_FILES: [&str; 2] = ["forge-rspack.toml", "forge-rspack.json"];

/// File-based configuration discovery
///
/// Searches a project root for plugin options and loads them. This is
/// primarily for CLI use; library users build a [`PluginConfig`] directly.
///
/// # Example
///
/// ```no_run
/// use forge_rspack_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let config = discovery.load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

/// Options that may be overridden through the environment
#[derive(Debug, Default, Deserialize)]
struct EnvOverrides {
    port: Option<u32>,
    logger_port: Option<u32>,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. `forge-rspack.toml`
    /// 2. `forge-rspack.json`
    /// 3. `package.json` (`forgeRspack` field)
    pub fn find(&self) -> Option<PathBuf> {
        for name in CONFIG_FILES {
            let path = self.root.join(name);
            if path.is_file() {
                return Some(path);
            }
        }

        let pkg_path = self.root.join("package.json");
        let content = fs::read_to_string(&pkg_path).ok()?;
        let parsed: Value = serde_json::from_str(&content).ok()?;
        parsed
            .get(PACKAGE_JSON_KEY)
            .filter(|value| !value.is_null())
            .map(|_| pkg_path)
    }

    /// Load config from the discovered file, then apply environment overrides
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<PluginConfig> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        self.load_from(&path)
    }

    /// Load config from a specific file path
    pub fn load_from(&self, path: &Path) -> Result<PluginConfig> {
        let figment = match path.file_name().and_then(|name| name.to_str()) {
            Some("package.json") => Figment::from(Json::file(path)).focus(PACKAGE_JSON_KEY),
            _ => match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => Figment::from(Toml::file(path)),
                Some("json") => Figment::from(Json::file(path)),
                other => {
                    return Err(ConfigError::UnsupportedFormat(
                        other.unwrap_or_default().to_string(),
                    ));
                }
            },
        };

        if !path.is_file() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        tracing::debug!(path = %path.display(), "loading plugin config");
        let mut config = PluginConfig::parse(figment.extract()?)?;

        // FORGE_RSPACK_PORT, FORGE_RSPACK_LOGGER_PORT
        let overrides: EnvOverrides = Figment::from(Env::prefixed(ENV_PREFIX)).extract()?;
        if overrides.port.is_some() {
            config.port = overrides.port;
        }
        if overrides.logger_port.is_some() {
            config.logger_port = overrides.logger_port;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Discover and load config from current directory (convenience function)
///
/// # Example
///
/// ```no_run
/// use forge_rspack_config::discover;
///
/// let config = discover().unwrap();
/// ```
pub fn discover() -> Result<PluginConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load()
}
