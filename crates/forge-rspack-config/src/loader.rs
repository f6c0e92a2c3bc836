//! Loading bundler configurations referenced by path.

use std::path::Path;

use async_trait::async_trait;
use figment::providers::{Format as _, Json, Toml};
use figment::Figment;

use crate::bundler::BundlerConfig;
use crate::error::{ConfigError, Result};

/// Resolves a [`ConfigSource::Path`](crate::ConfigSource::Path) into a
/// bundler configuration.
///
/// Paths are already joined onto the project root when they reach the loader.
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    async fn load(&self, path: &Path) -> Result<BundlerConfig>;
}

/// Reads `.json` and `.toml` configuration files from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FileConfigLoader;

#[async_trait]
impl ConfigLoader for FileConfigLoader {
    async fn load(&self, path: &Path) -> Result<BundlerConfig> {
        if !path.is_file() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Figment::from(Json::file(path)),
            Some("toml") => Figment::from(Toml::file(path)),
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or_default().to_string(),
                ));
            }
        };

        tracing::debug!(path = %path.display(), "loading bundler config");
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::Target;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn loads_json_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rspack.main.config.json");
        fs::write(&path, r#"{ "entry": "./src/main.js", "target": "electron-main" }"#).unwrap();

        let config = FileConfigLoader.load(&path).await.unwrap();
        assert_eq!(config.known_target(), Some(Target::ElectronMain));
    }

    #[tokio::test]
    async fn loads_toml_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rspack.renderer.toml");
        fs::write(&path, "devtool = \"inline-source-map\"\n").unwrap();

        let config = FileConfigLoader.load(&path).await.unwrap();
        assert_eq!(config.devtool_name(), Some("inline-source-map"));
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.json");
        let err = FileConfigLoader.load(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(p) if p == path));
    }

    #[tokio::test]
    async fn scripts_are_unsupported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rspack.config.js");
        fs::write(&path, "module.exports = {}").unwrap();
        let err = FileConfigLoader.load(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ext) if ext == "js"));
    }
}
