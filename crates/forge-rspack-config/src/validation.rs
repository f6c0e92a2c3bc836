//! Pluggable config validation strategies
//!
//! Separates filesystem validation (for CLI use) from schema validation (for library use).

use std::path::{Path, PathBuf};

use crate::config::PluginConfig;
use crate::error::{ConfigError, Result};
use crate::source::ConfigSource;

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    fn validate(&self, config: &PluginConfig) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// Checks ports, entry point name uniqueness and, when the main process
/// config is given inline, that it declares an `entry`.
///
/// # Example
///
/// ```
/// use forge_rspack_config::{ConfigValidator, PluginConfig, SchemaValidator};
/// use serde_json::json;
///
/// let config = PluginConfig::from_value(json!({
///     "mainConfig": { "entry": "./src/main.js" }
/// }))
/// .unwrap();
/// SchemaValidator.validate(&config).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &PluginConfig) -> Result<()> {
        config.validate()?;

        if let ConfigSource::Inline(main) = &config.main_config {
            if main.entry.is_none() {
                return Err(ConfigError::missing_main_entry());
            }
        }

        Ok(())
    }
}

/// Filesystem validator (for CLI use)
///
/// Runs [`SchemaValidator`], then checks that every file an entry point
/// references exists under the project root, along with path-referenced
/// bundler configs.
///
/// # Example
///
/// ```no_run
/// use forge_rspack_config::{discover, ConfigValidator, FsValidator};
///
/// let config = discover().unwrap();
/// FsValidator::new(".").validate(&config).unwrap();
/// ```
pub struct FsValidator {
    root: PathBuf,
}

impl FsValidator {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn require(&self, owner: &str, file: &Path) -> Result<()> {
        let path = self.root.join(file);
        if path.exists() {
            Ok(())
        } else {
            Err(ConfigError::EntryFileNotFound {
                name: owner.to_string(),
                path,
            })
        }
    }

    fn require_source(&self, owner: &str, source: &ConfigSource) -> Result<()> {
        match source {
            ConfigSource::Path(path) => self.require(owner, path),
            _ => Ok(()),
        }
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, config: &PluginConfig) -> Result<()> {
        SchemaValidator.validate(config)?;

        self.require_source("mainConfig", &config.main_config)?;
        self.require_source("renderer.config", &config.renderer.config)?;

        for entry in config.entry_points() {
            let files = entry
                .html()
                .into_iter()
                .chain(entry.js())
                .chain(entry.preload().map(|preload| preload.js.as_str()));
            for file in files {
                self.require(&entry.name, Path::new(file))?;
            }
            if let Some(source) = entry.preload().and_then(|preload| preload.config.as_ref()) {
                self.require_source(&entry.name, source)?;
            }
        }

        Ok(())
    }
}

/// Convenience function for schema-only validation
pub fn validate_schema(config: &PluginConfig) -> Result<()> {
    SchemaValidator.validate(config)
}

/// Convenience function for filesystem validation
pub fn validate_fs(config: &PluginConfig, root: impl AsRef<Path>) -> Result<()> {
    FsValidator::new(root).validate(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn schema_validator_requires_inline_main_entry() {
        let config = PluginConfig::from_value(json!({ "mainConfig": {} })).unwrap();
        let err = SchemaValidator.validate(&config).unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingField { ref field, .. } if field == "mainConfig.entry")
        );
    }

    #[test]
    fn schema_validator_defers_path_configs() {
        let config =
            PluginConfig::from_value(json!({ "mainConfig": "./rspack.main.config.json" })).unwrap();
        assert!(validate_schema(&config).is_ok());
    }

    #[test]
    fn fs_validator_reports_missing_preload() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/index.html"), "<html></html>").unwrap();
        fs::write(dir.path().join("src/renderer.js"), "").unwrap();

        let config = PluginConfig::from_value(json!({
            "mainConfig": { "entry": "./src/main.js" },
            "renderer": {
                "entryPoints": [{
                    "name": "main_window",
                    "html": "./src/index.html",
                    "js": "./src/renderer.js",
                    "preload": { "js": "./src/preload.js" }
                }]
            }
        }))
        .unwrap();

        let err = validate_fs(&config, dir.path()).unwrap_err();
        match err {
            ConfigError::EntryFileNotFound { name, path } => {
                assert_eq!(name, "main_window");
                assert!(path.ends_with("src/preload.js"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn fs_validator_accepts_complete_project() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("worker.js"), "").unwrap();
        let config = PluginConfig::from_value(json!({
            "mainConfig": { "entry": "./main.js" },
            "renderer": { "entryPoints": [{ "name": "worker", "js": "./worker.js" }] }
        }))
        .unwrap();
        assert!(validate_fs(&config, dir.path()).is_ok());
    }
}
