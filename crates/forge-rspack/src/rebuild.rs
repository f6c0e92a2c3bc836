//! Native dependency preparation before packaging.

use std::path::Path;

use async_trait::async_trait;
use semver::Version;
use serde_json::Value;

use crate::error::{PluginError, Result};

const ELECTRON_PACKAGES: [&str; 3] = ["electron", "electron-nightly", "electron-prebuilt-compile"];
const DEPENDENCY_KEYS: [&str; 2] = ["devDependencies", "dependencies"];

/// What the host asks to rebuild native modules for
#[derive(Debug, Clone, Copy)]
pub struct RebuildRequest<'a> {
    pub project_dir: &'a Path,
    pub electron_version: &'a Version,
    pub platform: &'a str,
    pub arch: &'a str,
    /// Host-specific rebuild options, passed through untouched
    pub rebuild_config: &'a Value,
}

/// Rebuilds native Node modules against the target Electron version
#[async_trait]
pub trait NativeRebuilder: Send + Sync {
    async fn rebuild(&self, request: RebuildRequest<'_>) -> anyhow::Result<()>;
}

/// Rebuilder that only reports what it would rebuild for
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipRebuild;

#[async_trait]
impl NativeRebuilder for SkipRebuild {
    async fn rebuild(&self, request: RebuildRequest<'_>) -> anyhow::Result<()> {
        tracing::debug!(
            electron = %request.electron_version,
            platform = request.platform,
            arch = request.arch,
            "no native rebuilder configured, skipping native dependencies"
        );
        Ok(())
    }
}

/// Electron version a project builds against.
///
/// The installed package wins over the declared range in `package.json`.
pub async fn electron_version(project_dir: &Path, manifest: &Value) -> Result<Version> {
    for key in DEPENDENCY_KEYS {
        for package in ELECTRON_PACKAGES {
            let Some(declared) = manifest[key][package].as_str() else {
                continue;
            };

            let installed = project_dir
                .join("node_modules")
                .join(package)
                .join("package.json");
            if let Ok(content) = tokio::fs::read_to_string(&installed).await {
                let pkg: Value = serde_json::from_str(&content)?;
                if let Some(version) = pkg["version"].as_str() {
                    return parse_version(version);
                }
            }

            return parse_version(declared.trim_start_matches(['^', '~', '=', 'v']));
        }
    }

    Err(PluginError::ElectronVersion(
        "Electron is not listed in dependencies or devDependencies".to_string(),
    ))
}

fn parse_version(version: &str) -> Result<Version> {
    Version::parse(version.trim())
        .map_err(|e| PluginError::ElectronVersion(format!("\"{version}\" is not a version: {e}")))
}
