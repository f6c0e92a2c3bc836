//! Shared utilities for command implementations.

use std::path::{Path, PathBuf};

use forge_rspack::PluginConfig;
use forge_rspack_config::ConfigDiscovery;

use crate::error::{CliError, Result};

/// Resolve a path relative to a working directory.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Absolute project root from `--cwd`, defaulting to the current directory.
pub fn project_dir(cwd: Option<&Path>) -> Result<PathBuf> {
    let current = std::env::current_dir()?;
    let root = match cwd {
        Some(dir) => resolve_path(dir, &current),
        None => current,
    };

    if !root.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "project root is not a directory: {}",
            root.display()
        )));
    }
    Ok(root)
}

/// Load plugin options from `--config` or by discovery under `root`.
pub fn load_config(root: &Path, config: Option<&Path>) -> Result<PluginConfig> {
    let discovery = ConfigDiscovery::new(root);
    let config = match config {
        Some(path) => discovery.load_from(&resolve_path(path, root))?,
        None => discovery.load()?,
    };
    tracing::debug!(
        entry_points = config.entry_points().len(),
        port = config.port(),
        "plugin options loaded"
    );
    Ok(config)
}
