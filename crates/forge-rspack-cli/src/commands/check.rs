//! Check command implementation.
//!
//! Validates plugin options without compiling anything.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use forge_rspack::{check_manifest_main, classify, ConfigGenerator, Mode, PluginConfig};
use forge_rspack_config::validate_fs;
use serde_json::Value;

use crate::cli::CheckArgs;
use crate::commands::utils;
use crate::error::{Result, ResultExt};
use crate::ui;

/// Execute the check command.
///
/// # Validation Steps
///
/// 1. Load the plugin options (entry point shapes and ports are validated
///    while loading)
/// 2. Check that referenced files exist (unless `--skip-files`)
/// 3. Resolve the main process configuration, which requires an entry
/// 4. Check the `main` field of `package.json`
/// 5. Report how entry points are classified
pub async fn execute(args: CheckArgs) -> Result<()> {
    ui::info("Checking rspack plugin configuration...");

    let root = utils::project_dir(args.cwd.as_deref())?;
    let config = utils::load_config(&root, args.config.as_deref())?;
    ui::success("Plugin options are valid");

    if args.skip_files {
        ui::debug("Skipping entry point file checks");
    } else {
        validate_fs(&config, &root)?;
        ui::success("Entry point files exist");
    }

    let port = config.port();
    let generator = ConfigGenerator::new(Arc::new(config), root.clone(), Mode::Production, port);
    generator.main_config().await?;
    ui::success("Main process configuration resolves");

    check_manifest(&root).await?;
    report_targets(generator.plugin_config());

    ui::success("Configuration is valid!");
    Ok(())
}

async fn check_manifest(root: &Path) -> Result<()> {
    let path = root.join("package.json");
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            ui::warning("package.json not found, skipping the \"main\" field check");
            return Ok(());
        }
        Err(err) => return Err(err).with_path(&path),
    };

    let manifest: Value =
        serde_json::from_str(&content).with_hint("Check package.json for syntax errors")?;
    check_manifest_main(&manifest)?;
    ui::success("package.json \"main\" points at .rspack/main");
    Ok(())
}

fn report_targets(config: &PluginConfig) {
    let buckets = classify(config.entry_points(), config.renderer.node_integration);
    if buckets.is_empty() {
        ui::info("No renderer entry points");
        return;
    }

    for (target, entries) in buckets.iter() {
        let names: Vec<&str> = entries.iter().map(|entry| entry.name.as_str()).collect();
        ui::info(&format!("{target}: {}", names.join(", ")));
    }
}
