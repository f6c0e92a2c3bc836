//! Inspect command implementation.
//!
//! Prints the bundler configurations the plugin would hand to the compiler.

use std::sync::Arc;

use forge_rspack::ConfigGenerator;
use serde_json::{Map, Value};

use crate::cli::{Bundle, InspectArgs};
use crate::commands::utils;
use crate::error::Result;

/// Execute the inspect command.
///
/// Writes a JSON object with a `main` configuration and a `renderer` array
/// to stdout. `--only` restricts the output to one of the two keys.
pub async fn execute(args: InspectArgs) -> Result<()> {
    let root = utils::project_dir(args.cwd.as_deref())?;
    let config = utils::load_config(&root, args.config.as_deref())?;
    let port = config.port();

    let generator = ConfigGenerator::new(Arc::new(config), root, args.mode.into(), port);
    let output = render(&generator, args.only).await?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Generate the selected configurations as one JSON document.
pub async fn render(generator: &ConfigGenerator, only: Option<Bundle>) -> Result<Value> {
    let mut output = Map::new();

    if only != Some(Bundle::Renderer) {
        let main = generator.main_config().await?;
        output.insert("main".to_string(), serde_json::to_value(main)?);
    }
    if only != Some(Bundle::Main) {
        let renderers = generator.renderer_configs().await?;
        tracing::debug!(count = renderers.len(), "renderer configurations generated");
        output.insert("renderer".to_string(), serde_json::to_value(renderers)?);
    }

    Ok(Value::Object(output))
}
