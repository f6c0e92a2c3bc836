//! Miette diagnostic conversion for CLI errors.

use forge_rspack::{CompileError, PluginError};
use forge_rspack_config::ConfigError;
use miette::Report;

use crate::error::CliError;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) | CliError::Plugin(PluginError::Config(e)) => config_error_to_miette(e),
        CliError::Plugin(PluginError::Compile(e)) => compile_error_to_miette(e),
        _ => miette::miette!("{}", err),
    }
}

/// Convert ConfigError to miette Report
pub fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::NotFound => miette::miette!(
            help = "Create forge-rspack.toml or forge-rspack.json, add a \"forgeRspack\" key to package.json, or pass --config <path>",
            "No rspack plugin configuration found"
        ),
        ConfigError::PrivilegedPort { .. } | ConfigError::InvalidPort { .. } => miette::miette!(
            help = "Use a port between 1024 and 65535",
            "Configuration error: {}",
            err
        ),
        ConfigError::ManifestMain { .. } => miette::miette!(
            help = "Set \"main\" in package.json to \".rspack/main\"",
            "{}",
            err
        ),
        _ => miette::miette!("Configuration error: {}", err),
    }
}

/// Convert CompileError to miette Report
pub fn compile_error_to_miette(err: CompileError) -> Report {
    match err {
        CompileError::Stats { process, report } => {
            miette::miette!("Compilation errors in the {}:\n{}", process, report)
        }
        other => miette::miette!(
            help = format!(
                "Check the {} bundler configuration and its entry files",
                other.process()
            ),
            "{}",
            other
        ),
    }
}
