use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::enums::*;

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the generated bundler configurations as JSON
    ///
    /// Runs the same synthesis the plugin performs before compiling: the main
    /// process configuration plus one configuration per non-empty renderer
    /// target, with entry constants injected.
    Inspect(InspectArgs),

    /// Validate plugin options and the package manifest
    ///
    /// Checks entry point shapes, ports, the files entry points reference and
    /// that `package.json` points `main` at the plugin output.
    Check(CheckArgs),
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Plugin options file, relative to the project root
    ///
    /// When omitted, `forge-rspack.toml`, `forge-rspack.json` and the
    /// `forgeRspack` key of `package.json` are searched in that order.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Build mode the configurations are generated for
    #[arg(short, long, value_enum, default_value = "development")]
    pub mode: ModeArg,

    /// Only print one side of the build
    #[arg(long, value_enum)]
    pub only: Option<Bundle>,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Plugin options file, relative to the project root
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Skip the check that entry point files exist
    #[arg(long)]
    pub skip_files: bool,
}
