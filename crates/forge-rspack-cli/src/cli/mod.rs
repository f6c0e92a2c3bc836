//! Command-line interface definition.
//!
//! # Command Structure
//!
//! - `forge-rspack inspect` - Print the generated bundler configurations
//! - `forge-rspack check` - Validate plugin options and the package manifest

mod commands;
pub mod enums;

use clap::Parser;

pub use commands::{CheckArgs, Command, InspectArgs};
pub use enums::*;

/// forge-rspack - Electron Forge rspack plugin tooling
#[derive(Parser, Debug)]
#[command(
    name = "forge-rspack",
    version,
    about = "Inspect and validate Electron Forge rspack plugin configurations",
    long_about = "Loads the rspack plugin options of an Electron Forge project and runs the\n\
                  configuration engine on them: entry point classification, bundler\n\
                  configuration synthesis and entry constant injection."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
