//! forge-rspack CLI entry point.
//!
//! Parses arguments, initializes logging, and dispatches to the command
//! implementations.

use clap::Parser;
use forge_rspack_cli::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Inspect(inspect_args) => commands::inspect_execute(inspect_args).await,
        cli::Command::Check(check_args) => commands::check_execute(check_args).await,
    };

    result.map_err(error::cli_error_to_miette)
}
