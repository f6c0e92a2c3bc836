//! Command-line front end for the Electron Forge rspack plugin.
//!
//! The CLI loads plugin options the same way the plugin does (discovery of
//! `forge-rspack.toml`, `forge-rspack.json` or the `forgeRspack` key of
//! `package.json`) and exposes the configuration engine without a bundler:
//!
//! - `inspect` prints the synthesized main and renderer bundler
//!   configurations for a mode
//! - `check` validates the options, the files they reference and the
//!   package manifest
//!
//! # Modules
//!
//! - [`error`] - CLI error type and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status messages on stderr
//! - [`commands`] - command implementations
//!
//! # Example
//!
//! ```rust
//! use forge_rspack_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result, ResultExt};
