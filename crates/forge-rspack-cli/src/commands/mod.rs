//! Command implementations.
//!
//! - [`inspect`] - Print the generated bundler configurations
//! - [`check`] - Validate plugin options and the package manifest

pub mod check;
pub mod inspect;
pub(crate) mod utils;

pub use check::execute as check_execute;
pub use inspect::execute as inspect_execute;
