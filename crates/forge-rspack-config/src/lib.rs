pub mod bundler;
pub mod config;
pub mod dev;
pub mod discovery;
pub mod entry_point;
pub mod error;
pub mod loader;
pub mod merge;
pub mod source;
pub mod validation;

// Re-export main types
pub use bundler::*;
pub use config::*;
pub use dev::*;
pub use entry_point::*;
pub use error::*;
pub use source::*;

pub use discovery::{discover, ConfigDiscovery, ENV_PREFIX, PACKAGE_JSON_KEY};
pub use loader::{ConfigLoader, FileConfigLoader};
pub use merge::{merge_all, merge_values};
pub use validation::{validate_fs, validate_schema, ConfigValidator, FsValidator, SchemaValidator};
