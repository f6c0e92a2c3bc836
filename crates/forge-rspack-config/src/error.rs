//! Error types for configuration validation and loading.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Entry point shape errors
    #[error("invalid entry point \"{name}\": {reason}")]
    InvalidEntryPoint { name: String, reason: String },

    #[error("duplicate entry point name \"{0}\"\n\nHint: entry point names are used as bundle keys and must be unique")]
    DuplicateEntryPoint(String),

    // Port validation errors
    #[error("Cannot specify {field} ({port}) below 1024, as they are privileged")]
    PrivilegedPort { field: &'static str, port: u32 },

    #[error("{field} specified ({port}) is not a valid TCP port.")]
    InvalidPort { field: &'static str, port: u32 },

    // Required fields
    #[error("Required option \"{field}\" has not been defined\n\nHint: {hint}")]
    MissingField { field: String, hint: String },

    #[error("invalid config value for \"{field}\": {message}")]
    InvalidValue { field: String, message: String },

    // File system checks
    #[error("entry point \"{name}\" references a missing file: {}", path.display())]
    EntryFileNotFound { name: String, path: PathBuf },

    // Package manifest errors
    #[error(
        "Electron Forge is configured to use the Rspack plugin. The plugin expects the\n\"main\" entry point in \"package.json\" to be \".rspack/main\" (where the plugin outputs\nthe generated files). Instead, it is {found}"
    )]
    ManifestMain { found: String },

    // Config parsing/loading errors
    #[error("config not found")]
    NotFound,

    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to load configuration: {0}")]
    Load(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// The main process config has no `entry`
    pub fn missing_main_entry() -> Self {
        ConfigError::MissingField {
            field: "mainConfig.entry".to_string(),
            hint: "Add an \"entry\" pointing at your main process script to the main config"
                .to_string(),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Load(err.to_string())
    }
}
