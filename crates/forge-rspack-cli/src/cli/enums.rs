use clap::ValueEnum;
use forge_rspack::Mode;

/// Build mode
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum ModeArg {
    /// Watch and dev-server configurations
    ///
    /// Window constants point at the dev server.
    #[value(name = "development")]
    Development,

    /// Packaging configurations
    ///
    /// Window constants resolve files next to the main bundle at runtime.
    #[value(name = "production")]
    Production,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Development => Mode::Development,
            ModeArg::Production => Mode::Production,
        }
    }
}

/// Side of the build selected by `inspect --only`
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum Bundle {
    /// The main process configuration
    #[value(name = "main")]
    Main,

    /// Renderer and preload configurations
    #[value(name = "renderer")]
    Renderer,
}
