use forge_rspack_config::{
    BundlerConfig, ConfigError, Devtool, NodeOptions, OutputOptions, Plugin, Target,
};
use path_clean::PathClean;

use super::ConfigGenerator;
use crate::error::Result;

impl ConfigGenerator {
    /// Main process configuration.
    ///
    /// Requires the user configuration to declare an `entry`. Entries starting
    /// with `./` are made absolute against the project directory; bare module
    /// names pass through. The cross-process constants are injected through a
    /// `Define` plugin.
    pub async fn main_config(&self) -> Result<BundlerConfig> {
        let mut user = self.resolve_config(&self.plugin_config().main_config).await?;

        let entry = user.entry.take().ok_or_else(ConfigError::missing_main_entry)?;
        user.entry = Some(entry.map_paths(|path| self.absolute_entry(path)));

        let base = BundlerConfig {
            devtool: Some(Devtool::named("source-map")),
            target: Some(Target::ElectronMain.into()),
            mode: Some(self.mode()),
            output: Some(OutputOptions {
                path: Some(self.rspack_dir().join("main")),
                filename: Some("index.js".to_string()),
                library_target: Some("commonjs2".to_string()),
                ..Default::default()
            }),
            plugins: vec![Plugin::define(self.defines())],
            node: Some(NodeOptions::preserve_globals().into()),
            ..Default::default()
        };

        Ok(base.merge(user)?)
    }

    fn absolute_entry(&self, path: String) -> String {
        if path.starts_with("./") {
            self.project_dir()
                .join(&path)
                .clean()
                .to_string_lossy()
                .into_owned()
        } else {
            path
        }
    }
}
