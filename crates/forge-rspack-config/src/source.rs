//! Where a user-supplied bundler configuration comes from.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::bundler::{BundlerConfig, Mode};
use crate::error::{ConfigError, Result};

/// Second argument handed to a config factory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FactoryArgs {
    pub mode: Mode,
}

type FactoryFn = dyn Fn(Value, FactoryArgs) -> BoxFuture<'static, Result<BundlerConfig>> + Send + Sync;

/// Function producing a bundler configuration from `(environment, {mode})`.
///
/// Factories may be asynchronous; synchronous ones are wrapped with
/// [`ConfigFactory::from_fn`].
#[derive(Clone)]
pub struct ConfigFactory(Arc<FactoryFn>);

impl ConfigFactory {
    pub fn new<F, Fut>(factory: F) -> Self
    where
        F: Fn(Value, FactoryArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<BundlerConfig>> + Send + 'static,
    {
        Self(Arc::new(move |env, args| Box::pin(factory(env, args))))
    }

    pub fn from_fn<F>(factory: F) -> Self
    where
        F: Fn(Value, FactoryArgs) -> Result<BundlerConfig> + Send + Sync + 'static,
    {
        Self(Arc::new(move |env, args| {
            let result = factory(env, args);
            Box::pin(async move { result })
        }))
    }

    pub async fn call(&self, env: Value, args: FactoryArgs) -> Result<BundlerConfig> {
        (self.0)(env, args).await
    }
}

impl fmt::Debug for ConfigFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConfigFactory(..)")
    }
}

/// A bundler configuration as written by the user.
///
/// In files, a string is a path relative to the project root and an object is
/// an inline configuration. Factories can only be supplied programmatically.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    Inline(Box<BundlerConfig>),
    Factory(ConfigFactory),
    Path(PathBuf),
}

impl ConfigSource {
    pub fn inline(config: BundlerConfig) -> Self {
        ConfigSource::Inline(Box::new(config))
    }

    /// Parse a source written at option path `field`
    pub fn from_value_at(value: Value, field: &str) -> Result<Self> {
        match value {
            Value::String(path) => Ok(ConfigSource::Path(PathBuf::from(path))),
            config @ Value::Object(_) => {
                BundlerConfig::from_value_at(config, field).map(ConfigSource::inline)
            }
            other => Err(ConfigError::InvalidValue {
                field: field.to_string(),
                message: format!("expected a config file path or a config object, found {other}"),
            }),
        }
    }
}

impl Default for ConfigSource {
    fn default() -> Self {
        ConfigSource::inline(BundlerConfig::default())
    }
}

impl From<BundlerConfig> for ConfigSource {
    fn from(config: BundlerConfig) -> Self {
        ConfigSource::inline(config)
    }
}

impl From<ConfigFactory> for ConfigSource {
    fn from(factory: ConfigFactory) -> Self {
        ConfigSource::Factory(factory)
    }
}

impl<'de> Deserialize<'de> for ConfigSource {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        ConfigSource::from_value_at(Value::deserialize(deserializer)?, "config")
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{Devtool, Target};
    use serde_json::json;

    #[test]
    fn string_deserializes_as_path() {
        let source: ConfigSource = serde_json::from_value(json!("./rspack.main.config.json")).unwrap();
        assert!(matches!(source, ConfigSource::Path(ref p) if p.ends_with("rspack.main.config.json")));
    }

    #[test]
    fn object_deserializes_as_inline() {
        let source: ConfigSource =
            serde_json::from_value(json!({ "entry": "./src/index.js", "target": "node" })).unwrap();
        let ConfigSource::Inline(config) = source else {
            panic!("expected inline config");
        };
        assert_eq!(config.known_target(), Some(Target::Node));
    }

    #[test]
    fn other_values_are_rejected_with_the_option_path() {
        let err = ConfigSource::from_value_at(json!(true), "mainConfig").unwrap_err();
        assert!(err.to_string().contains("invalid config value for \"mainConfig\""));

        let err = serde_json::from_value::<ConfigSource>(json!({ "mode": "staging" })).unwrap_err();
        assert!(err.to_string().contains("\"config.mode\""));
    }

    #[tokio::test]
    async fn factory_receives_mode() {
        let factory = ConfigFactory::from_fn(|_env, args| {
            Ok(BundlerConfig {
                devtool: Some(Devtool::named(format!("{}-map", args.mode))),
                ..Default::default()
            })
        });
        let config = factory
            .call(json!({}), FactoryArgs { mode: Mode::Production })
            .await
            .unwrap();
        assert_eq!(config.devtool_name(), Some("production-map"));
    }
}
