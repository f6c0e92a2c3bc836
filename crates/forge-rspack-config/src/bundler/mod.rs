//! Bundler configuration object model.
//!
//! A [`BundlerConfig`] is the unit handed to the external compiler. Only the
//! fields this crate synthesizes are typed; everything else a user writes in
//! their own config (module rules, resolve options, ...) travels through
//! `extra` untouched.

mod define;
mod entry;
mod output;
mod plugin;
mod types;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub use define::{quote, Expression};
pub use entry::{Entry, EntryValue};
pub use output::{NodeOptions, NodeSetting, OutputOptions};
pub use plugin::Plugin;
pub use types::{Devtool, Mode, Target, TargetSetting};

use crate::error::{ConfigError, Result};
use crate::merge::merge_values;

/// Main bundler configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlerConfig {
    /// Optional configuration name reported back in statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetSetting>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,

    /// Source map strategy, e.g. `source-map` or `eval-source-map`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devtool: Option<Devtool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<Entry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputOptions>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeSetting>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<Plugin>,

    /// Modules left to the runtime instead of being bundled. A single item is
    /// read as a one-element list.
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub externals: Vec<Value>,

    /// How externals are loaded at runtime, e.g. `commonjs2`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub externals_type: Option<String>,

    /// Stats output options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infrastructure_logging: Option<Value>,

    /// Options not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BundlerConfig {
    /// Create from serde_json::Value
    ///
    /// # Example
    ///
    /// ```
    /// use forge_rspack_config::{BundlerConfig, Target};
    /// use serde_json::json;
    ///
    /// let config = BundlerConfig::from_value(json!({
    ///     "target": "web",
    ///     "module": { "rules": [] }
    /// }))
    /// .unwrap();
    /// assert_eq!(config.known_target(), Some(Target::Web));
    /// assert!(config.extra.contains_key("module"));
    /// ```
    pub fn from_value(value: Value) -> Result<Self> {
        Self::from_value_at(value, "config")
    }

    /// Like [`BundlerConfig::from_value`], reporting errors against the
    /// option path `field`, e.g. `renderer.config.devtool`.
    pub fn from_value_at(value: Value, field: &str) -> Result<Self> {
        Self::deserialize(&value).map_err(|e| ConfigError::InvalidValue {
            field: match offending_key(&value) {
                Some(key) => format!("{field}.{key}"),
                None => field.to_string(),
            },
            message: e.to_string(),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Deep-merge `other` over `self`.
    ///
    /// Scalars from `other` win, lists (plugins, externals, ...) are
    /// concatenated and nested objects merge recursively.
    pub fn merge(self, other: BundlerConfig) -> Result<Self> {
        let mut base = self.to_value()?;
        merge_values(&mut base, other.to_value()?);
        Self::from_value(base)
    }

    /// The target, when it is one of the synthesized [`Target`]s
    pub fn known_target(&self) -> Option<Target> {
        self.target.as_ref().and_then(TargetSetting::known)
    }

    pub fn devtool_name(&self) -> Option<&str> {
        self.devtool.as_ref().and_then(Devtool::as_str)
    }

    /// Bundle names declared by a named `entry`
    pub fn entry_names(&self) -> Vec<&str> {
        self.entry.as_ref().map(Entry::names).unwrap_or_default()
    }

    /// Whether this configuration emits preload scripts
    pub fn is_preload_bundle(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|output| output.filename.as_deref())
            .is_some_and(|filename| filename.ends_with("preload.js"))
    }

    /// All define substitutions across `Define` plugins, later plugins winning
    pub fn definitions(&self) -> indexmap::IndexMap<&str, &Expression> {
        let mut out = indexmap::IndexMap::new();
        for plugin in &self.plugins {
            if let Plugin::Define { definitions } = plugin {
                for (key, value) in definitions {
                    out.insert(key.as_str(), value);
                }
            }
        }
        out
    }
}

/// First top-level key that fails to deserialize on its own
fn offending_key(value: &Value) -> Option<&str> {
    value.as_object()?.iter().find_map(|(key, item)| {
        let single = Value::Object(Map::from_iter([(key.clone(), item.clone())]));
        BundlerConfig::deserialize(&single)
            .is_err()
            .then_some(key.as_str())
    })
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        item => Ok(vec![item]),
    }
}
