use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Bundler `output` option
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    /// Absolute output directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Filename template, e.g. `[name]/index.js`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_object: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,

    /// Module format of the emitted library, e.g. `commonjs2`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_target: Option<String>,

    /// Options not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Bundler `node` option object.
///
/// Both flags set to `false` keep `__dirname` / `__filename` as Node-native
/// identifiers instead of rewriting them. The bundler also takes strings such
/// as `"mock"` or `"eval-only"` here, so the flags stay untyped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeOptions {
    #[serde(rename = "__dirname", default, skip_serializing_if = "Option::is_none")]
    pub dirname: Option<Value>,

    #[serde(rename = "__filename", default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<Value>,

    /// Options not modelled above, e.g. `global`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NodeOptions {
    /// Leave `__dirname` and `__filename` untouched
    pub fn preserve_globals() -> Self {
        Self {
            dirname: Some(Value::Bool(false)),
            filename: Some(Value::Bool(false)),
            extra: Map::new(),
        }
    }
}

/// Bundler `node` option: polyfill settings, or `false` to disable them all
#[derive(Debug, Clone, PartialEq)]
pub enum NodeSetting {
    Options(NodeOptions),
    Disabled,
}

impl From<NodeOptions> for NodeSetting {
    fn from(options: NodeOptions) -> Self {
        NodeSetting::Options(options)
    }
}

impl Serialize for NodeSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NodeSetting::Options(options) => options.serialize(serializer),
            NodeSetting::Disabled => serializer.serialize_bool(false),
        }
    }
}

impl<'de> Deserialize<'de> for NodeSetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Bool(false) => Ok(NodeSetting::Disabled),
            options @ Value::Object(_) => serde_json::from_value(options)
                .map(NodeSetting::Options)
                .map_err(D::Error::custom),
            other => Err(D::Error::custom(format!(
                "expected node options or `false`, found {other}"
            ))),
        }
    }
}
