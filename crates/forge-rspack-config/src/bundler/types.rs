use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Build mode handed to the bundler and to config factories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Optimised one-shot build used when packaging
    Production,
    /// Watch / dev-server build (default)
    #[default]
    Development,
    /// No mode-specific defaults; only ever set by user configuration
    None,
}

impl Mode {
    pub fn from_production(is_prod: bool) -> Self {
        if is_prod {
            Mode::Production
        } else {
            Mode::Development
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, Mode::Production)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Production => "production",
            Mode::Development => "development",
            Mode::None => "none",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(Mode::Production),
            "development" | "dev" => Ok(Mode::Development),
            "none" => Ok(Mode::None),
            other => Err(format!("Invalid mode: {}", other)),
        }
    }
}

/// Compiler target environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    /// Browser-like sandbox, no Node.js access
    Web,
    /// Electron main process
    ElectronMain,
    /// Electron renderer with Node.js integration
    ElectronRenderer,
    /// Electron preload script with full Node.js access
    ElectronPreload,
    /// Plain Node.js
    Node,
}

impl Target {
    pub const ALL: [Target; 5] = [
        Target::Web,
        Target::ElectronMain,
        Target::ElectronRenderer,
        Target::ElectronPreload,
        Target::Node,
    ];

    /// Look up a target by its bundler name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|target| target.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Target::Web => "web",
            Target::ElectronMain => "electron-main",
            Target::ElectronRenderer => "electron-renderer",
            Target::ElectronPreload => "electron-preload",
            Target::Node => "node",
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bundler `target` option.
///
/// The synthesized configs only ever use [`Target`], but user configs may
/// name any target the bundler understands (`electron30-renderer`, `es2020`),
/// list several, or disable target-specific output with `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSetting {
    Known(Target),
    Custom(String),
    List(Vec<String>),
    Disabled,
}

impl TargetSetting {
    /// The target, when it is one this crate synthesizes
    pub fn known(&self) -> Option<Target> {
        match self {
            TargetSetting::Known(target) => Some(*target),
            _ => None,
        }
    }
}

impl From<Target> for TargetSetting {
    fn from(target: Target) -> Self {
        TargetSetting::Known(target)
    }
}

impl Serialize for TargetSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TargetSetting::Known(target) => serializer.serialize_str(target.as_str()),
            TargetSetting::Custom(name) => serializer.serialize_str(name),
            TargetSetting::List(names) => names.serialize(serializer),
            TargetSetting::Disabled => serializer.serialize_bool(false),
        }
    }
}

impl<'de> Deserialize<'de> for TargetSetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(name) => Ok(match Target::from_name(&name) {
                Some(target) => TargetSetting::Known(target),
                None => TargetSetting::Custom(name),
            }),
            Value::Bool(false) => Ok(TargetSetting::Disabled),
            list @ Value::Array(_) => serde_json::from_value(list)
                .map(TargetSetting::List)
                .map_err(|_| D::Error::custom("expected a list of target names")),
            other => Err(D::Error::custom(format!(
                "expected a target name, a list of target names or `false`, found {other}"
            ))),
        }
    }
}

/// Bundler `devtool` option: a source map strategy, or `false` for none
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Devtool {
    Named(String),
    Disabled,
}

impl Devtool {
    pub fn named(name: impl Into<String>) -> Self {
        Devtool::Named(name.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Devtool::Named(name) => Some(name),
            Devtool::Disabled => None,
        }
    }
}

impl Serialize for Devtool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Devtool::Named(name) => serializer.serialize_str(name),
            Devtool::Disabled => serializer.serialize_bool(false),
        }
    }
}

impl<'de> Deserialize<'de> for Devtool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(name) => Ok(Devtool::Named(name)),
            Value::Bool(false) => Ok(Devtool::Disabled),
            other => Err(D::Error::custom(format!(
                "expected a source map strategy or `false`, found {other}"
            ))),
        }
    }
}
