//! Entry-point descriptors: the logical windows, workers and preload scripts
//! of an Electron application.
//!
//! Descriptors arrive as loosely shaped records ([`EntryPointDescriptor`]) and
//! are classified once, at ingestion, into one of three shapes
//! ([`EntryPointKind`]). Anything that fits none of them is rejected.

use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::source::ConfigSource;

/// Preload script attached to an entry point
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreloadEntryPoint {
    /// Relative or absolute path to the preload JS file
    pub js: String,

    /// Scripts bundled ahead of the preload script
    #[serde(default)]
    pub prefixed_entries: Vec<String>,

    /// Bundler config for this preload alone; defaults to the renderer config
    #[serde(default)]
    pub config: Option<ConfigSource>,
}

impl PreloadEntryPoint {
    pub fn new(js: impl Into<String>) -> Self {
        Self {
            js: js.into(),
            prefixed_entries: Vec::new(),
            config: None,
        }
    }

    pub fn with_config(mut self, config: impl Into<ConfigSource>) -> Self {
        self.config = Some(config.into());
        self
    }
}

/// Entry point as written in configuration, before shape validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPointDescriptor {
    /// Human friendly name, used as bundle key and directory name
    pub name: String,

    /// HTML template for a window
    #[serde(default)]
    pub html: Option<String>,

    /// Main script
    #[serde(default)]
    pub js: Option<String>,

    #[serde(default)]
    pub preload: Option<PreloadEntryPoint>,

    /// `nodeIntegration` of the window; unset defers to the renderer default
    #[serde(default)]
    pub node_integration: Option<bool>,

    /// Extra scripts prepended to the bundle (crash reporters and the like)
    #[serde(default)]
    pub prefixed_entries: Vec<String>,

    /// Extra split chunks pulled into the generated HTML document
    #[serde(default)]
    pub additional_chunks: Vec<String>,
}

/// The three entry point shapes
#[derive(Debug, Clone)]
pub enum EntryPointKind {
    /// A window with an HTML document and a script, optionally a preload
    LocalWindow {
        html: String,
        js: String,
        preload: Option<PreloadEntryPoint>,
    },
    /// A headless renderer bundle such as a worker
    NoWindow {
        js: String,
        preload: Option<PreloadEntryPoint>,
    },
    /// Only a preload script
    PreloadOnly { preload: PreloadEntryPoint },
}

/// Validated entry point
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "EntryPointDescriptor")]
pub struct EntryPoint {
    pub name: String,
    pub node_integration: Option<bool>,
    pub prefixed_entries: Vec<String>,
    pub additional_chunks: Vec<String>,
    pub kind: EntryPointKind,
}

impl EntryPoint {
    pub fn local_window(
        name: impl Into<String>,
        html: impl Into<String>,
        js: impl Into<String>,
    ) -> Self {
        Self::with_kind(
            name,
            EntryPointKind::LocalWindow {
                html: html.into(),
                js: js.into(),
                preload: None,
            },
        )
    }

    pub fn no_window(name: impl Into<String>, js: impl Into<String>) -> Self {
        Self::with_kind(
            name,
            EntryPointKind::NoWindow {
                js: js.into(),
                preload: None,
            },
        )
    }

    pub fn preload_only(name: impl Into<String>, preload: PreloadEntryPoint) -> Self {
        Self::with_kind(name, EntryPointKind::PreloadOnly { preload })
    }

    fn with_kind(name: impl Into<String>, kind: EntryPointKind) -> Self {
        Self {
            name: name.into(),
            node_integration: None,
            prefixed_entries: Vec::new(),
            additional_chunks: Vec::new(),
            kind,
        }
    }

    /// Attach a preload script. A preload-only entry has its preload replaced.
    pub fn with_preload(mut self, preload: PreloadEntryPoint) -> Self {
        match &mut self.kind {
            EntryPointKind::LocalWindow { preload: slot, .. }
            | EntryPointKind::NoWindow { preload: slot, .. } => *slot = Some(preload),
            EntryPointKind::PreloadOnly { preload: slot } => *slot = preload,
        }
        self
    }

    pub fn with_node_integration(mut self, enabled: bool) -> Self {
        self.node_integration = Some(enabled);
        self
    }

    pub fn with_prefixed_entries<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixed_entries = entries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_additional_chunks<I, S>(mut self, chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.additional_chunks = chunks.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_local_window(&self) -> bool {
        matches!(self.kind, EntryPointKind::LocalWindow { .. })
    }

    pub fn is_preload_only(&self) -> bool {
        matches!(self.kind, EntryPointKind::PreloadOnly { .. })
    }

    /// HTML template, for local windows
    pub fn html(&self) -> Option<&str> {
        match &self.kind {
            EntryPointKind::LocalWindow { html, .. } => Some(html),
            _ => None,
        }
    }

    /// Window body script, absent for preload-only entries
    pub fn js(&self) -> Option<&str> {
        match &self.kind {
            EntryPointKind::LocalWindow { js, .. } | EntryPointKind::NoWindow { js, .. } => {
                Some(js)
            }
            EntryPointKind::PreloadOnly { .. } => None,
        }
    }

    pub fn preload(&self) -> Option<&PreloadEntryPoint> {
        match &self.kind {
            EntryPointKind::LocalWindow { preload, .. } | EntryPointKind::NoWindow { preload, .. } => {
                preload.as_ref()
            }
            EntryPointKind::PreloadOnly { preload } => Some(preload),
        }
    }

    /// Resolved `nodeIntegration`: the entry's own flag, else the renderer
    /// default, else `false`.
    pub fn resolved_node_integration(&self, renderer_default: Option<bool>) -> bool {
        self.node_integration.or(renderer_default).unwrap_or(false)
    }
}

impl TryFrom<EntryPointDescriptor> for EntryPoint {
    type Error = ConfigError;

    fn try_from(descriptor: EntryPointDescriptor) -> Result<Self> {
        let EntryPointDescriptor {
            name,
            html,
            js,
            preload,
            node_integration,
            prefixed_entries,
            additional_chunks,
        } = descriptor;

        let invalid = |reason: &str| ConfigError::InvalidEntryPoint {
            name: name.clone(),
            reason: reason.to_string(),
        };

        if name.trim().is_empty() {
            return Err(invalid("entry point name cannot be empty"));
        }

        let kind = match (html, js, preload) {
            (Some(html), Some(js), preload) => EntryPointKind::LocalWindow { html, js, preload },
            (None, Some(js), preload) => EntryPointKind::NoWindow { js, preload },
            (None, None, Some(preload)) => EntryPointKind::PreloadOnly { preload },
            (Some(_), None, _) => {
                return Err(invalid("an entry point with \"html\" must also define \"js\""));
            }
            (None, None, None) => {
                return Err(invalid(
                    "expected one of \"html\" + \"js\", \"js\", or \"preload\"",
                ));
            }
        };

        Ok(Self {
            name,
            node_integration,
            prefixed_entries,
            additional_chunks,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Result<EntryPoint> {
        let descriptor: EntryPointDescriptor = serde_json::from_value(value)?;
        EntryPoint::try_from(descriptor)
    }

    #[test]
    fn html_and_js_is_local_window() {
        let entry = parse(json!({
            "name": "main_window",
            "html": "./src/index.html",
            "js": "./src/renderer.js",
            "preload": { "js": "./src/preload.js" }
        }))
        .unwrap();
        assert!(entry.is_local_window());
        assert_eq!(entry.html(), Some("./src/index.html"));
        assert_eq!(entry.preload().map(|p| p.js.as_str()), Some("./src/preload.js"));
    }

    #[test]
    fn js_only_is_no_window() {
        let entry = parse(json!({ "name": "worker", "js": "./src/worker.js" })).unwrap();
        assert!(matches!(entry.kind, EntryPointKind::NoWindow { .. }));
        assert!(entry.preload().is_none());
    }

    #[test]
    fn preload_only_has_no_body() {
        let entry = parse(json!({ "name": "bridge", "preload": { "js": "./bridge.js" } })).unwrap();
        assert!(entry.is_preload_only());
        assert_eq!(entry.js(), None);
    }

    #[test]
    fn html_without_js_is_rejected() {
        let err = parse(json!({
            "name": "broken",
            "html": "./index.html",
            "preload": { "js": "./preload.js" }
        }))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEntryPoint { ref name, .. } if name == "broken"));
    }

    #[test]
    fn empty_descriptor_is_rejected() {
        let err = parse(json!({ "name": "nothing" })).unwrap_err();
        assert!(err.to_string().contains("invalid entry point \"nothing\""));
    }

    #[test]
    fn deserializing_entry_point_directly_validates_shape() {
        let result: std::result::Result<EntryPoint, _> =
            serde_json::from_value(json!({ "name": "nothing" }));
        assert!(result.is_err());
    }

    #[test]
    fn node_integration_falls_back_to_renderer_default() {
        let entry = EntryPoint::no_window("worker", "./worker.js");
        assert!(!entry.resolved_node_integration(None));
        assert!(entry.resolved_node_integration(Some(true)));
        let entry = entry.with_node_integration(false);
        assert!(!entry.resolved_node_integration(Some(true)));
    }
}
