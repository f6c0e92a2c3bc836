use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bundler::define::Expression;

/// Bundler plugin declaration.
///
/// Plugins are plain data here; the compiler behind the `Compiler` seam maps
/// each variant onto its own plugin instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "plugin", rename_all = "kebab-case")]
pub enum Plugin {
    /// Generate an HTML document for a window bundle
    Html {
        /// Document title
        title: String,
        /// Path to the HTML template
        template: String,
        /// Output filename relative to the output directory
        filename: String,
        /// Chunks injected into the document
        chunks: Vec<String>,
    },

    /// Compile-time identifier substitution
    Define {
        /// Identifier → code expression
        definitions: IndexMap<String, Expression>,
    },

    /// Marker attached to preload bundles in development so that their first
    /// build can be awaited before windows load
    EntryPointPreload {
        /// Unique listener name
        name: String,
    },

    /// Any other plugin supplied through user configuration
    Custom {
        /// Plugin identifier understood by the compiler
        name: String,
        /// Plugin-specific options
        #[serde(default, skip_serializing_if = "Value::is_null")]
        options: Value,
    },
}

impl Plugin {
    pub fn html(
        name: &str,
        template: impl Into<String>,
        additional_chunks: &[String],
    ) -> Self {
        let mut chunks = Vec::with_capacity(additional_chunks.len() + 1);
        chunks.push(name.to_string());
        chunks.extend(additional_chunks.iter().cloned());
        Plugin::Html {
            title: name.to_string(),
            template: template.into(),
            filename: format!("{}/index.html", name),
            chunks,
        }
    }

    pub fn define(definitions: IndexMap<String, Expression>) -> Self {
        Plugin::Define { definitions }
    }

    /// Name of the entry-point preload marker, if this is one
    pub fn preload_marker(&self) -> Option<&str> {
        match self {
            Plugin::EntryPointPreload { name } => Some(name),
            _ => None,
        }
    }
}
