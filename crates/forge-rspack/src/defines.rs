//! Cross-process constants injected into the main process bundle.
//!
//! For every entry point the main bundle gets two define substitutions,
//! `<NAME>_RSPACK_ENTRY` (where the window's document or script lives) and
//! `<NAME>_PRELOAD_RSPACK_ENTRY` (where its preload script lives), each also
//! available as `process.env.<...>`.
//!
//! In development the values point at the dev server and the in-progress
//! build directory. In production they are expressions resolved at runtime
//! relative to the running bundle, so they survive packaging relocation.

use std::path::{Path, PathBuf};

use forge_rspack_config::{EntryPoint, EntryPointKind, Expression, Mode};
use indexmap::IndexMap;

const BODY_SUFFIX: &str = "_RSPACK_ENTRY";
const PRELOAD_SUFFIX: &str = "_PRELOAD_RSPACK_ENTRY";

/// `"My Window"` → `"MY_WINDOW"`
pub fn constant_prefix(name: &str) -> String {
    name.to_uppercase().replace(' ', "_")
}

pub fn body_constant(name: &str) -> String {
    format!("{}{}", constant_prefix(name), BODY_SUFFIX)
}

pub fn preload_constant(name: &str) -> String {
    format!("{}{}", constant_prefix(name), PRELOAD_SUFFIX)
}

#[derive(Debug, Clone)]
pub struct ConstantInjector {
    mode: Mode,
    port: u32,
    rspack_dir: PathBuf,
    in_renderer_dir: bool,
}

impl ConstantInjector {
    pub fn new(mode: Mode, port: u32, rspack_dir: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            port,
            rspack_dir: rspack_dir.into(),
            in_renderer_dir: true,
        }
    }

    /// Resolve production documents next to the main bundle (`.`) instead of
    /// under `renderer`.
    pub fn beside_main(mut self) -> Self {
        self.in_renderer_dir = false;
        self
    }

    pub fn rspack_dir(&self) -> &Path {
        &self.rspack_dir
    }

    /// All constants for `entries`, in entry order.
    pub fn defines(&self, entries: &[EntryPoint]) -> IndexMap<String, Expression> {
        let mut defines = IndexMap::with_capacity(entries.len() * 4);
        for entry in entries {
            let body_key = body_constant(&entry.name);
            let body = self.body_expression(entry);
            defines.insert(format!("process.env.{body_key}"), body.clone());
            defines.insert(body_key, body);

            let preload_key = preload_constant(&entry.name);
            let preload = self.preload_expression(entry);
            defines.insert(format!("process.env.{preload_key}"), preload.clone());
            defines.insert(preload_key, preload);
        }
        defines
    }

    /// Where the entry's document (or script, for headless entries) lives
    pub fn body_expression(&self, entry: &EntryPoint) -> Expression {
        let basename = match entry.kind {
            EntryPointKind::LocalWindow { .. } => "index.html",
            _ => "index.js",
        };

        if self.mode.is_production() {
            let dir = if self.in_renderer_dir { "renderer" } else { "." };
            return Expression::raw(format!(
                "`file://${{require('path').resolve(__dirname, '..', '{dir}', '{}', '{basename}')}}`",
                escape_segment(&entry.name)
            ));
        }

        let base_url = format!("http://localhost:{}/{}", self.port, entry.name);
        if basename == "index.html" {
            Expression::string_literal(&base_url)
        } else {
            Expression::string_literal(&format!("{base_url}/{basename}"))
        }
    }

    /// Where the entry's preload script lives, or `undefined`
    pub fn preload_expression(&self, entry: &EntryPoint) -> Expression {
        if entry.preload().is_none() {
            return Expression::undefined();
        }

        if self.mode.is_production() {
            return Expression::raw(format!(
                "require('path').resolve(__dirname, '../renderer', '{}', 'preload.js')",
                escape_segment(&entry.name)
            ));
        }

        let path = self
            .rspack_dir
            .join("renderer")
            .join(&entry.name)
            .join("preload.js");
        Expression::string_literal(&path.to_string_lossy())
    }
}

/// Escape a value placed between single quotes inside generated code
fn escape_segment(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
