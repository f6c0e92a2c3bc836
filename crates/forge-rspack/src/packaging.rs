//! Packaging file filter and the slice of the host build configuration the
//! plugin touches.

use std::fmt;
use std::sync::{Arc, LazyLock};

use forge_rspack_config::ConfigError;
use regex::Regex;
use serde_json::Value;

static STATS_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[/\\]\.rspack[/\\](main|renderer)[/\\]stats(-[^/\\]+)?\.json$")
        .expect("stats file pattern is valid")
});

static SOURCE_MAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^/\\]+\.js\.map$").expect("source map pattern is valid")
});

static OUTPUT_ROOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[/\\]\.rspack($|[/\\])").expect("output root pattern is valid")
});

/// Decides which files of the application directory are left out of the
/// package.
///
/// Paths are relative to the application root with a leading separator, as
/// the host packager reports them.
///
/// ```
/// use forge_rspack::IgnoreFilter;
///
/// let filter = IgnoreFilter::default();
/// assert!(!filter.is_ignored("/.rspack/main/index.js"));
/// assert!(filter.is_ignored("/.rspack/renderer/stats-main_window.json"));
/// assert!(filter.is_ignored("/src/index.ts"));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IgnoreFilter {
    pub package_source_maps: bool,
    pub package_json_stats: bool,
}

impl IgnoreFilter {
    pub fn new(package_source_maps: bool, package_json_stats: bool) -> Self {
        Self {
            package_source_maps,
            package_json_stats,
        }
    }

    pub fn is_ignored(&self, file: &str) -> bool {
        if file.is_empty() {
            return false;
        }
        if !self.package_json_stats && STATS_FILE.is_match(file) {
            return true;
        }
        if !self.package_source_maps && SOURCE_MAP.is_match(file) {
            return true;
        }
        !OUTPUT_ROOT.is_match(file)
    }

    pub fn into_rule(self) -> IgnoreRule {
        IgnoreRule::Predicate(Arc::new(move |file| self.is_ignored(file)))
    }
}

/// How the host packager excludes files
#[derive(Clone)]
pub enum IgnoreRule {
    /// Files matching any pattern are excluded
    Patterns(Vec<Regex>),
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl IgnoreRule {
    pub fn is_ignored(&self, file: &str) -> bool {
        match self {
            IgnoreRule::Patterns(patterns) => patterns.iter().any(|p| p.is_match(file)),
            IgnoreRule::Predicate(predicate) => predicate(file),
        }
    }

    pub fn is_predicate(&self) -> bool {
        matches!(self, IgnoreRule::Predicate(_))
    }
}

impl fmt::Debug for IgnoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreRule::Patterns(patterns) => f
                .debug_tuple("Patterns")
                .field(&patterns.iter().map(Regex::as_str).collect::<Vec<_>>())
                .finish(),
            IgnoreRule::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PackagerConfig {
    pub ignore: Option<IgnoreRule>,
}

/// Host build configuration as seen by the plugin
#[derive(Debug, Clone, Default)]
pub struct ForgeConfig {
    pub packager_config: PackagerConfig,
    /// Options for the native dependency rebuild, passed through untouched
    pub rebuild_config: Value,
}

/// The manifest `main` field must point at the main process output.
pub fn check_manifest_main(manifest: &Value) -> Result<(), ConfigError> {
    let points_at_output = manifest["main"]
        .as_str()
        .is_some_and(|main| main.ends_with(".rspack/main"));
    if points_at_output {
        return Ok(());
    }
    let found = serde_json::to_string(&manifest["main"])?;
    Err(ConfigError::ManifestMain { found })
}
