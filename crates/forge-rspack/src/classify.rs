//! Entry point classification.
//!
//! Every entry point is sorted into isolation buckets by its resolved
//! `nodeIntegration` flag. A window or headless body lands in exactly one of
//! [`RendererTarget::Web`] / [`RendererTarget::ElectronRenderer`]; a preload
//! script lands in exactly one of [`RendererTarget::ElectronPreload`] /
//! [`RendererTarget::SandboxedPreload`]. Body and preload are always decided
//! by the same resolved flag.

use std::fmt;

use forge_rspack_config::{EntryPoint, Target};

/// Isolation bucket for renderer-side bundles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RendererTarget {
    /// Sandboxed window, no Node.js access
    Web,
    /// Node-integrated window
    ElectronRenderer,
    /// Preload running with full Node.js access
    ElectronPreload,
    /// Preload for a sandboxed window; Node built-ins stay external
    SandboxedPreload,
}

impl RendererTarget {
    /// Buckets in the order their configurations are emitted
    pub const ALL: [RendererTarget; 4] = [
        RendererTarget::Web,
        RendererTarget::ElectronRenderer,
        RendererTarget::ElectronPreload,
        RendererTarget::SandboxedPreload,
    ];

    /// Bucket of a window body for a resolved `nodeIntegration` flag
    pub fn window(node_integration: bool) -> Self {
        if node_integration {
            RendererTarget::ElectronRenderer
        } else {
            RendererTarget::Web
        }
    }

    /// Bucket of a preload script for a resolved `nodeIntegration` flag
    pub fn preload(node_integration: bool) -> Self {
        if node_integration {
            RendererTarget::ElectronPreload
        } else {
            RendererTarget::SandboxedPreload
        }
    }

    /// Compiler target. `Web` and `SandboxedPreload` share `web`.
    pub fn target(self) -> Target {
        match self {
            RendererTarget::Web | RendererTarget::SandboxedPreload => Target::Web,
            RendererTarget::ElectronRenderer => Target::ElectronRenderer,
            RendererTarget::ElectronPreload => Target::ElectronPreload,
        }
    }

    pub fn is_preload(self) -> bool {
        matches!(
            self,
            RendererTarget::ElectronPreload | RendererTarget::SandboxedPreload
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RendererTarget::Web => "web",
            RendererTarget::ElectronRenderer => "electron-renderer",
            RendererTarget::ElectronPreload => "electron-preload",
            RendererTarget::SandboxedPreload => "sandboxed-preload",
        }
    }

    fn index(self) -> usize {
        match self {
            RendererTarget::Web => 0,
            RendererTarget::ElectronRenderer => 1,
            RendererTarget::ElectronPreload => 2,
            RendererTarget::SandboxedPreload => 3,
        }
    }
}

impl fmt::Display for RendererTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry points partitioned by bucket, each bucket in source order.
///
/// Entries in a preload bucket always carry a preload script.
#[derive(Debug, Default)]
pub struct Buckets<'a> {
    buckets: [Vec<&'a EntryPoint>; 4],
}

impl<'a> Buckets<'a> {
    pub fn get(&self, target: RendererTarget) -> &[&'a EntryPoint] {
        &self.buckets[target.index()]
    }

    /// Non-empty buckets in emission order
    pub fn iter(&self) -> impl Iterator<Item = (RendererTarget, &[&'a EntryPoint])> + '_ {
        RendererTarget::ALL
            .into_iter()
            .map(move |target| (target, self.get(target)))
            .filter(|(_, entries)| !entries.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    fn push(&mut self, target: RendererTarget, entry: &'a EntryPoint) {
        self.buckets[target.index()].push(entry);
    }
}

/// Partition entry points into the four buckets.
///
/// `renderer_node_integration` is the renderer-wide default applied to
/// entries that leave `nodeIntegration` unset.
pub fn classify(entries: &[EntryPoint], renderer_node_integration: Option<bool>) -> Buckets<'_> {
    let mut buckets = Buckets::default();

    for entry in entries {
        let node_integration = entry.resolved_node_integration(renderer_node_integration);

        if !entry.is_preload_only() {
            buckets.push(RendererTarget::window(node_integration), entry);
        }
        if entry.preload().is_some() {
            buckets.push(RendererTarget::preload(node_integration), entry);
        }
    }

    buckets
}
