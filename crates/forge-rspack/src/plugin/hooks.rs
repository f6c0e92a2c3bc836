//! Lifecycle callbacks invoked by the host build tool.

use std::fmt;
use std::future::Future;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;
use tokio::runtime::Handle;

use super::{ExitOptions, RspackPlugin};
use crate::error::Result;
use crate::packaging::{check_manifest_main, ForgeConfig, IgnoreFilter};
use crate::rebuild::{electron_version, RebuildRequest};

/// Host hooks the plugin registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookName {
    PrePackage,
    PostStart,
    ResolveForgeConfig,
    PackageAfterCopy,
}

impl HookName {
    pub const ALL: [HookName; 4] = [
        HookName::PrePackage,
        HookName::PostStart,
        HookName::ResolveForgeConfig,
        HookName::PackageAfterCopy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HookName::PrePackage => "prePackage",
            HookName::PostStart => "postStart",
            HookName::ResolveForgeConfig => "resolveForgeConfig",
            HookName::PackageAfterCopy => "packageAfterCopy",
        }
    }

    /// Task titles shown by the host while the hook runs
    pub fn titles(self) -> &'static [&'static str] {
        match self {
            HookName::PrePackage => &[
                RspackPlugin::PREPARE_NATIVE_DEPENDENCIES,
                RspackPlugin::BUILD_BUNDLES,
            ],
            _ => &[],
        }
    }
}

impl fmt::Display for HookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the launched application process ended
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChildExit {
    /// The host is about to relaunch it
    pub restarted: bool,
}

/// A titled unit of development startup work.
///
/// `run` resolves to optional output the host keeps on screen.
pub struct StartTask {
    pub title: &'static str,
    pub persistent_output: bool,
    pub run: BoxFuture<'static, Result<Option<String>>>,
}

impl fmt::Debug for StartTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartTask")
            .field("title", &self.title)
            .field("persistent_output", &self.persistent_output)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub enum StartOutcome {
    /// Development mode was started earlier in this process
    AlreadyStarted,
    Started { tasks: Vec<StartTask> },
}

impl RspackPlugin {
    pub const PREPARE_NATIVE_DEPENDENCIES: &'static str = "Preparing native dependencies";
    pub const BUILD_BUNDLES: &'static str = "Building rspack bundles";
    pub const COMPILE_MAIN_TASK: &'static str = "Compiling main process code";
    pub const LAUNCH_DEV_SERVERS_TASK: &'static str =
        "Launching dev servers for renderer process code";

    /// First `prePackage` step: switch to production, clear previous output
    /// and rebuild native modules for the project's Electron version.
    pub async fn prepare_native_dependencies(
        &self,
        forge: &ForgeConfig,
        platform: &str,
        arch: &str,
    ) -> Result<()> {
        self.set_prod(true);
        self.clean_output().await?;

        let manifest = self.read_manifest(&self.project_dir).await?;
        let version = electron_version(&self.project_dir, &manifest).await?;
        self.rebuilder
            .rebuild(RebuildRequest {
                project_dir: &self.project_dir,
                electron_version: &version,
                platform,
                arch,
                rebuild_config: &forge.rebuild_config,
            })
            .await?;
        Ok(())
    }

    /// Second `prePackage` step: one-shot main then renderer builds
    pub async fn build_bundles(&self) -> Result<()> {
        self.compile_main(false, None).await?;
        self.compile_renderers(false).await
    }

    pub async fn pre_package(&self, forge: &ForgeConfig, platform: &str, arch: &str) -> Result<()> {
        tracing::debug!(platform, arch, "{}", Self::PREPARE_NATIVE_DEPENDENCIES);
        self.prepare_native_dependencies(forge, platform, arch).await?;
        tracing::debug!("{}", Self::BUILD_BUNDLES);
        self.build_bundles().await
    }

    /// Watch the launched application. When it exits for good, release
    /// every resource and exit the process.
    ///
    /// Like [`RspackPlugin::init`], this does nothing outside a Tokio runtime.
    pub fn post_start<F>(self: &Arc<Self>, child_exit: F)
    where
        F: Future<Output = ChildExit> + Send + 'static,
    {
        let Ok(runtime) = Handle::try_current() else {
            tracing::debug!("no async runtime, electron process exit not hooked");
            return;
        };

        tracing::debug!("hooking electron process exit");
        let plugin = Arc::downgrade(self);
        let task = runtime.spawn(async move {
            let exit = child_exit.await;
            if exit.restarted {
                return;
            }
            if let Some(plugin) = plugin.upgrade() {
                plugin.exit_handler(
                    ExitOptions {
                        cleanup: true,
                        exit: true,
                    },
                    None,
                );
            }
        });
        self.track_task(task);
    }

    /// Install the packaging filter unless the host already has an ignore
    /// rule.
    pub fn resolve_forge_config(&self, mut forge: ForgeConfig) -> ForgeConfig {
        if let Some(existing) = &forge.packager_config.ignore {
            if !existing.is_predicate() {
                tracing::warn!(
                    "You have set packagerConfig.ignore, the Electron Forge rspack plugin normally \
                     sets this automatically. Your packaged app may be larger than expected if you \
                     don't ignore everything other than the '.rspack' folder"
                );
            }
            return forge;
        }

        forge.packager_config.ignore = Some(self.ignore_filter().into_rule());
        forge
    }

    pub fn ignore_filter(&self) -> IgnoreFilter {
        IgnoreFilter::new(self.config.package_source_maps, self.config.package_json_stats)
    }

    /// Rewrite the copied manifest: `main` must point into `.rspack/main`
    /// and the host's own configuration is stripped.
    pub async fn package_after_copy(&self, build_path: &Path) -> Result<()> {
        let mut manifest = self.read_manifest(&self.project_dir).await?;

        check_manifest_main(&manifest)?;

        if let Some(config) = manifest.get_mut("config").and_then(Value::as_object_mut) {
            config.remove("forge");
        }

        tokio::fs::write(
            build_path.join("package.json"),
            serde_json::to_string_pretty(&manifest)?,
        )
        .await?;
        tokio::fs::create_dir_all(build_path.join("node_modules")).await?;
        Ok(())
    }

    /// Development startup. Runs once per process.
    pub async fn start_logic(self: &Arc<Self>) -> Result<StartOutcome> {
        if self.already_started.swap(true, Ordering::SeqCst) {
            return Ok(StartOutcome::AlreadyStarted);
        }

        self.clean_output().await?;

        let logger = (self.logger_factory)(self.logger_port);
        self.track_logger(logger.clone());
        logger.start().await?;

        let main = {
            let plugin = Arc::clone(self);
            let logger = logger.clone();
            Box::pin(async move {
                plugin.compile_main(true, Some(&logger)).await?;
                Ok(None)
            }) as BoxFuture<'static, Result<Option<String>>>
        };
        let renderers = {
            let plugin = Arc::clone(self);
            Box::pin(async move {
                plugin.launch_renderer_dev_servers(&logger).await?;
                Ok(Some(format!("Output Available: {}\n", logger.url())))
            }) as BoxFuture<'static, Result<Option<String>>>
        };

        Ok(StartOutcome::Started {
            tasks: vec![
                StartTask {
                    title: Self::COMPILE_MAIN_TASK,
                    persistent_output: false,
                    run: main,
                },
                StartTask {
                    title: Self::LAUNCH_DEV_SERVERS_TASK,
                    persistent_output: true,
                    run: renderers,
                },
            ],
        })
    }

    async fn clean_output(&self) -> Result<()> {
        match tokio::fs::remove_dir_all(&self.base_dir).await {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }

    async fn read_manifest(&self, dir: &Path) -> Result<Value> {
        let content = tokio::fs::read_to_string(dir.join("package.json")).await?;
        Ok(serde_json::from_str(&content)?)
    }
}
