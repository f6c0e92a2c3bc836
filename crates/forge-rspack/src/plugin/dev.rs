use std::collections::BTreeSet;
use std::sync::Arc;

use forge_rspack_config::{BundlerConfig, Plugin};
use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::oneshot;

use super::RspackPlugin;
use crate::classify::RendererTarget;
use crate::compiler::{CompileEvent, MultiCompiler};
use crate::dev_server::dev_server_options;
use crate::error::{CompileError, ProcessKind, Result};
use crate::logger::{LogTab, Logger};

impl RspackPlugin {
    /// Serve every renderer and preload bundle from one multi-configuration
    /// compiler behind the dev server.
    ///
    /// Returns once the server is up and every preload bundle has finished
    /// its first build, so windows never load before their preload exists.
    pub async fn launch_renderer_dev_servers(&self, logger: &Arc<dyn Logger>) -> Result<()> {
        let generator = self.config_generator();
        let targeted = generator.targeted_renderer_configs().await?;
        if targeted.is_empty() {
            return Ok(());
        }

        let (configs, tabs, preloads) = prepare_dev_configs(targeted, &**logger);

        let MultiCompiler { handle, events } =
            self.compiler.multi(configs).map_err(|source| CompileError::Fatal {
                process: ProcessKind::Renderer,
                source,
            })?;

        let (ready_tx, ready_rx) = oneshot::channel();
        self.track_task(tokio::spawn(route_dev_events(events, tabs, preloads, ready_tx)));

        let options = dev_server_options(
            &self.config.dev_server,
            self.port,
            &self.base_dir.join("renderer"),
            self.config.content_security_policy(),
        );
        let server = self.dev_server.start(handle, options).await?;
        self.track_server(server);

        ready_rx
            .await
            .unwrap_or(Err(CompileError::Closed(ProcessKind::Preload)))?;
        Ok(())
    }
}

/// Attach a log tab to every configuration and a uniquely named preload
/// marker to every preload configuration, and silence the compiler's own
/// output. Returns the configurations, their tabs and the indexes of the
/// preload configurations.
fn prepare_dev_configs(
    targeted: Vec<(RendererTarget, BundlerConfig)>,
    logger: &dyn Logger,
) -> (Vec<BundlerConfig>, Vec<Arc<dyn LogTab>>, BTreeSet<usize>) {
    let mut configs = Vec::with_capacity(targeted.len());
    let mut tabs = Vec::with_capacity(targeted.len());
    let mut preloads = BTreeSet::new();
    let mut marker_names: Vec<String> = Vec::new();
    let mut collisions = 0;

    for (index, (renderer_target, mut config)) in targeted.into_iter().enumerate() {
        let target = config.known_target().unwrap_or_else(|| renderer_target.target());
        tabs.push(logger.create_tab(&format!("Renderer Target Bundle ({target})")));

        if config.is_preload_bundle() {
            let mut name = format!("entry-point-preload-{target}");
            if marker_names.contains(&name) {
                collisions += 1;
                name = format!("{name}-{collisions}");
            }
            config.plugins.push(Plugin::EntryPointPreload { name: name.clone() });
            marker_names.push(name);
            preloads.insert(index);
        }

        config.infrastructure_logging = Some(json!({ "level": "none" }));
        config.stats = Some(json!("none"));
        configs.push(config);
    }

    (configs, tabs, preloads)
}

/// Forward compiler results to their tabs and settle `ready` once every
/// preload configuration has reported its first build.
async fn route_dev_events(
    mut events: UnboundedReceiver<CompileEvent>,
    tabs: Vec<Arc<dyn LogTab>>,
    mut pending: BTreeSet<usize>,
    ready: oneshot::Sender<Result<(), CompileError>>,
) {
    let mut ready = Some(ready);
    if pending.is_empty() {
        settle(&mut ready, Ok(()));
    }

    while let Some(event) = events.recv().await {
        let index = event.index();
        let first_preload_build = pending.remove(&index);

        let outcome = match event {
            CompileEvent::Done { stats, .. } => {
                if let Some(tab) = tabs.get(index) {
                    tab.log(&stats.report);
                }
                if stats.has_errors() {
                    Err(CompileError::Stats {
                        process: ProcessKind::Preload,
                        report: stats.report,
                    })
                } else {
                    Ok(())
                }
            }
            CompileEvent::Failed { error, .. } => {
                if let Some(tab) = tabs.get(index) {
                    tab.log(&format!("{error:#}"));
                }
                Err(CompileError::Fatal {
                    process: ProcessKind::Preload,
                    source: error,
                })
            }
        };

        if !first_preload_build {
            continue;
        }
        match outcome {
            Err(err) => settle(&mut ready, Err(err)),
            Ok(()) if pending.is_empty() => settle(&mut ready, Ok(())),
            Ok(()) => {}
        }
    }
}

fn settle(
    ready: &mut Option<oneshot::Sender<Result<(), CompileError>>>,
    outcome: Result<(), CompileError>,
) {
    if let Some(sender) = ready.take() {
        // The launcher may already have given up waiting
        let _ = sender.send(outcome);
    }
}
