//! One-shot (production) builds and resource teardown.

mod support;

use std::sync::atomic::Ordering;

use forge_rspack::{
    CompileError, ConfigError, Mode, PluginError, ProcessKind, RspackPlugin, Target, WatchEvent,
};
use serde_json::json;
use support::{app_config, harness, plugin_config, FakeCompiler, FakeDevServer};
use tempfile::TempDir;

#[tokio::test]
async fn production_build_runs_main_then_batched_renderers() {
    let dir = TempDir::new().unwrap();
    let h = harness(app_config(), dir.path(), FakeCompiler::new());
    h.plugin.set_prod(true);

    h.plugin.build_bundles().await.unwrap();

    let runs = h.compiler.runs.lock();
    assert_eq!(runs.len(), 2, "main and one batched renderer run");
    assert_eq!(runs[0][0].known_target(), Some(Target::ElectronMain));
    assert!(runs.iter().flatten().all(|c| c.mode == Some(Mode::Production)));

    // main_window window (sandboxed), about (node integrated), main_window preload
    let renderer_targets: Vec<_> = runs[1].iter().map(|c| c.known_target()).collect();
    assert_eq!(
        renderer_targets,
        [Some(Target::Web), Some(Target::ElectronRenderer), Some(Target::Web)]
    );
}

#[tokio::test]
async fn json_stats_are_written_per_bundle() {
    let dir = TempDir::new().unwrap();
    let h = harness(app_config(), dir.path(), FakeCompiler::new());
    h.plugin.set_prod(true);

    h.plugin.build_bundles().await.unwrap();

    let rspack = dir.path().join(".rspack");
    let main: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(rspack.join("main/stats-main.json")).unwrap())
            .unwrap();
    assert_eq!(main["name"], json!("main"));

    for file in [
        "stats-main_window.json",
        "stats-about.json",
        "stats-main_window-preload.json",
    ] {
        assert!(rspack.join("renderer").join(file).is_file(), "{file}");
    }
}

#[tokio::test]
async fn renderer_stats_errors_fail_the_build() {
    let dir = TempDir::new().unwrap();
    let compiler = FakeCompiler::with_errors(|config| {
        if config.entry_names().contains(&"about") {
            vec!["Module not found: ./src/missing.js".to_string()]
        } else {
            Vec::new()
        }
    });
    let h = harness(app_config(), dir.path(), compiler);
    h.plugin.set_prod(true);

    let err = h.plugin.compile_renderers(false).await.unwrap_err();
    match err {
        PluginError::Compile(CompileError::Stats { process, report }) => {
            assert_eq!(process, ProcessKind::Renderer);
            assert!(report.contains("Module not found: ./src/missing.js"));
        }
        other => panic!("expected renderer stats error, got {other:?}"),
    }

    // Stats land on disk before the failure is reported
    assert!(dir.path().join(".rspack/renderer/stats-about.json").is_file());
}

#[tokio::test]
async fn renderer_stats_errors_are_tolerated_while_watching() {
    let dir = TempDir::new().unwrap();
    let compiler = FakeCompiler::with_errors(|_| vec!["boom".to_string()]);
    let h = harness(app_config(), dir.path(), compiler);

    h.plugin.compile_renderers(true).await.unwrap();
}

#[tokio::test]
async fn main_stats_errors_fail_one_shot_builds() {
    let dir = TempDir::new().unwrap();
    let compiler = FakeCompiler::with_errors(|config| {
        if config.known_target() == Some(Target::ElectronMain) {
            vec!["SyntaxError".to_string()]
        } else {
            Vec::new()
        }
    });
    let h = harness(app_config(), dir.path(), compiler);

    let err = h.plugin.compile_main(false, None).await.unwrap_err();
    assert!(err
        .to_string()
        .starts_with("Compilation errors in the main process: "));
}

#[tokio::test]
async fn fatal_compiler_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    let h = harness(app_config(), dir.path(), FakeCompiler::failing("out of memory"));

    let err = h.plugin.compile_main(false, None).await.unwrap_err();
    assert!(matches!(
        err,
        PluginError::Compile(CompileError::Fatal {
            process: ProcessKind::Main,
            ..
        })
    ));
}

#[tokio::test]
async fn no_renderer_entry_points_skips_renderer_compilation() {
    let dir = TempDir::new().unwrap();
    let config = plugin_config(json!({ "mainConfig": { "entry": "./src/main.js" } }));
    let h = harness(config, dir.path(), FakeCompiler::new());

    h.plugin.build_bundles().await.unwrap();

    assert_eq!(h.compiler.runs.lock().len(), 1);
}

#[tokio::test]
async fn missing_main_entry_fails_before_compiling() {
    let dir = TempDir::new().unwrap();
    let config = plugin_config(json!({ "mainConfig": { "target": "electron-main" } }));
    let h = harness(config, dir.path(), FakeCompiler::new());

    let err = h.plugin.compile_main(false, None).await.unwrap_err();
    assert!(matches!(
        err,
        PluginError::Config(ConfigError::MissingField { .. })
    ));
    assert!(h.compiler.runs.lock().is_empty());
}

#[tokio::test]
async fn watch_mode_resolves_on_first_build_even_with_errors() {
    let dir = TempDir::new().unwrap();
    let compiler = FakeCompiler::with_errors(|_| vec!["type error".to_string()]);
    let h = harness(app_config(), dir.path(), compiler);

    h.plugin.compile_main(true, None).await.unwrap();
    assert_eq!(h.compiler.watched.lock().len(), 1);

    // Later failures do not tear anything down
    h.compiler
        .rebuild_main(WatchEvent::Failed(anyhow::anyhow!("disk full")));
    tokio::task::yield_now().await;
    assert_eq!(h.compiler.watchers_closed.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn watch_mode_rejects_fatal_first_build() {
    let dir = TempDir::new().unwrap();
    let h = harness(app_config(), dir.path(), FakeCompiler::failing("bad config"));

    let err = h.plugin.compile_main(true, None).await.unwrap_err();
    assert!(err.to_string().contains("bad config"));
}

#[tokio::test]
async fn teardown_closes_watchers_once() {
    let dir = TempDir::new().unwrap();
    let h = harness(app_config(), dir.path(), FakeCompiler::new());

    h.plugin.compile_main(true, None).await.unwrap();
    h.plugin.teardown();
    h.plugin.teardown();

    assert_eq!(h.compiler.watchers_closed.load(Ordering::SeqCst), 1);
}

#[test]
fn privileged_ports_are_rejected_at_construction() {
    let config = plugin_config(json!({}));
    let mut bad = config.clone();
    bad.port = Some(80);

    let err = RspackPlugin::new(
        bad,
        "/p",
        std::sync::Arc::new(FakeCompiler::new()),
        std::sync::Arc::new(FakeDevServer::default()),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        PluginError::Config(ConfigError::PrivilegedPort { port: 80, .. })
    ));

    let mut good = config;
    good.port = Some(3001);
    let plugin = RspackPlugin::new(
        good,
        "/p",
        std::sync::Arc::new(FakeCompiler::new()),
        std::sync::Arc::new(FakeDevServer::default()),
    )
    .unwrap();
    assert_eq!(plugin.port(), 3001);
}
