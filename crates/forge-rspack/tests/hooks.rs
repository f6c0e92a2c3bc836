//! Host lifecycle hooks: packaging preparation, filter installation and
//! manifest rewriting.

mod support;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use forge_rspack::{
    ChildExit, ConfigError, ForgeConfig, HookName, IgnoreRule, Mode, PackagerConfig, PluginError,
    RspackPlugin,
};
use regex::Regex;
use serde_json::{json, Value};
use support::{app_config, harness, plugin_config, write_manifest, FakeCompiler};
use tempfile::TempDir;

#[tokio::test]
async fn pre_package_prepares_natives_then_builds_for_production() {
    let dir = TempDir::new().unwrap();
    write_manifest(dir.path(), ".rspack/main");
    std::fs::create_dir_all(dir.path().join(".rspack/renderer/stale")).unwrap();

    let h = harness(app_config(), dir.path(), FakeCompiler::new());
    let forge = ForgeConfig {
        rebuild_config: json!({ "onlyModules": ["sqlite3"] }),
        ..Default::default()
    };

    h.plugin.pre_package(&forge, "darwin", "arm64").await.unwrap();

    assert!(h.plugin.is_prod());
    assert!(!dir.path().join(".rspack/renderer/stale").exists());

    let requests = h.rebuilder.requests.lock();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].electron_version, "28.1.0");
    assert_eq!(requests[0].platform, "darwin");
    assert_eq!(requests[0].arch, "arm64");
    assert_eq!(requests[0].rebuild_config, json!({ "onlyModules": ["sqlite3"] }));

    let runs = h.compiler.runs.lock();
    assert_eq!(runs.len(), 2);
    assert!(runs.iter().flatten().all(|c| c.mode == Some(Mode::Production)));
}

#[tokio::test]
async fn pre_package_requires_electron_dependency() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("package.json"), r#"{ "name": "app" }"#).unwrap();

    let h = harness(app_config(), dir.path(), FakeCompiler::new());
    let err = h
        .plugin
        .pre_package(&ForgeConfig::default(), "linux", "x64")
        .await
        .unwrap_err();

    assert!(matches!(err, PluginError::ElectronVersion(_)));
    assert!(h.compiler.runs.lock().is_empty());
}

#[test]
fn resolve_forge_config_installs_packaging_filter() {
    let h = harness(app_config(), std::path::Path::new("/p"), FakeCompiler::new());

    let forge = h.plugin.resolve_forge_config(ForgeConfig::default());
    let ignore = forge.packager_config.ignore.unwrap();

    assert!(ignore.is_predicate());
    assert!(ignore.is_ignored("/build/.rspack/renderer/stats.json"));
    assert!(ignore.is_ignored("/.rspack/main/index.js.map"));
    assert!(ignore.is_ignored("/src/main.ts"));
    assert!(!ignore.is_ignored("/.rspack/main/index.js"));
    assert!(!ignore.is_ignored("/.rspack/renderer/main_window/index.html"));
}

#[test]
fn packaging_options_are_honoured() {
    let config = plugin_config(json!({
        "packageSourceMaps": true,
        "packageJsonStats": true
    }));
    let h = harness(config, std::path::Path::new("/p"), FakeCompiler::new());

    let filter = h.plugin.ignore_filter();
    assert!(!filter.is_ignored("/.rspack/main/index.js.map"));
    assert!(!filter.is_ignored("/.rspack/main/stats-main.json"));
}

#[test]
fn existing_ignore_rule_is_kept() {
    let h = harness(app_config(), std::path::Path::new("/p"), FakeCompiler::new());
    let forge = ForgeConfig {
        packager_config: PackagerConfig {
            ignore: Some(IgnoreRule::Patterns(vec![Regex::new(r"^/docs").unwrap()])),
        },
        ..Default::default()
    };

    let forge = h.plugin.resolve_forge_config(forge);
    let ignore = forge.packager_config.ignore.unwrap();
    assert!(!ignore.is_predicate());
    assert!(ignore.is_ignored("/docs/readme.md"));
    assert!(!ignore.is_ignored("/src/main.ts"));
}

#[tokio::test]
async fn package_after_copy_rewrites_manifest() {
    let project = TempDir::new().unwrap();
    let build = TempDir::new().unwrap();
    write_manifest(project.path(), ".rspack/main");

    let h = harness(app_config(), project.path(), FakeCompiler::new());
    h.plugin.package_after_copy(build.path()).await.unwrap();

    let written = std::fs::read_to_string(build.path().join("package.json")).unwrap();
    assert!(written.contains("\n  \"name\": \"app\""), "pretty printed: {written}");

    let manifest: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(manifest["main"], json!(".rspack/main"));
    assert!(manifest["config"].get("forge").is_none());
    assert_eq!(manifest["config"]["theme"], json!("dark"));
    assert!(build.path().join("node_modules").is_dir());
}

#[tokio::test]
async fn package_after_copy_rejects_foreign_main() {
    let project = TempDir::new().unwrap();
    let build = TempDir::new().unwrap();
    write_manifest(project.path(), "src/index.js");

    let h = harness(app_config(), project.path(), FakeCompiler::new());
    let err = h.plugin.package_after_copy(build.path()).await.unwrap_err();

    match err {
        PluginError::Config(ConfigError::ManifestMain { found }) => {
            assert_eq!(found, "\"src/index.js\"");
        }
        other => panic!("expected manifest error, got {other:?}"),
    }
    assert!(!build.path().join("package.json").exists());
}

#[tokio::test]
async fn restarted_child_keeps_resources_alive() {
    let dir = TempDir::new().unwrap();
    let h = harness(app_config(), dir.path(), FakeCompiler::new());
    h.plugin.compile_main(true, None).await.unwrap();

    h.plugin.post_start(async { ChildExit { restarted: true } });
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    assert_eq!(h.compiler.watchers_closed.load(Ordering::SeqCst), 0);
}

#[test]
fn post_start_without_a_runtime_does_not_watch_the_child() {
    let dir = TempDir::new().unwrap();
    let h = harness(app_config(), dir.path(), FakeCompiler::new());
    let polled = Arc::new(AtomicBool::new(false));

    let flag = polled.clone();
    h.plugin.post_start(async move {
        flag.store(true, Ordering::SeqCst);
        ChildExit { restarted: true }
    });

    assert!(!polled.load(Ordering::SeqCst));
    drop(h);
}

#[test]
fn pre_package_task_titles() {
    assert_eq!(
        HookName::PrePackage.titles(),
        [
            RspackPlugin::PREPARE_NATIVE_DEPENDENCIES,
            RspackPlugin::BUILD_BUNDLES
        ]
    );
    assert_eq!(HookName::PackageAfterCopy.as_str(), "packageAfterCopy");
    assert!(HookName::ALL.iter().all(|hook| !hook.to_string().is_empty()));
}
