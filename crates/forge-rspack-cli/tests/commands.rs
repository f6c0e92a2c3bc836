//! Command implementations driven directly, without spawning the binary.

mod support;

use forge_rspack::{ConfigError, PluginError};
use forge_rspack_cli::cli::{CheckArgs, ModeArg};
use forge_rspack_cli::commands::check;
use forge_rspack_cli::CliError;
use serde_json::json;
use support::{project, write_json};

fn check_args(root: &std::path::Path) -> CheckArgs {
    CheckArgs {
        cwd: Some(root.to_path_buf()),
        config: None,
        skip_files: false,
    }
}

#[tokio::test]
async fn test_check_accepts_valid_project() {
    let temp = project(".rspack/main");
    check::execute(check_args(temp.path())).await.unwrap();
}

#[tokio::test]
async fn test_check_rejects_foreign_main() {
    let temp = project("src/main.js");

    let err = check::execute(check_args(temp.path())).await.unwrap_err();
    match err {
        CliError::Config(ConfigError::ManifestMain { found }) => {
            assert_eq!(found, "\"src/main.js\"");
        }
        other => panic!("expected manifest error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_check_without_manifest_only_warns() {
    let temp = project(".rspack/main");
    std::fs::remove_file(temp.path().join("package.json")).unwrap();

    check::execute(check_args(temp.path())).await.unwrap();
}

#[tokio::test]
async fn test_check_reports_missing_files() {
    let temp = project(".rspack/main");
    std::fs::remove_file(temp.path().join("src/preload.js")).unwrap();

    let err = check::execute(check_args(temp.path())).await.unwrap_err();
    assert!(matches!(
        err,
        CliError::Config(ConfigError::EntryFileNotFound { ref name, .. }) if name == "main_window"
    ));

    let mut args = check_args(temp.path());
    args.skip_files = true;
    check::execute(args).await.unwrap();
}

#[tokio::test]
async fn test_check_requires_main_entry() {
    let temp = project(".rspack/main");
    write_json(
        temp.path(),
        "forge-rspack.json",
        &json!({ "mainConfig": { "target": "electron-main" } }),
    );

    let err = check::execute(check_args(temp.path())).await.unwrap_err();
    assert!(matches!(
        err,
        CliError::Plugin(PluginError::Config(ConfigError::MissingField { .. }))
    ));
}

#[tokio::test]
async fn test_check_rejects_privileged_port() {
    let temp = project(".rspack/main");
    write_json(
        temp.path(),
        "rspack.json",
        &json!({ "mainConfig": { "entry": "./src/main.js" }, "port": 80 }),
    );

    let mut args = check_args(temp.path());
    args.config = Some("rspack.json".into());
    let err = check::execute(args).await.unwrap_err();
    assert!(matches!(
        err,
        CliError::Config(ConfigError::PrivilegedPort { port: 80, .. })
    ));
}

#[test]
fn test_mode_arg_maps_to_mode() {
    assert_eq!(forge_rspack::Mode::from(ModeArg::Production), forge_rspack::Mode::Production);
}
