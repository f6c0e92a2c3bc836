#![allow(dead_code)]

use std::fs;
use std::path::Path;

use serde_json::{json, Value};
use tempfile::TempDir;

/// A project with one sandboxed window carrying a preload and one
/// node-integrated window.
pub fn project(main: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    for file in [
        "src/main.js",
        "src/index.html",
        "src/renderer.js",
        "src/preload.js",
        "src/about.html",
        "src/about.js",
    ] {
        write(root, file, "");
    }

    write_json(
        root,
        "forge-rspack.json",
        &json!({
            "mainConfig": { "entry": "./src/main.js" },
            "renderer": {
                "config": {},
                "entryPoints": [
                    {
                        "name": "main_window",
                        "html": "./src/index.html",
                        "js": "./src/renderer.js",
                        "preload": { "js": "./src/preload.js" }
                    },
                    {
                        "name": "about",
                        "html": "./src/about.html",
                        "js": "./src/about.js",
                        "nodeIntegration": true
                    }
                ]
            }
        }),
    );
    write_json(root, "package.json", &json!({ "name": "app", "main": main }));

    temp
}

pub fn write(root: &Path, file: &str, content: &str) {
    let path = root.join(file);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

pub fn write_json(root: &Path, file: &str, value: &Value) {
    write(root, file, &serde_json::to_string_pretty(value).unwrap());
}
