//! Dev server abstraction
//!
//! The HTTP dev server is an external collaborator. It is started from a
//! multi-configuration [`CompilerHandle`] plus an options object; the plugin
//! keeps the returned [`ServerHandle`] until teardown.

use std::path::Path;

use async_trait::async_trait;
use forge_rspack_config::merge_all;
use serde_json::{json, Map, Value};

use crate::compiler::CompilerHandle;

pub trait ServerHandle: Send + Sync {
    fn close(&self);
}

#[async_trait]
pub trait DevServer: Send + Sync {
    async fn start(
        &self,
        compiler: CompilerHandle,
        options: Value,
    ) -> anyhow::Result<Box<dyn ServerHandle>>;
}

/// Dev server options: built-in defaults, then `user` overrides, then the
/// options the plugin always controls (port, static root, exit signals and
/// the CSP header).
pub fn dev_server_options(
    user: &Map<String, Value>,
    port: u32,
    static_root: &Path,
    content_security_policy: &str,
) -> Value {
    let defaults = json!({
        "hot": true,
        "devMiddleware": { "writeToDisk": true },
        "historyApiFallback": true,
    });
    let overrides = json!({
        "port": port,
        "setupExitSignals": true,
        "static": static_root.to_string_lossy(),
        "headers": { "Content-Security-Policy": content_security_policy },
    });
    merge_all([defaults, Value::Object(user.clone()), overrides])
}
