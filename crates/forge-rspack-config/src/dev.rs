//! Development server defaults and port validation.

use crate::error::{ConfigError, Result};

/// Port the renderer dev server listens on unless configured
pub const DEFAULT_PORT: u32 = 3000;

/// Port of the multiplexed log viewer unless configured
pub const DEFAULT_LOGGER_PORT: u32 = 9000;

/// Content-Security-Policy sent by the dev server.
///
/// Development source maps are built with `eval-source-map`, which needs
/// `'unsafe-eval'`.
pub const DEFAULT_CONTENT_SECURITY_POLICY: &str =
    "default-src 'self' 'unsafe-inline' data:; script-src 'self' 'unsafe-eval' 'unsafe-inline' data:";

const MIN_UNPRIVILEGED_PORT: u32 = 1024;
const MAX_PORT: u32 = 65535;

/// Reject ports below 1024 or above 65535.
///
/// `field` names the option in the error message, e.g. `"port"`.
///
/// ```
/// use forge_rspack_config::validate_port;
///
/// assert!(validate_port("port", 3001).is_ok());
/// assert!(validate_port("port", 80).is_err());
/// assert!(validate_port("port", 70000).is_err());
/// ```
pub fn validate_port(field: &'static str, port: u32) -> Result<()> {
    if port < MIN_UNPRIVILEGED_PORT {
        return Err(ConfigError::PrivilegedPort { field, port });
    }
    if port > MAX_PORT {
        return Err(ConfigError::InvalidPort { field, port });
    }
    Ok(())
}
