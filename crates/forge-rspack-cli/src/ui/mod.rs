//! Terminal status output.
//!
//! Messages go to stderr; stdout is reserved for command output such as the
//! JSON printed by `inspect`.
//!
//! # Examples
//!
//! ```no_run
//! use forge_rspack_cli::ui;
//!
//! ui::init_colors(false);
//! ui::success("Configuration is valid");
//! ui::warning("package.json not found");
//! ```

mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

pub use messages::{debug, error, info, success, warning};

static COLORS: AtomicBool = AtomicBool::new(false);

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI", "TRAVIS"]
        .iter()
        .any(|var| std::env::var_os(var).is_some())
}

/// Check if color output should be enabled.
///
/// Respects `NO_COLOR` and `FORCE_COLOR`, falls back to terminal detection.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::user_attended_stderr() && !is_ci()
}

/// Initialize color support based on environment and the `--no-color` flag.
///
/// Should be called early in `main`.
pub fn init_colors(no_color: bool) {
    COLORS.store(!no_color && should_use_color(), Ordering::Relaxed);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}
