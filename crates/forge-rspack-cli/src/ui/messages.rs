//! Status message functions for terminal output.

use owo_colors::{OwoColorize, Style};

use super::colors_enabled;

fn paint(style: Style) -> Style {
    if colors_enabled() { style } else { Style::new() }
}

/// Print a success message to stderr.
///
/// # Examples
///
/// ```no_run
/// use forge_rspack_cli::ui::success;
///
/// success("Configuration is valid");
/// ```
pub fn success(message: &str) {
    eprintln!("{} {}", "✓".style(paint(Style::new().green().bold())), message);
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    eprintln!("{} {}", "ℹ".style(paint(Style::new().blue().bold())), message);
}

/// Print a warning message to stderr.
pub fn warning(message: &str) {
    eprintln!(
        "{} {}",
        "⚠".style(paint(Style::new().yellow().bold())),
        message.style(paint(Style::new().yellow()))
    );
}

/// Print an error message to stderr.
pub fn error(message: &str) {
    eprintln!(
        "{} {}",
        "✗".style(paint(Style::new().red().bold())),
        message.style(paint(Style::new().red()))
    );
}

/// Print a debug message to stderr (only if RUST_LOG is set).
pub fn debug(message: &str) {
    if std::env::var_os("RUST_LOG").is_some() {
        let dimmed = paint(Style::new().dimmed());
        eprintln!("{} {}", "◆".style(dimmed), message.style(dimmed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        success("Success message");
        info("Info message");
        warning("Warning message");
        error("Error message");
        debug("Debug message");
    }
}
