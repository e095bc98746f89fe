//! Cargo-style status lines on stderr, e.g. `   Resolving web latest (strict)`.
//!
//! Stdout stays reserved for command output so it can be piped.

use std::io::Write;

use console::Style;

const LABEL_WIDTH: usize = 12;

fn emit(style: Style, label: &str, message: &str) {
    let mut stderr = std::io::stderr().lock();
    let _ = writeln!(
        stderr,
        "{:>width$} {message}",
        style.apply_to(label),
        width = LABEL_WIDTH
    );
}

/// An action in progress or finished, with a bold green label.
pub fn status(label: &str, message: &str) {
    emit(Style::new().green().bold(), label, message);
}

/// An informational line, such as a dependency cycle, with a bold cyan label.
pub fn status_info(label: &str, message: &str) {
    emit(Style::new().cyan().bold(), label, message);
}

/// A warning, with a bold yellow label.
pub fn status_warn(label: &str, message: &str) {
    emit(Style::new().yellow().bold(), label, message);
}
