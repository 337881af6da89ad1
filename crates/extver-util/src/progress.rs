use std::io::Write;

use console::Style;

/// Colour of a status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Something was changed on disk or in memory (bold green).
    Action,
    /// Informational, nothing changed (bold cyan).
    Info,
    /// Skipped or suspicious (bold yellow).
    Warn,
}

impl StatusKind {
    fn style(self) -> Style {
        match self {
            Self::Action => Style::new().green().bold(),
            Self::Info => Style::new().cyan().bold(),
            Self::Warn => Style::new().yellow().bold(),
        }
    }
}

/// Format a Cargo-style status line: `     Rewrote org.example:core 1.0 -> 2.0`
///
/// The label is right-aligned to 12 columns. Styling is dropped when the
/// terminal does not support colours.
pub fn format_status(kind: StatusKind, label: &str, message: &str) -> String {
    format!("{:>12} {message}", kind.style().apply_to(label))
}

/// Print an action status line to stderr.
pub fn status(label: &str, message: &str) {
    emit(StatusKind::Action, label, message);
}

/// Print an informational status line to stderr.
pub fn status_info(label: &str, message: &str) {
    emit(StatusKind::Info, label, message);
}

/// Print a warning status line to stderr.
pub fn status_warn(label: &str, message: &str) {
    emit(StatusKind::Warn, label, message);
}

fn emit(kind: StatusKind, label: &str, message: &str) {
    let _ = writeln!(std::io::stderr(), "{}", format_status(kind, label, message));
}
