//! Status, severity and category color mapping for CLI output.
//!
//! All coloring respects `NO_COLOR` via the `colored` crate.

use colored::{ColoredString, Colorize};

use crate::domain::models::{PatternCategory, RemediationStatus, Severity};

/// Identified = yellow, in progress = blue, resolved = green.
pub fn colorize_status(status: RemediationStatus) -> ColoredString {
    let text = status.as_str();
    match status {
        RemediationStatus::Identified => text.yellow().bold(),
        RemediationStatus::InProgress => text.blue(),
        RemediationStatus::Resolved => text.green(),
    }
}

pub fn colorize_severity(severity: Severity) -> ColoredString {
    let text = match severity {
        Severity::Minor => "minor",
        Severity::Moderate => "moderate",
        Severity::Major => "major",
    };
    match severity {
        Severity::Major => text.red().bold(),
        Severity::Moderate => text.yellow(),
        Severity::Minor => text.dimmed(),
    }
}

pub fn colorize_category(category: PatternCategory) -> ColoredString {
    let text = category.as_str();
    match category {
        PatternCategory::Addition => text.cyan(),
        PatternCategory::Subtraction => text.magenta(),
        PatternCategory::LargeNumbers => text.white(),
    }
}

/// Green at or above `pass`, red below.
pub fn colorize_score(score: f64, pass: f64) -> ColoredString {
    let text = format!("{:.0}%", score * 100.0);
    if score >= pass {
        text.green().bold()
    } else {
        text.red()
    }
}

/// Styled label for detail views (bold + dimmed colon).
pub fn label(name: &str) -> String {
    format!("{}{}", name.bold(), ":".dimmed())
}
