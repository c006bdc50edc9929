//! Display framework for CLI output formatting.
//!
//! Colors, tables, formatters and detail views shared by every command.

pub mod colors;
pub mod detail;
pub mod format;
pub mod table;

use serde::Serialize;

pub use colors::*;
pub use detail::*;
pub use format::*;
pub use table::*;

/// Trait for types that can be rendered as human-readable or JSON output.
pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Print `result` as pretty JSON or as human text.
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&result.to_json()).unwrap_or_default()
        );
    } else {
        println!("{}", result.to_human());
    }
}

pub fn action_success(message: &str) -> String {
    use colored::Colorize;
    format!("{} {}", "\u{2713}".green().bold(), message)
}

pub fn action_failure(message: &str) -> String {
    use colored::Colorize;
    format!("{} {}", "\u{2717}".red().bold(), message)
}
