//! Command-line surface of the `fluency` binary.

pub mod commands;
pub mod context;
pub mod display;
pub mod types;

use colored::Colorize;

pub use context::CliContext;
pub use types::{Cli, Commands};

/// Run one parsed command against `ctx`.
pub fn dispatch(command: Commands, ctx: &CliContext, json: bool) -> anyhow::Result<()> {
    use commands::{analyze, misunderstanding, patterns, remediate};

    match command {
        Commands::Patterns(args) => patterns::execute(args, ctx, json),
        Commands::Analyze(args) => analyze::execute(args, ctx, json),
        Commands::List(args) => misunderstanding::execute_list(args, ctx, json),
        Commands::Show(args) => misunderstanding::execute_show(args, ctx, json),
        Commands::Priority(args) => misunderstanding::execute_priority(args, ctx, json),
        Commands::Status(args) => misunderstanding::execute_status(args, ctx, json),
        Commands::Dismiss(args) => misunderstanding::execute_dismiss(args, ctx, json),
        Commands::Remediate(args) => remediate::execute(args, ctx, json),
    }
}

/// Print `err` with its context chain and exit with status 1.
pub fn handle_error(err: &anyhow::Error, json: bool) -> ! {
    if json {
        let chain: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        let body = serde_json::json!({ "error": err.to_string(), "causes": chain });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err}", "error:".red().bold());
        for cause in err.chain().skip(1) {
            eprintln!("  {} {cause}", "caused by:".dimmed());
        }
    }
    std::process::exit(1)
}
