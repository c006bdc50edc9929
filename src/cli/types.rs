//! CLI type definitions
//!
//! Clap structures for the `fluency` binary. Argument structs of individual
//! commands live next to their handlers in [`crate::cli::commands`].

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::commands::{
    analyze::AnalyzeArgs,
    misunderstanding::{DismissArgs, ListArgs, PriorityArgs, ShowArgs, StatusArgs},
    patterns::PatternsArgs,
    remediate::RemediateArgs,
};

#[derive(Parser, Debug)]
#[command(name = "fluency")]
#[command(about = "Diagnose arithmetic misunderstandings and work through remediation lessons")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .fluency/config.yaml and .fluency/local.yaml)
    #[arg(short, long, global = true, env = "FLUENCY_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the misunderstanding catalog
    Patterns(PatternsArgs),

    /// Analyze a JSON array of attempts and track what is found
    Analyze(AnalyzeArgs),

    /// List tracked misunderstandings
    List(ListArgs),

    /// Show one tracked misunderstanding
    Show(ShowArgs),

    /// Rank active misunderstandings by remediation priority
    Priority(PriorityArgs),

    /// Move a misunderstanding forward in its lifecycle
    Status(StatusArgs),

    /// Stop tracking a misunderstanding
    Dismiss(DismissArgs),

    /// Work through the remediation lesson for a misunderstanding
    Remediate(RemediateArgs),
}
