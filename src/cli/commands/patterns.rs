//! `fluency patterns`: the misunderstanding catalog.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::commands::parse_category;
use crate::cli::context::CliContext;
use crate::cli::display::{
    colorize_category, colorize_severity, list_table, output, render_list, truncate, CommandOutput,
};
use crate::domain::models::{PatternCategory, PatternRule};
use crate::domain::ports::ContentSupplier;
use crate::services::PatternCatalog;

#[derive(Args, Debug)]
pub struct PatternsArgs {
    /// Only show one category (addition, subtraction, large_numbers)
    #[arg(long, value_parser = parse_category)]
    pub category: Option<PatternCategory>,
}

#[derive(Debug, Serialize)]
pub struct PatternOutput {
    #[serde(flatten)]
    pub rule: PatternRule,
    pub has_lesson: bool,
}

#[derive(Debug, Serialize)]
pub struct PatternListOutput {
    pub patterns: Vec<PatternOutput>,
    pub total: usize,
}

impl CommandOutput for PatternListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "category", "severity", "lesson", "name"]);
        for p in &self.patterns {
            table.add_row(vec![
                p.rule.id.clone(),
                colorize_category(p.rule.category).to_string(),
                colorize_severity(p.rule.severity).to_string(),
                if p.has_lesson { "yes" } else { "-" }.to_string(),
                truncate(&p.rule.name, 48),
            ]);
        }
        render_list("pattern", &table, self.total)
    }
}

pub fn list_patterns(
    catalog: &PatternCatalog,
    content: &dyn ContentSupplier,
    category: Option<PatternCategory>,
) -> PatternListOutput {
    let patterns: Vec<PatternOutput> = catalog
        .rules()
        .filter(|rule| category.is_none() || category == Some(rule.category))
        .map(|rule| PatternOutput {
            has_lesson: content.remediation_content(&rule.id).is_some(),
            rule: rule.clone(),
        })
        .collect();
    PatternListOutput {
        total: patterns.len(),
        patterns,
    }
}

pub fn execute(args: PatternsArgs, ctx: &CliContext, json: bool) -> Result<()> {
    let catalog = PatternCatalog::builtin();
    let content = ctx.content();
    output(&list_patterns(&catalog, &content, args.category), json);
    Ok(())
}
