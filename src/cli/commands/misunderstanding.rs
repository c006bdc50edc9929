//! Commands over tracked misunderstandings: list, show, priority, status, dismiss.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;

use crate::cli::commands::{parse_category, parse_status};
use crate::cli::context::CliContext;
use crate::cli::display::{
    action_failure, action_success, colorize_category, colorize_severity, colorize_status,
    days_ago, list_table, output, percent, render_list, timestamp, truncate, CommandOutput,
    DetailView,
};
use crate::domain::models::{MisunderstandingRecord, PatternCategory, RemediationStatus};
use crate::services::{MisunderstandingTracker, PrioritizedMisunderstanding};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show one category (addition, subtraction, large_numbers)
    #[arg(long, value_parser = parse_category)]
    pub category: Option<PatternCategory>,

    /// Include resolved misunderstandings
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Misunderstanding id
    pub id: String,
}

#[derive(Args, Debug)]
pub struct PriorityArgs {
    /// Show at most this many entries
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Misunderstanding id
    pub id: String,

    /// New status (identified, in_progress, resolved)
    #[arg(value_parser = parse_status)]
    pub status: RemediationStatus,
}

#[derive(Args, Debug)]
pub struct DismissArgs {
    /// Misunderstanding id
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct RecordListOutput {
    pub misunderstandings: Vec<MisunderstandingRecord>,
    pub total: usize,
    #[serde(skip)]
    pub now: DateTime<Utc>,
}

impl CommandOutput for RecordListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "category", "severity", "status", "seen", "last seen"]);
        for r in &self.misunderstandings {
            table.add_row(vec![
                r.id.clone(),
                colorize_category(r.category).to_string(),
                colorize_severity(r.severity).to_string(),
                colorize_status(r.remediation_status).to_string(),
                format!("{}x", r.detection_count),
                days_ago(r.last_detected, self.now),
            ]);
        }
        render_list("misunderstanding", &table, self.total)
    }
}

#[derive(Debug, Serialize)]
pub struct RecordDetailOutput {
    #[serde(flatten)]
    pub record: MisunderstandingRecord,
}

impl CommandOutput for RecordDetailOutput {
    fn to_human(&self) -> String {
        let r = &self.record;
        let mut view = DetailView::new(&r.name)
            .field("Id", &r.id)
            .field("Category", colorize_category(r.category))
            .field("Severity", colorize_severity(r.severity))
            .field("Status", colorize_status(r.remediation_status))
            .field("Confidence", percent(r.confidence))
            .field("Detections", r.detection_count)
            .field("First seen", timestamp(&r.detected_at))
            .field("Last seen", timestamp(&r.last_detected))
            .field("Attempts", r.remediation_attempts)
            .field_opt("Last score", r.last_attempt_score.map(percent))
            .field_opt("Resolved", r.resolved_at.as_ref().map(timestamp))
            .section("Description")
            .text(&r.description)
            .section("Root cause")
            .text(&r.root_cause);
        if !r.prerequisites.is_empty() {
            view = view.section("Prerequisites");
            for prerequisite in &r.prerequisites {
                view = view.item(prerequisite);
            }
        }
        if !r.examples.is_empty() {
            view = view.section("Examples");
            for example in &r.examples {
                view = view.item(example);
            }
        }
        view.render()
    }
}

#[derive(Debug, Serialize)]
pub struct PriorityOutput {
    pub ranked: Vec<PrioritizedMisunderstanding>,
}

impl CommandOutput for PriorityOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["#", "score", "id", "status", "name"]);
        for (rank, entry) in self.ranked.iter().enumerate() {
            table.add_row(vec![
                (rank + 1).to_string(),
                format!("{:.1}", entry.score),
                entry.record.id.clone(),
                colorize_status(entry.record.remediation_status).to_string(),
                truncate(&entry.record.name, 40),
            ]);
        }
        render_list("active misunderstanding", &table, self.ranked.len())
    }
}

#[derive(Debug, Serialize)]
pub struct ActionOutput {
    pub id: String,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RemediationStatus>,
}

impl CommandOutput for ActionOutput {
    fn to_human(&self) -> String {
        if self.success {
            action_success(&self.message)
        } else {
            action_failure(&self.message)
        }
    }
}

pub fn list(tracker: &MisunderstandingTracker, args: &ListArgs) -> Result<RecordListOutput> {
    let records = if args.all {
        let tracked = tracker.get_all().context("Failed to load misunderstandings")?;
        tracked
            .active
            .into_iter()
            .chain(tracked.resolved)
            .filter(|r| args.category.is_none() || args.category == Some(r.category))
            .collect()
    } else {
        tracker
            .get_active(args.category)
            .context("Failed to load misunderstandings")?
    };
    Ok(RecordListOutput {
        total: records.len(),
        misunderstandings: records,
        now: Utc::now(),
    })
}

pub fn show(tracker: &MisunderstandingTracker, id: &str) -> Result<RecordDetailOutput> {
    let record = tracker
        .get(id)
        .context("Failed to load misunderstandings")?
        .ok_or_else(|| anyhow!("Misunderstanding '{id}' is not tracked"))?;
    Ok(RecordDetailOutput { record })
}

pub fn priority(tracker: &MisunderstandingTracker, limit: Option<usize>) -> Result<PriorityOutput> {
    let mut ranked = tracker
        .remediation_priority()
        .context("Failed to rank misunderstandings")?;
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    Ok(PriorityOutput { ranked })
}

pub fn set_status(
    tracker: &MisunderstandingTracker,
    id: &str,
    status: RemediationStatus,
) -> Result<ActionOutput> {
    let updated = tracker
        .update_status(id, status)
        .context("Failed to update status")?
        .ok_or_else(|| anyhow!("Misunderstanding '{id}' is not tracked"))?;
    let success = updated.remediation_status == status;
    let message = if success {
        format!("{id} is now {status}")
    } else {
        format!(
            "{id} stays {}: status only moves forward",
            updated.remediation_status
        )
    };
    Ok(ActionOutput {
        id: id.to_string(),
        success,
        message,
        status: Some(updated.remediation_status),
    })
}

pub fn dismiss(tracker: &MisunderstandingTracker, id: &str) -> Result<ActionOutput> {
    let removed = tracker.dismiss(id).context("Failed to dismiss misunderstanding")?;
    let message = if removed {
        format!("Dismissed {id}")
    } else {
        format!("{id} was not tracked")
    };
    Ok(ActionOutput {
        id: id.to_string(),
        success: removed,
        message,
        status: None,
    })
}

pub fn execute_list(args: ListArgs, ctx: &CliContext, json: bool) -> Result<()> {
    output(&list(&ctx.tracker(), &args)?, json);
    Ok(())
}

pub fn execute_show(args: ShowArgs, ctx: &CliContext, json: bool) -> Result<()> {
    output(&show(&ctx.tracker(), &args.id)?, json);
    Ok(())
}

pub fn execute_priority(args: PriorityArgs, ctx: &CliContext, json: bool) -> Result<()> {
    output(&priority(&ctx.tracker(), args.limit)?, json);
    Ok(())
}

pub fn execute_status(args: StatusArgs, ctx: &CliContext, json: bool) -> Result<()> {
    output(&set_status(&ctx.tracker(), &args.id, args.status)?, json);
    Ok(())
}

pub fn execute_dismiss(args: DismissArgs, ctx: &CliContext, json: bool) -> Result<()> {
    output(&dismiss(&ctx.tracker(), &args.id)?, json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryStore;
    use crate::domain::models::{MisunderstandingCandidate, PatternRule, Severity};
    use std::sync::Arc;

    fn tracker_with(ids: &[(&str, PatternCategory)]) -> MisunderstandingTracker {
        let tracker = MisunderstandingTracker::new(Arc::new(InMemoryStore::new()));
        for &(id, category) in ids {
            let rule = PatternRule::new(id, category, Severity::Moderate, id, "d", "c", &[]);
            tracker
                .track_candidate(&MisunderstandingCandidate::from_rule(&rule, 0.5, 1, vec![]))
                .unwrap();
        }
        tracker
    }

    #[test]
    fn test_list_filters_and_includes_resolved_on_all() {
        let tracker = tracker_with(&[
            ("add_no_carry", PatternCategory::Addition),
            ("sub_added", PatternCategory::Subtraction),
        ]);
        tracker.update_status("sub_added", RemediationStatus::Resolved).unwrap();

        let active = list(&tracker, &ListArgs { category: None, all: false }).unwrap();
        assert_eq!(active.total, 1);

        let all = list(&tracker, &ListArgs { category: None, all: true }).unwrap();
        assert_eq!(all.total, 2);

        let subtraction = list(
            &tracker,
            &ListArgs {
                category: Some(PatternCategory::Subtraction),
                all: true,
            },
        )
        .unwrap();
        assert_eq!(subtraction.misunderstandings[0].id, "sub_added");
    }

    #[test]
    fn test_show_unknown_id_is_an_error() {
        let tracker = tracker_with(&[]);
        assert!(show(&tracker, "add_no_carry").is_err());
    }

    #[test]
    fn test_backward_status_is_reported_not_applied() {
        let tracker = tracker_with(&[("add_no_carry", PatternCategory::Addition)]);
        let forward = set_status(&tracker, "add_no_carry", RemediationStatus::InProgress).unwrap();
        assert!(forward.success);

        let backward = set_status(&tracker, "add_no_carry", RemediationStatus::Identified).unwrap();
        assert!(!backward.success);
        assert_eq!(backward.status, Some(RemediationStatus::InProgress));
    }

    #[test]
    fn test_priority_limit_and_dismiss() {
        let tracker = tracker_with(&[
            ("add_no_carry", PatternCategory::Addition),
            ("sub_added", PatternCategory::Subtraction),
        ]);
        assert_eq!(priority(&tracker, Some(1)).unwrap().ranked.len(), 1);

        assert!(dismiss(&tracker, "sub_added").unwrap().success);
        assert!(!dismiss(&tracker, "sub_added").unwrap().success);
        assert_eq!(priority(&tracker, None).unwrap().ranked.len(), 1);
    }
}
