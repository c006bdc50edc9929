//! `fluency remediate`: an interactive lesson on the terminal.
//!
//! Lesson text goes to stdout, or to stderr with `--json` so that stdout
//! carries only the final summary document.

use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use crate::cli::context::CliContext;
use crate::cli::display::{action_failure, action_success, output, percent, CommandOutput};
use crate::domain::models::{RemediationProgress, RemediationStatus};
use crate::domain::ports::AttemptRecorder;
use crate::services::{AnswerFeedback, CheckOutcome, Prompt, RemediationUnit};

#[derive(Args, Debug)]
pub struct RemediateArgs {
    /// Misunderstanding id
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct RemediationSummary {
    pub id: String,
    pub lesson_available: bool,
    pub completed: bool,
    pub checks_taken: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<CheckOutcome>,
    pub progress: RemediationProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RemediationStatus>,
}

impl RemediationSummary {
    fn no_lesson(id: &str) -> Self {
        Self {
            id: id.to_string(),
            lesson_available: false,
            completed: false,
            checks_taken: 0,
            outcome: None,
            progress: RemediationProgress::default(),
            status: None,
        }
    }
}

impl CommandOutput for RemediationSummary {
    fn to_human(&self) -> String {
        if !self.lesson_available {
            return format!("No remediation lesson is available for {} yet.", self.id);
        }
        let line = match self.outcome {
            Some(CheckOutcome::Passed { score }) => {
                action_success(&format!("Check passed with {}", percent(score)))
            }
            Some(CheckOutcome::Failed { score }) => {
                action_failure(&format!("Check failed with {}", percent(score)))
            }
            None => "Lesson stopped before the check.".to_string(),
        };
        match self.status {
            Some(status) => format!("{line} ({} is now {status})", self.id),
            None => line,
        }
    }
}

/// Drive `unit` to completion (or end of input) reading answers from `input`.
///
/// After a failed check the learner is offered a restart; declining or
/// reaching end of input ends the lesson.
pub fn run_lesson<R: BufRead, W: Write>(
    unit: &mut RemediationUnit,
    recorder: &dyn AttemptRecorder,
    input: &mut R,
    out: &mut W,
) -> Result<(bool, u32)> {
    let mut checks_taken = 0;
    loop {
        let prompt = unit.current_prompt();
        render_prompt(out, &prompt)?;
        let next = Next::from(&prompt);

        match next {
            Next::Finish(outcome) => {
                if !matches!(outcome, Some(CheckOutcome::Failed { .. })) {
                    return Ok((true, checks_taken));
                }
                write!(out, "Start the lesson again? [y/N] ")?;
                out.flush()?;
                match read_line(input)? {
                    Some(reply) if reply.trim().eq_ignore_ascii_case("y") => unit.reset_unit(),
                    _ => return Ok((true, checks_taken)),
                }
            }
            Next::Acknowledge => {
                writeln!(out, "{}", "(press Enter to continue)".dimmed())?;
                if read_line(input)?.is_none() {
                    return Ok((false, checks_taken));
                }
                unit.acknowledge()?;
            }
            Next::EmptyCheck => {
                checks_taken += 1;
                let feedback = unit.answer("", Duration::ZERO, recorder)?;
                render_feedback(out, &feedback)?;
            }
            Next::Answer { hint } => {
                write!(out, "> ")?;
                out.flush()?;
                let started = Instant::now();
                let Some(answer) = read_line(input)? else {
                    return Ok((false, checks_taken));
                };
                let feedback = unit.answer(&answer, started.elapsed(), recorder)?;
                if matches!(feedback, AnswerFeedback::CheckComplete(_)) {
                    checks_taken += 1;
                }
                render_feedback(out, &feedback)?;
                if let (AnswerFeedback::Incorrect { .. }, Some(hint)) = (&feedback, hint) {
                    writeln!(out, "  {} {hint}", "hint:".cyan())?;
                }
            }
        }
    }
}

/// What the loop does with a prompt, detached from the unit's borrow.
enum Next {
    Finish(Option<CheckOutcome>),
    Acknowledge,
    EmptyCheck,
    Answer { hint: Option<String> },
}

impl From<&Prompt<'_>> for Next {
    fn from(prompt: &Prompt<'_>) -> Self {
        match prompt {
            Prompt::Complete { outcome } => Self::Finish(*outcome),
            Prompt::Illustrate { .. } | Prompt::Explain { .. } => Self::Acknowledge,
            Prompt::Check { problem: None, .. } => Self::EmptyCheck,
            Prompt::Guided { hint, .. } => Self::Answer {
                hint: hint.map(str::to_string),
            },
            Prompt::Independent { .. } | Prompt::Check { .. } => Self::Answer { hint: None },
        }
    }
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read answer")?;
    Ok((read > 0).then(|| line.trim_end_matches(['\r', '\n']).to_string()))
}

fn render_prompt<W: Write>(out: &mut W, prompt: &Prompt<'_>) -> io::Result<()> {
    match prompt {
        Prompt::Illustrate {
            visual_type,
            description,
        } => writeln!(out, "\n{} {description}", format!("[{visual_type}]").magenta()),
        Prompt::Explain { text } => writeln!(out, "\n{text}"),
        Prompt::Guided {
            problem,
            prompt,
            problem_number,
            problem_count,
            sub_step_number,
            sub_step_count,
            ..
        } => {
            if *sub_step_number == 1 {
                writeln!(
                    out,
                    "\n{} {problem}",
                    format!("Guided problem {problem_number}/{problem_count}:").bold()
                )?;
            }
            writeln!(out, "  ({sub_step_number}/{sub_step_count}) {prompt}")
        }
        Prompt::Independent {
            problem,
            number,
            count,
        } => writeln!(out, "{} {problem} = ?", format!("Practice {number}/{count}:").bold()),
        Prompt::Check {
            problem: Some(problem),
            number,
            count,
            ..
        } => writeln!(out, "{} {problem} = ?", format!("Check {number}/{count}:").bold()),
        Prompt::Check { problem: None, .. } => writeln!(out, "This check has no problems."),
        Prompt::Complete { .. } => writeln!(out, "\n{}", "Lesson complete.".bold()),
    }
}

fn render_feedback<W: Write>(out: &mut W, feedback: &AnswerFeedback) -> io::Result<()> {
    match feedback {
        AnswerFeedback::Correct => writeln!(out, "  {}", "Correct.".green()),
        AnswerFeedback::Incorrect {
            expected: Some(expected),
        } => writeln!(out, "  Not quite. The answer is {}. Type it to go on.", expected.bold()),
        AnswerFeedback::Incorrect { expected: None } => writeln!(out, "  Not quite. Try again."),
        // no per-problem feedback during practice and checks
        AnswerFeedback::Recorded { .. } => Ok(()),
        AnswerFeedback::CheckComplete(outcome) => {
            let verdict = if outcome.passed() {
                "passed".green().bold()
            } else {
                "not passed".red().bold()
            };
            writeln!(out, "  Check {verdict}: {:.0}% correct.", outcome.score() * 100.0)
        }
    }
}

pub fn execute(args: RemediateArgs, ctx: &CliContext, json: bool) -> Result<()> {
    let tracker = ctx.tracker();
    let content = ctx.content();

    let Some(mut unit) = RemediationUnit::from_supplier(&args.id, &content) else {
        debug!(id = %args.id, "no remediation content");
        output(&RemediationSummary::no_lesson(&args.id), json);
        return Ok(());
    };

    let tracked = tracker.get(&args.id).context("Failed to load misunderstandings")?;
    if tracked.is_none() {
        eprintln!(
            "{} {} is not tracked; check scores will not be saved.",
            "note:".yellow(),
            args.id
        );
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let (completed, checks_taken) = if json {
        run_lesson(&mut unit, &tracker, &mut input, &mut io::stderr())?
    } else {
        run_lesson(&mut unit, &tracker, &mut input, &mut io::stdout())?
    };

    let status = tracker
        .get(&args.id)
        .context("Failed to load misunderstandings")?
        .map(|r| r.remediation_status);
    let summary = RemediationSummary {
        id: args.id,
        lesson_available: true,
        completed,
        checks_taken,
        outcome: unit.outcome(),
        progress: unit.progress().clone(),
        status,
    };
    output(&summary, json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{BuiltinContent, InMemoryStore};
    use crate::domain::models::{MisunderstandingCandidate, PatternCategory, PatternRule, Severity};
    use crate::services::MisunderstandingTracker;
    use std::sync::Arc;

    const ADD_NO_CARRY_GUIDED: &str = "40\n12\n1\n2\n4\n42\n14\nyes\n8\n84\n";

    fn tracked(id: &str) -> MisunderstandingTracker {
        let tracker = MisunderstandingTracker::new(Arc::new(InMemoryStore::new()));
        let rule = PatternRule::new(id, PatternCategory::Addition, Severity::Major, id, "d", "c", &[]);
        tracker
            .track_candidate(&MisunderstandingCandidate::from_rule(&rule, 1.0, 2, vec![]))
            .unwrap();
        tracker
    }

    fn script(check: &str, tail: &str) -> String {
        format!("\n\n{ADD_NO_CARRY_GUIDED}42\n82\n84\n{check}{tail}")
    }

    #[test]
    fn test_passing_lesson_records_score() {
        colored::control::set_override(false);
        let tracker = tracked("add_no_carry");
        let mut unit = RemediationUnit::from_supplier("add_no_carry", &BuiltinContent).unwrap();
        let mut input = io::Cursor::new(script("43\n83\n83\n82\n87\n", ""));
        let mut out = Vec::new();

        let (completed, checks) = run_lesson(&mut unit, &tracker, &mut input, &mut out).unwrap();
        assert!(completed);
        assert_eq!(checks, 1);
        assert_eq!(unit.outcome(), Some(CheckOutcome::Passed { score: 1.0 }));

        let record = tracker.get("add_no_carry").unwrap().unwrap();
        assert_eq!(record.remediation_attempts, 1);
        assert_eq!(record.remediation_status, RemediationStatus::InProgress);
        assert!(String::from_utf8(out).unwrap().contains("Lesson complete."));
    }

    #[test]
    fn test_wrong_guided_answer_reveals_value_and_hint() {
        colored::control::set_override(false);
        let tracker = tracked("add_no_carry");
        let mut unit = RemediationUnit::from_supplier("add_no_carry", &BuiltinContent).unwrap();
        // estimate accepted, then a wrong ones sum, then end of input
        let mut input = io::Cursor::new("\n\n40\n13\n");
        let mut out = Vec::new();

        let (completed, _) = run_lesson(&mut unit, &tracker, &mut input, &mut out).unwrap();
        assert!(!completed);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("The answer is 12"));
        assert!(text.contains("hint: Count on 5 from 7."));
    }

    #[test]
    fn test_failed_check_can_be_declined() {
        colored::control::set_override(false);
        let tracker = tracked("add_no_carry");
        let mut unit = RemediationUnit::from_supplier("add_no_carry", &BuiltinContent).unwrap();
        let mut input = io::Cursor::new(script("43\n0\n0\n0\n0\n", "n\n"));
        let mut out = Vec::new();

        let (completed, checks) = run_lesson(&mut unit, &tracker, &mut input, &mut out).unwrap();
        assert!(completed);
        assert_eq!(checks, 1);
        let record = tracker.get("add_no_carry").unwrap().unwrap();
        assert_eq!(record.last_attempt_score, Some(0.2));
    }
}
