//! Remediation lesson state machine.
//!
//! A unit walks one misunderstanding's lesson step by step:
//! illustrate and explain steps advance on acknowledgement, guided practice
//! advances only on correct sub-answers, independent practice records results
//! without gating, and the final check is scored and reported to an
//! [`AttemptRecorder`]. The unit itself is transient; only the recorded
//! check score outlives it.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::errors::RemediationError;
use crate::domain::models::{
    AnswerSpec, GuidedProblem, RemediationProgress, RemediationStep, StepKind,
};
use crate::domain::ports::{AttemptRecorder, ContentSupplier};
use crate::services::answer_validation::validate_answer;

/// One answered independent-practice or check problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeResult {
    pub problem: String,
    pub correct: bool,
    pub elapsed: Duration,
}

/// Result of a completed check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CheckOutcome {
    Passed { score: f64 },
    Failed { score: f64 },
}

impl CheckOutcome {
    pub fn score(&self) -> f64 {
        match self {
            Self::Passed { score } | Self::Failed { score } => *score,
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, Self::Passed { .. })
    }
}

/// What happened to an answer.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerFeedback {
    /// Guided sub-step accepted; the unit moved on.
    Correct,
    /// Guided sub-step rejected; the same sub-step is asked again.
    Incorrect { expected: Option<String> },
    /// Practice or check problem recorded; the unit moved on.
    Recorded { correct: bool },
    /// Last check problem answered and the score reported.
    CheckComplete(CheckOutcome),
}

/// What the learner should see next.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt<'a> {
    Illustrate {
        visual_type: &'a str,
        description: &'a str,
    },
    Explain {
        text: &'a str,
    },
    Guided {
        problem: &'a str,
        prompt: &'a str,
        hint: Option<&'a str>,
        problem_number: usize,
        problem_count: usize,
        sub_step_number: usize,
        sub_step_count: usize,
    },
    Independent {
        problem: &'a str,
        number: usize,
        count: usize,
    },
    /// `problem` is `None` only for a check without problems, which any
    /// answer completes with a score of 0.
    Check {
        problem: Option<&'a str>,
        number: usize,
        count: usize,
        passing_score: f64,
    },
    Complete {
        outcome: Option<CheckOutcome>,
    },
}

/// Per-misunderstanding lesson state machine.
#[derive(Debug, Clone)]
pub struct RemediationUnit {
    id: String,
    steps: Vec<RemediationStep>,
    current_step: usize,
    problem_index: usize,
    sub_step_index: usize,
    progress: RemediationProgress,
    results: Vec<PracticeResult>,
    outcome: Option<CheckOutcome>,
}

impl RemediationUnit {
    pub fn new(id: impl Into<String>, steps: Vec<RemediationStep>) -> Self {
        let mut unit = Self {
            id: id.into(),
            steps,
            current_step: 0,
            problem_index: 0,
            sub_step_index: 0,
            progress: RemediationProgress::default(),
            results: Vec::new(),
            outcome: None,
        };
        unit.settle();
        unit
    }

    /// Build a unit from authored content; `None` when no lesson exists.
    pub fn from_supplier(id: &str, supplier: &dyn ContentSupplier) -> Option<Self> {
        let steps = supplier.remediation_content(id)?;
        Some(Self::new(id, steps))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn steps(&self) -> &[RemediationStep] {
        &self.steps
    }

    pub fn current_step_index(&self) -> usize {
        self.current_step
    }

    pub fn current_step(&self) -> Option<&RemediationStep> {
        self.steps.get(self.current_step)
    }

    pub fn progress(&self) -> &RemediationProgress {
        &self.progress
    }

    /// Results of the practice or check step in progress (or the last check).
    pub fn results(&self) -> &[PracticeResult] {
        &self.results
    }

    pub fn outcome(&self) -> Option<CheckOutcome> {
        self.outcome
    }

    pub fn is_complete(&self) -> bool {
        self.current_step >= self.steps.len()
    }

    /// Answer spec of the prompt in progress, if it takes an answer.
    pub fn current_answer_spec(&self) -> Option<&AnswerSpec> {
        match self.current_step()? {
            RemediationStep::GuidedPractice { problems } => problems
                .get(self.problem_index)
                .and_then(|p| p.sub_steps.get(self.sub_step_index))
                .map(|s| &s.answer),
            RemediationStep::IndependentPractice { problems }
            | RemediationStep::Check { problems, .. } => {
                problems.get(self.problem_index).map(|p| &p.answer)
            }
            _ => None,
        }
    }

    pub fn current_prompt(&self) -> Prompt<'_> {
        let Some(step) = self.current_step() else {
            return Prompt::Complete {
                outcome: self.outcome,
            };
        };
        match step {
            RemediationStep::Illustrate {
                visual_type,
                description,
            } => Prompt::Illustrate {
                visual_type,
                description,
            },
            RemediationStep::Explain { text } => Prompt::Explain { text },
            RemediationStep::GuidedPractice { problems } => {
                let problem = &problems[self.problem_index];
                let sub_step = &problem.sub_steps[self.sub_step_index];
                Prompt::Guided {
                    problem: &problem.problem,
                    prompt: &sub_step.prompt,
                    hint: sub_step.hint.as_deref(),
                    problem_number: self.problem_index + 1,
                    problem_count: problems.len(),
                    sub_step_number: self.sub_step_index + 1,
                    sub_step_count: problem.sub_steps.len(),
                }
            }
            RemediationStep::IndependentPractice { problems } => Prompt::Independent {
                problem: &problems[self.problem_index].problem,
                number: self.problem_index + 1,
                count: problems.len(),
            },
            RemediationStep::Check {
                problems,
                passing_score,
            } => Prompt::Check {
                problem: problems.get(self.problem_index).map(|p| p.problem.as_str()),
                number: self.problem_index + 1,
                count: problems.len(),
                passing_score: *passing_score,
            },
        }
    }

    /// Move past an illustrate or explain step.
    pub fn acknowledge(&mut self) -> Result<(), RemediationError> {
        let kind = self.current_kind()?;
        match kind {
            StepKind::Illustrate | StepKind::Explain => {
                self.advance_step();
                Ok(())
            }
            _ => Err(RemediationError::wrong_step(kind, "acknowledged")),
        }
    }

    /// Answer the current practice or check prompt.
    ///
    /// `elapsed` is how long the learner took; it is kept with practice and
    /// check results. The check score goes to `recorder` once the last check
    /// problem is answered. If recording fails the unit stays on that problem.
    pub fn answer(
        &mut self,
        input: &str,
        elapsed: Duration,
        recorder: &dyn AttemptRecorder,
    ) -> Result<AnswerFeedback, RemediationError> {
        let kind = self.current_kind()?;
        match kind {
            StepKind::GuidedPractice => Ok(self.answer_guided(input)),
            StepKind::IndependentPractice => Ok(self.answer_independent(input, elapsed)),
            StepKind::Check => self.answer_check(input, elapsed, recorder),
            StepKind::Illustrate | StepKind::Explain => {
                Err(RemediationError::wrong_step(kind, "answered"))
            }
        }
    }

    /// Start the lesson over after a failed check.
    ///
    /// Local counters and results are cleared; anything already reported to
    /// the tracker stays there.
    pub fn reset_unit(&mut self) {
        debug!(id = %self.id, "remediation unit reset");
        self.current_step = 0;
        self.problem_index = 0;
        self.sub_step_index = 0;
        self.progress = RemediationProgress::default();
        self.results.clear();
        self.outcome = None;
        self.settle();
    }

    fn current_kind(&self) -> Result<StepKind, RemediationError> {
        self.current_step()
            .map(RemediationStep::kind)
            .ok_or(RemediationError::Complete)
    }

    fn answer_guided(&mut self, input: &str) -> AnswerFeedback {
        let Some(RemediationStep::GuidedPractice { problems }) = self.steps.get(self.current_step) else {
            return AnswerFeedback::Incorrect { expected: None };
        };
        let problem = &problems[self.problem_index];
        let spec = &problem.sub_steps[self.sub_step_index].answer;
        if !validate_answer(input, spec) {
            return AnswerFeedback::Incorrect {
                expected: spec.expected().map(str::to_string),
            };
        }

        if self.sub_step_index + 1 < problem.sub_steps.len() {
            self.sub_step_index += 1;
        } else if let Some(next) = next_guided_problem(problems, self.problem_index + 1) {
            self.problem_index = next;
            self.sub_step_index = 0;
        } else {
            self.progress.guided_completed += 1;
            self.advance_step();
        }
        AnswerFeedback::Correct
    }

    fn answer_independent(&mut self, input: &str, elapsed: Duration) -> AnswerFeedback {
        let Some(RemediationStep::IndependentPractice { problems }) = self.steps.get(self.current_step)
        else {
            return AnswerFeedback::Recorded { correct: false };
        };
        let problem = &problems[self.problem_index];
        let correct = validate_answer(input, &problem.answer);
        let is_last = self.problem_index + 1 >= problems.len();
        self.results.push(PracticeResult {
            problem: problem.problem.clone(),
            correct,
            elapsed,
        });

        if is_last {
            self.progress.independent_completed += 1;
            self.results.clear();
            self.advance_step();
        } else {
            self.problem_index += 1;
        }
        AnswerFeedback::Recorded { correct }
    }

    fn answer_check(
        &mut self,
        input: &str,
        elapsed: Duration,
        recorder: &dyn AttemptRecorder,
    ) -> Result<AnswerFeedback, RemediationError> {
        let Some(RemediationStep::Check {
            problems,
            passing_score,
        }) = self.steps.get(self.current_step)
        else {
            return Err(RemediationError::Complete);
        };
        let passing_score = *passing_score;
        let total = problems.len();

        let answered = problems.get(self.problem_index).map(|problem| PracticeResult {
            problem: problem.problem.clone(),
            correct: validate_answer(input, &problem.answer),
            elapsed,
        });

        if self.problem_index + 1 < total {
            let correct = answered.as_ref().is_some_and(|r| r.correct);
            self.results.extend(answered);
            self.problem_index += 1;
            return Ok(AnswerFeedback::Recorded { correct });
        }

        let correct_count = self.results.iter().filter(|r| r.correct).count()
            + usize::from(answered.as_ref().is_some_and(|r| r.correct));
        let score = check_score(correct_count, total);

        recorder.record_attempt(&self.id, score)?;

        self.results.extend(answered);
        self.progress.check_attempts += 1;
        self.progress.last_check_score = Some(score);
        let outcome = if score >= passing_score {
            CheckOutcome::Passed { score }
        } else {
            CheckOutcome::Failed { score }
        };
        self.outcome = Some(outcome);
        info!(id = %self.id, score, passed = outcome.passed(), "remediation check complete");
        self.advance_step();
        Ok(AnswerFeedback::CheckComplete(outcome))
    }

    fn advance_step(&mut self) {
        self.current_step += 1;
        self.problem_index = 0;
        self.sub_step_index = 0;
        self.settle();
    }

    /// Skip practice steps with nothing to practise and point guided
    /// practice at its first problem that has sub-steps.
    fn settle(&mut self) {
        while let Some(step) = self.steps.get(self.current_step) {
            match step {
                RemediationStep::GuidedPractice { problems } => match next_guided_problem(problems, 0) {
                    Some(first) => {
                        self.problem_index = first;
                        break;
                    }
                    None => self.progress.guided_completed += 1,
                },
                RemediationStep::IndependentPractice { problems } if problems.is_empty() => {
                    self.progress.independent_completed += 1;
                }
                _ => break,
            }
            self.current_step += 1;
        }
    }
}

fn next_guided_problem(problems: &[GuidedProblem], from: usize) -> Option<usize> {
    (from..problems.len()).find(|&i| !problems[i].sub_steps.is_empty())
}

/// Fraction correct; a check without problems scores 0.
fn check_score(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let score = correct as f64 / total as f64;
    score
}
