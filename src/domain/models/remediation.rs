//! Remediation lesson content.
//!
//! A lesson is an ordered list of steps authored per misunderstanding.
//! Steps are plain data; the state machine that walks them lives in
//! [`crate::services::remediation_unit`].

use serde::{Deserialize, Serialize};

/// How a learner's typed answer is judged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerSpec {
    /// Exact match against the expected value or any alternate (trimmed, case-folded).
    Exact {
        expected: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        alternates: Vec<String>,
    },
    /// Exact match, or any number inside `[min, max]`.
    Range { expected: String, min: f64, max: f64 },
    /// A place-value partition such as `500+60+7`, in any term order.
    Partition { expected: String },
    /// Any response is accepted (reflection prompts).
    Any {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expected: Option<String>,
    },
}

impl AnswerSpec {
    pub fn exact(expected: impl Into<String>) -> Self {
        Self::Exact {
            expected: expected.into(),
            alternates: Vec::new(),
        }
    }

    pub fn exact_with(expected: impl Into<String>, alternates: &[&str]) -> Self {
        Self::Exact {
            expected: expected.into(),
            alternates: alternates.iter().map(|a| (*a).to_string()).collect(),
        }
    }

    pub fn number(expected: i64) -> Self {
        Self::exact(expected.to_string())
    }

    pub fn partition(expected: impl Into<String>) -> Self {
        Self::Partition {
            expected: expected.into(),
        }
    }

    /// The value revealed to the learner after a wrong guided answer.
    pub fn expected(&self) -> Option<&str> {
        match self {
            Self::Exact { expected, .. }
            | Self::Range { expected, .. }
            | Self::Partition { expected } => Some(expected),
            Self::Any { expected } => expected.as_deref(),
        }
    }
}

/// One scaffolded prompt inside a guided problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubStep {
    pub prompt: String,
    pub answer: AnswerSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// A problem worked through as a sequence of sub-prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidedProblem {
    pub problem: String,
    pub sub_steps: Vec<SubStep>,
}

/// A single-answer problem used by independent practice and checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeProblem {
    pub problem: String,
    pub answer: AnswerSpec,
}

impl PracticeProblem {
    pub fn numeric(problem: impl Into<String>, answer: i64) -> Self {
        Self {
            problem: problem.into(),
            answer: AnswerSpec::number(answer),
        }
    }
}

/// One stage of a remediation lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RemediationStep {
    Illustrate {
        #[serde(rename = "visualType")]
        visual_type: String,
        description: String,
    },
    Explain {
        text: String,
    },
    GuidedPractice {
        problems: Vec<GuidedProblem>,
    },
    IndependentPractice {
        problems: Vec<PracticeProblem>,
    },
    Check {
        problems: Vec<PracticeProblem>,
        #[serde(rename = "passingScore", default = "default_passing_score")]
        passing_score: f64,
    },
}

fn default_passing_score() -> f64 {
    0.8
}

impl RemediationStep {
    pub fn kind(&self) -> StepKind {
        match self {
            Self::Illustrate { .. } => StepKind::Illustrate,
            Self::Explain { .. } => StepKind::Explain,
            Self::GuidedPractice { .. } => StepKind::GuidedPractice,
            Self::IndependentPractice { .. } => StepKind::IndependentPractice,
            Self::Check { .. } => StepKind::Check,
        }
    }
}

/// Discriminant of a [`RemediationStep`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Illustrate,
    Explain,
    GuidedPractice,
    IndependentPractice,
    Check,
}

impl StepKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Illustrate => "illustrate",
            Self::Explain => "explain",
            Self::GuidedPractice => "guided_practice",
            Self::IndependentPractice => "independent_practice",
            Self::Check => "check",
        }
    }
}

/// Progress counters of one remediation unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemediationProgress {
    pub guided_completed: u32,
    pub independent_completed: u32,
    pub check_attempts: u32,
    pub last_check_score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_yaml_shape() {
        let yaml = r#"
- type: illustrate
  visualType: place_value_chart
  description: Tens and ones in columns
- type: guided_practice
  problems:
    - problem: "27 + 15"
      subSteps:
        - prompt: "Add the ones: 7 + 5"
          answer: { kind: exact, expected: "12", alternates: ["twelve"] }
          hint: Count on from 7
- type: check
  problems:
    - problem: "38 + 24"
      answer: { kind: exact, expected: "62" }
"#;
        let steps: Vec<RemediationStep> = serde_yaml::from_str(yaml).expect("steps should parse");
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[1].kind(), StepKind::GuidedPractice);
        match &steps[2] {
            RemediationStep::Check { passing_score, .. } => {
                assert!((passing_score - 0.8).abs() < f64::EPSILON);
            }
            other => panic!("expected check step, got {other:?}"),
        }
    }

    #[test]
    fn test_expected_reveal() {
        assert_eq!(AnswerSpec::number(42).expected(), Some("42"));
        assert_eq!(AnswerSpec::Any { expected: None }.expected(), None);
    }
}
