//! Attempt domain model.
//!
//! Attempts are produced by a practice session and consumed only by the
//! error analyzer. They carry enough of the original problem (operands,
//! operation, generating strategy) for strategy-aware detectors.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Arithmetic operation of a practice problem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    #[serde(alias = "+", alias = "add", alias = "plus")]
    Addition,
    #[serde(alias = "-", alias = "subtract", alias = "minus")]
    Subtraction,
    /// Any operation the catalog has no detectors for.
    #[default]
    #[serde(other)]
    Other,
}

impl Operation {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Addition => "+",
            Self::Subtraction => "-",
            Self::Other => "?",
        }
    }

    /// Apply the operation to two operands.
    pub fn apply(&self, a: i64, b: i64) -> Option<i64> {
        match self {
            Self::Addition => a.checked_add(b),
            Self::Subtraction => a.checked_sub(b),
            Self::Other => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The problem a learner was asked to solve.
///
/// Operands that are missing or not integers deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    #[serde(default, deserialize_with = "lenient_integer")]
    pub a: Option<i64>,
    #[serde(default, deserialize_with = "lenient_integer")]
    pub b: Option<i64>,
    #[serde(default)]
    pub operation: Operation,
    /// Strategy the drill generator used to produce this problem
    /// (e.g. `make_ten`, `near_doubles`, `think_addition`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_id: Option<String>,
}

impl Problem {
    pub fn new(a: i64, b: i64, operation: Operation) -> Self {
        Self {
            a: Some(a),
            b: Some(b),
            operation,
            strategy_id: None,
        }
    }

    pub fn addition(a: i64, b: i64) -> Self {
        Self::new(a, b, Operation::Addition)
    }

    pub fn subtraction(a: i64, b: i64) -> Self {
        Self::new(a, b, Operation::Subtraction)
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy_id: impl Into<String>) -> Self {
        self.strategy_id = Some(strategy_id.into());
        self
    }

    /// Both operands, when present.
    pub fn operands(&self) -> Option<(i64, i64)> {
        Some((self.a?, self.b?))
    }

    /// Human-readable problem text, e.g. `53 - 28`.
    pub fn text(&self) -> String {
        let operand = |n: Option<i64>| n.map_or_else(|| "?".to_string(), |n| n.to_string());
        format!("{} {} {}", operand(self.a), self.operation, operand(self.b))
    }

    pub fn uses_strategy(&self, strategy_id: &str) -> bool {
        self.strategy_id.as_deref() == Some(strategy_id)
    }
}

/// One answered problem plus its correctness outcome.
///
/// Deserialization never rejects a field's value: malformed answers and
/// operands become `None` and a malformed `correct` flag reads as `false`,
/// leaving the detectors to decide whether the attempt is usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    #[serde(default)]
    pub problem: Problem,
    #[serde(default, deserialize_with = "lenient_integer")]
    pub user_answer: Option<i64>,
    #[serde(default, deserialize_with = "lenient_integer")]
    pub correct_answer: Option<i64>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub correct: bool,
}

impl AttemptRecord {
    /// Build an attempt, deriving `correct` and the correct answer from the problem.
    pub fn answered(problem: Problem, user_answer: i64) -> Self {
        let correct_answer = problem
            .operands()
            .and_then(|(a, b)| problem.operation.apply(a, b));
        Self {
            correct: correct_answer == Some(user_answer),
            problem,
            user_answer: Some(user_answer),
            correct_answer,
        }
    }

    /// Both answers, when present.
    pub fn answers(&self) -> Option<(i64, i64)> {
        Some((self.user_answer?, self.correct_answer?))
    }

    pub fn problem_text(&self) -> String {
        self.problem.text()
    }
}

/// Accept a JSON number, a numeric string, or null; anything else is `None`.
fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole_f64)),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

/// `f` as an integer when it is whole and inside the `i64` range.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn whole_f64(f: f64) -> Option<i64> {
    // i64::MAX rounds up to 2^63 as f64, so the upper bound is exclusive
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

/// Accept a JSON bool or `"true"`/`"false"`; anything else is `false`.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answered_derives_correctness() {
        let wrong = AttemptRecord::answered(Problem::subtraction(53, 28), 35);
        assert!(!wrong.correct);
        assert_eq!(wrong.correct_answer, Some(25));

        let right = AttemptRecord::answered(Problem::addition(8, 5), 13);
        assert!(right.correct);
    }

    #[test]
    fn test_problem_text() {
        assert_eq!(Problem::subtraction(53, 28).text(), "53 - 28");
        assert_eq!(Problem::addition(7, 6).text(), "7 + 6");
    }

    #[test]
    fn test_lenient_answers() {
        let json = r#"{
            "problem": {"a": 27, "b": 15, "operation": "+", "strategyId": "make_ten"},
            "userAnswer": " 312 ",
            "correctAnswer": 42,
            "correct": false
        }"#;
        let attempt: AttemptRecord = serde_json::from_str(json).expect("attempt should parse");
        assert_eq!(attempt.user_answer, Some(312));
        assert_eq!(attempt.answers(), Some((312, 42)));
        assert!(attempt.problem.uses_strategy("make_ten"));
        assert_eq!(attempt.problem.operation, Operation::Addition);
    }

    #[test]
    fn test_malformed_answers_become_none() {
        let json = r#"{
            "problem": {"a": 4, "b": 3, "operation": "multiply"},
            "userAnswer": "twelve",
            "correct": false
        }"#;
        let attempt: AttemptRecord = serde_json::from_str(json).expect("attempt should parse");
        assert_eq!(attempt.user_answer, None);
        assert_eq!(attempt.correct_answer, None);
        assert_eq!(attempt.problem.operation, Operation::Other);
        assert!(attempt.answers().is_none());
    }

    #[test]
    fn test_out_of_range_float_answer_is_none() {
        let json = r#"{
            "problem": {"a": 4, "b": 3, "operation": "+"},
            "userAnswer": 1e30,
            "correctAnswer": 7.0,
            "correct": false
        }"#;
        let attempt: AttemptRecord = serde_json::from_str(json).expect("attempt should parse");
        assert_eq!(attempt.user_answer, None);
        assert_eq!(attempt.correct_answer, Some(7));
        assert_eq!(whole_f64(-1e30), None);
        assert_eq!(whole_f64(2.5), None);
    }

    #[test]
    fn test_malformed_operands_and_flag_still_parse() {
        let json = r#"{
            "problem": {"a": "seven", "operation": "-"},
            "userAnswer": 35,
            "correctAnswer": 25,
            "correct": "no"
        }"#;
        let attempt: AttemptRecord = serde_json::from_str(json).expect("attempt should parse");
        assert_eq!(attempt.problem.a, None);
        assert_eq!(attempt.problem.b, None);
        assert_eq!(attempt.problem.operands(), None);
        assert!(!attempt.correct);
        assert_eq!(attempt.problem_text(), "? - ?");

        let numeric: AttemptRecord =
            serde_json::from_str(r#"{"problem": {"a": "7", "b": 2, "operation": "+"}, "correct": "true"}"#)
                .expect("attempt should parse");
        assert_eq!(numeric.problem.operands(), Some((7, 2)));
        assert!(numeric.correct);
    }

    #[test]
    fn test_missing_problem_defaults_to_unknown_operation() {
        let attempt: AttemptRecord =
            serde_json::from_str(r#"{"userAnswer": 3}"#).expect("attempt should parse");
        assert_eq!(attempt.problem.operation, Operation::Other);
        assert!(!attempt.correct);
    }
}
