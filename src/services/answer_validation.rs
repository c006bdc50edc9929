//! Judging typed answers inside remediation lessons.

use crate::domain::models::AnswerSpec;

fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Whether `input` satisfies `spec`.
///
/// Input and expected values are trimmed and case-folded before comparing.
pub fn validate_answer(input: &str, spec: &AnswerSpec) -> bool {
    let given = normalize(input);
    match spec {
        AnswerSpec::Any { .. } => true,
        AnswerSpec::Exact {
            expected,
            alternates,
        } => given == normalize(expected) || alternates.iter().any(|alt| given == normalize(alt)),
        AnswerSpec::Range { expected, min, max } => {
            let in_range = given
                .parse::<f64>()
                .is_ok_and(|value| value >= *min && value <= *max);
            in_range || given == normalize(expected)
        }
        AnswerSpec::Partition { expected } => validate_partition(input, expected),
    }
}

/// Compare two `+`-separated integer partitions as multisets.
///
/// `"500+60+7"` matches `"60+500+7"` but not `"567"`. Any term that is not
/// an integer makes the partitions unequal.
pub fn validate_partition(input: &str, expected: &str) -> bool {
    match (partition_terms(input), partition_terms(expected)) {
        (Some(given), Some(wanted)) => given == wanted,
        _ => false,
    }
}

fn partition_terms(text: &str) -> Option<Vec<i64>> {
    let mut terms = text
        .split('+')
        .map(|term| term.trim().parse::<i64>().ok())
        .collect::<Option<Vec<_>>>()?;
    terms.sort_unstable();
    Some(terms)
}
