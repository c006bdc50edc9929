//! Addition misunderstandings.

use super::digits::{digit_at, digits, from_columns, parse_digits, wrong_answer, WrongAnswer};
use super::{never, RuleDetector};
use crate::domain::errors::DetectionError;
use crate::domain::models::{AttemptRecord, Operation, PatternCategory, PatternRule, Severity};

const CATEGORY: PatternCategory = PatternCategory::Addition;

pub fn rules() -> Vec<RuleDetector> {
    vec![
        RuleDetector::new(
            PatternRule::new(
                "add_no_carry",
                CATEGORY,
                Severity::Major,
                "Forgets to carry",
                "Writes only the ones digit of each column sum and drops the carried ten (27 + 15 = 32).",
                "Treats each column as an independent single-digit fact instead of regrouping ten ones as one ten.",
                &["place_value", "regrouping"],
            ),
            no_carry,
        ),
        RuleDetector::new(
            PatternRule::new(
                "add_column_sums_written",
                CATEGORY,
                Severity::Major,
                "Writes whole column sums",
                "Writes every column total side by side (27 + 15 = 312).",
                "Does not know that a column can hold only one digit; the ten is never moved to the next place.",
                &["place_value", "regrouping"],
            ),
            column_sums_written,
        ),
        RuleDetector::new(
            PatternRule::new(
                "add_off_by_one",
                CATEGORY,
                Severity::Minor,
                "Off by one",
                "Answer is one more or one less than the sum.",
                "Counting on includes the starting number, or a count is skipped.",
                &["counting_on"],
            ),
            off_by_one,
        ),
        RuleDetector::new(
            PatternRule::new(
                "add_off_by_ten",
                CATEGORY,
                Severity::Moderate,
                "Off by ten",
                "Answer is exactly ten more or ten less than the sum.",
                "A carried ten is added twice or lost between columns.",
                &["place_value"],
            ),
            off_by_ten,
        ),
        RuleDetector::new(
            PatternRule::new(
                "add_subtracted",
                CATEGORY,
                Severity::Moderate,
                "Subtracts instead of adding",
                "Answer equals the difference of the two numbers.",
                "Reads the operation sign carelessly or does not connect + with combining.",
                &["operation_meaning"],
            ),
            subtracted,
        ),
        RuleDetector::new(
            PatternRule::new(
                "add_multiplied",
                CATEGORY,
                Severity::Moderate,
                "Multiplies instead of adding",
                "Answer equals the product of the two numbers.",
                "Confuses + with x, often after a run of multiplication drills.",
                &["operation_meaning"],
            ),
            multiplied,
        ),
        RuleDetector::new(
            PatternRule::new(
                "add_concatenated",
                CATEGORY,
                Severity::Moderate,
                "Joins the numbers",
                "Writes the addends next to each other (3 + 4 = 34).",
                "Sees addition as putting symbols together rather than combining quantities.",
                &["operation_meaning", "place_value"],
            ),
            concatenated,
        ),
        RuleDetector::new(
            PatternRule::new(
                "add_bridge_ten_overshoot",
                CATEGORY,
                Severity::Moderate,
                "Overshoots when bridging ten",
                "Makes ten, then adds the whole second number again (8 + 5 = 15).",
                "Splits the smaller addend to reach ten but forgets that part of it has been used.",
                &["number_bonds_10", "decomposition"],
            ),
            bridge_ten_overshoot,
        ),
        RuleDetector::new(
            PatternRule::new(
                "add_near_double_unadjusted",
                CATEGORY,
                Severity::Minor,
                "Near double not adjusted",
                "Uses the double of one addend without adding or removing the extra one (6 + 7 = 12).",
                "Knows the doubles fact but not how a near double differs from it.",
                &["doubles"],
            ),
            near_double_unadjusted,
        ),
        RuleDetector::new(
            PatternRule::new(
                "add_commutativity_gap",
                CATEGORY,
                Severity::Minor,
                "Does not use commutativity",
                "Knows a + b but not b + a.",
                "Does not see that order of addends does not change the sum. Needs per-fact history to detect.",
                &["operation_meaning"],
            ),
            never,
        ),
    ]
}

fn addition(attempt: &AttemptRecord) -> Result<Option<WrongAnswer>, DetectionError> {
    wrong_answer(attempt, Operation::Addition)
}

/// Column sums mod 10 with the carry dropped.
fn no_carry(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    let Some(w) = addition(attempt)? else {
        return Ok(false);
    };
    let (a, b) = (digits(w.a)?, digits(w.b)?);
    let columns = a.len().max(b.len());
    let sums: Vec<i64> = (0..columns)
        .map(|place| digit_at(&a, place) + digit_at(&b, place))
        .collect();
    if sums.iter().all(|&s| s < 10) {
        return Ok(false);
    }
    Ok(w.user == from_columns(sums.into_iter().map(|s| s % 10))?)
}

fn column_sums_written(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    let Some(w) = addition(attempt)? else {
        return Ok(false);
    };
    let (a, b) = (digits(w.a)?, digits(w.b)?);
    let columns = a.len().max(b.len());
    let sums: Vec<i64> = (0..columns)
        .map(|place| digit_at(&a, place) + digit_at(&b, place))
        .collect();
    if sums.iter().all(|&s| s < 10) {
        return Ok(false);
    }
    let written: String = sums.iter().rev().map(ToString::to_string).collect();
    Ok(w.user == parse_digits(&written)?)
}

fn off_by_one(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    Ok(addition(attempt)?.is_some_and(|w| w.distance() == 1))
}

fn off_by_ten(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    Ok(addition(attempt)?.is_some_and(|w| w.distance() == 10))
}

fn subtracted(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    let Some(w) = addition(attempt)? else {
        return Ok(false);
    };
    let difference = w
        .a
        .checked_sub(w.b)
        .and_then(i64::checked_abs)
        .ok_or(DetectionError::Overflow("difference"))?;
    Ok(w.b != 0 && w.user == difference)
}

fn multiplied(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    let Some(w) = addition(attempt)? else {
        return Ok(false);
    };
    let product = w
        .a
        .checked_mul(w.b)
        .ok_or(DetectionError::Overflow("product"))?;
    Ok(product != w.correct && w.user == product)
}

fn concatenated(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    let Some(w) = addition(attempt)? else {
        return Ok(false);
    };
    if w.a < 0 || w.b < 0 {
        return Ok(false);
    }
    let joined = parse_digits(&format!("{}{}", w.a, w.b))?;
    Ok(joined != w.correct && w.user == joined)
}

/// Only for problems generated with the `make_ten` strategy.
fn bridge_ten_overshoot(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    if !attempt.problem.uses_strategy("make_ten") {
        return Ok(false);
    }
    let Some(w) = addition(attempt)? else {
        return Ok(false);
    };
    let single_digits = (0..=9).contains(&w.a) && (0..=9).contains(&w.b);
    Ok(single_digits && w.a + w.b > 10 && w.user == 10 + w.a.min(w.b))
}

/// Only for problems generated with the `near_doubles` strategy.
fn near_double_unadjusted(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    if !attempt.problem.uses_strategy("near_doubles") {
        return Ok(false);
    }
    let Some(w) = addition(attempt)? else {
        return Ok(false);
    };
    if w.a.abs_diff(w.b) != 1 {
        return Ok(false);
    }
    let doubles = [w.a.checked_mul(2), w.b.checked_mul(2)];
    Ok(doubles.contains(&Some(w.user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Problem;

    fn check(rule: fn(&AttemptRecord) -> Result<bool, DetectionError>, problem: Problem, answer: i64) -> bool {
        rule(&AttemptRecord::answered(problem, answer)).expect("detector should evaluate")
    }

    #[test]
    fn test_no_carry() {
        assert!(check(no_carry, Problem::addition(27, 15), 32));
        assert!(check(no_carry, Problem::addition(58, 67), 15));
        assert!(!check(no_carry, Problem::addition(27, 15), 33));
        // no carry needed, so a wrong answer cannot be a carry slip
        assert!(!check(no_carry, Problem::addition(21, 15), 26));
    }

    #[test]
    fn test_column_sums_written() {
        assert!(check(column_sums_written, Problem::addition(27, 15), 312));
        assert!(!check(column_sums_written, Problem::addition(21, 15), 37));
        assert!(check(column_sums_written, Problem::addition(68, 57), 1115));
    }

    #[test]
    fn test_off_by_one_and_ten() {
        assert!(check(off_by_one, Problem::addition(8, 5), 14));
        assert!(check(off_by_one, Problem::addition(8, 5), 12));
        assert!(!check(off_by_one, Problem::addition(8, 5), 15));
        assert!(check(off_by_ten, Problem::addition(27, 15), 52));
        assert!(!check(off_by_ten, Problem::subtraction(27, 15), 22));
    }

    #[test]
    fn test_wrong_operation() {
        assert!(check(subtracted, Problem::addition(9, 4), 5));
        assert!(!check(subtracted, Problem::addition(9, 0), 9));
        assert!(check(multiplied, Problem::addition(6, 3), 18));
        // 2 + 2 == 2 * 2, so the product is not a wrong answer
        assert!(!check(multiplied, Problem::addition(2, 2), 5));
        assert!(check(concatenated, Problem::addition(3, 4), 34));
        assert!(check(concatenated, Problem::addition(12, 5), 125));
    }

    #[test]
    fn test_strategy_aware_rules() {
        let bridged = Problem::addition(8, 5).with_strategy("make_ten");
        assert!(check(bridge_ten_overshoot, bridged, 15));
        assert!(!check(bridge_ten_overshoot, Problem::addition(8, 5), 15));

        let near = Problem::addition(6, 7).with_strategy("near_doubles");
        assert!(check(near_double_unadjusted, near.clone(), 12));
        assert!(check(near_double_unadjusted, near.clone(), 14));
        assert!(!check(near_double_unadjusted, near, 11));
    }

    #[test]
    fn test_missing_answers_are_errors() {
        let mut attempt = AttemptRecord::answered(Problem::addition(27, 15), 32);
        attempt.correct_answer = None;
        assert!(no_carry(&attempt).is_err());
    }

    #[test]
    fn test_huge_operands_report_overflow() {
        let attempt = AttemptRecord::answered(Problem::addition(i64::MAX / 2, i64::MAX / 2), 3);
        assert!(concatenated(&attempt).is_err());
        assert!(multiplied(&attempt).is_err());
    }
}
