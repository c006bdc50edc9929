//! Subtraction misunderstandings.

use super::digits::{digit_at, digits, from_columns, needs_borrow, wrong_answer, WrongAnswer};
use super::{never, RuleDetector};
use crate::domain::errors::DetectionError;
use crate::domain::models::{AttemptRecord, Operation, PatternCategory, PatternRule, Severity};

const CATEGORY: PatternCategory = PatternCategory::Subtraction;

pub fn rules() -> Vec<RuleDetector> {
    vec![
        RuleDetector::new(
            PatternRule::new(
                "sub_smaller_from_larger",
                CATEGORY,
                Severity::Major,
                "Always subtracts smaller digit from larger",
                "In each column takes the smaller digit from the larger one, whichever is on top (53 - 28 = 35).",
                "Believes subtraction must always take small from big, so never regroups a ten into ones.",
                &["place_value", "regrouping"],
            ),
            smaller_from_larger,
        ),
        RuleDetector::new(
            PatternRule::new(
                "sub_borrow_no_decrement",
                CATEGORY,
                Severity::Major,
                "Borrows without paying back",
                "Adds ten to a column but leaves the digit it borrowed from unchanged (62 - 37 = 35).",
                "Follows the borrowing procedure mechanically without seeing it as exchanging one ten for ten ones.",
                &["place_value", "regrouping"],
            ),
            borrow_no_decrement,
        ),
        RuleDetector::new(
            PatternRule::new(
                "sub_borrow_across_zero",
                CATEGORY,
                Severity::Major,
                "Borrowing across zero",
                "When borrowing through a zero, turns the zero into 10 instead of 9 (503 - 127 = 386).",
                "Does not see that the zero passes one ten on after receiving a hundred.",
                &["place_value", "regrouping"],
            ),
            borrow_across_zero,
        ),
        RuleDetector::new(
            PatternRule::new(
                "sub_reversed_operands",
                CATEGORY,
                Severity::Moderate,
                "Subtracts in the wrong order",
                "Answer is the negative of the difference.",
                "Thinks the order of a subtraction does not matter.",
                &["operation_meaning"],
            ),
            reversed_operands,
        ),
        RuleDetector::new(
            PatternRule::new(
                "sub_added",
                CATEGORY,
                Severity::Moderate,
                "Adds instead of subtracting",
                "Answer equals the sum of the two numbers.",
                "Reads the operation sign carelessly or does not connect - with taking away.",
                &["operation_meaning"],
            ),
            added,
        ),
        RuleDetector::new(
            PatternRule::new(
                "sub_off_by_one",
                CATEGORY,
                Severity::Minor,
                "Off by one",
                "Answer is one more or one less than the difference.",
                "Counting back includes the starting number.",
                &["counting_back"],
            ),
            off_by_one,
        ),
        RuleDetector::new(
            PatternRule::new(
                "sub_off_by_ten",
                CATEGORY,
                Severity::Moderate,
                "Off by ten",
                "Answer is exactly ten more or ten less than the difference.",
                "Loses or double-counts a regrouped ten.",
                &["place_value"],
            ),
            off_by_ten,
        ),
        RuleDetector::new(
            PatternRule::new(
                "sub_missing_addend_confusion",
                CATEGORY,
                Severity::Moderate,
                "Gives the known part",
                "When thinking addition, answers with the number being subtracted (13 - 5: answers 5).",
                "Sets up the missing-addend fact but reports the wrong part of it.",
                &["number_bonds", "inverse_operations"],
            ),
            missing_addend_confusion,
        ),
        RuleDetector::new(
            PatternRule::new(
                "sub_zero_identity_confusion",
                CATEGORY,
                Severity::Moderate,
                "Zero rules mixed up",
                "Answers 0 for n - 0, or n for n - n.",
                "Confuses taking nothing away with taking everything away.",
                &["zero_property"],
            ),
            zero_identity_confusion,
        ),
        RuleDetector::new(
            PatternRule::new(
                "sub_inverse_relationship_gap",
                CATEGORY,
                Severity::Minor,
                "Does not link subtraction to addition",
                "Knows a + b = c but cannot answer c - b.",
                "Treats related addition and subtraction facts as unrelated. Needs per-fact history to detect.",
                &["inverse_operations"],
            ),
            never,
        ),
    ]
}

fn subtraction(attempt: &AttemptRecord) -> Result<Option<WrongAnswer>, DetectionError> {
    wrong_answer(attempt, Operation::Subtraction)
}

/// Column digits of a non-negative `a - b` with `a >= b`, or `None`.
fn columns(w: &WrongAnswer) -> Result<Option<(Vec<u8>, Vec<u8>)>, DetectionError> {
    if w.b < 0 || w.a < w.b {
        return Ok(None);
    }
    Ok(Some((digits(w.a)?, digits(w.b)?)))
}

fn smaller_from_larger(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    let Some(w) = subtraction(attempt)? else {
        return Ok(false);
    };
    let Some((top, bottom)) = columns(&w)? else {
        return Ok(false);
    };
    if !needs_borrow(&top, &bottom) {
        return Ok(false);
    }
    let diffs = (0..top.len()).map(|place| (digit_at(&top, place) - digit_at(&bottom, place)).abs());
    Ok(w.user == from_columns(diffs)?)
}

fn borrow_no_decrement(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    let Some(w) = subtraction(attempt)? else {
        return Ok(false);
    };
    let Some((top, bottom)) = columns(&w)? else {
        return Ok(false);
    };
    if !needs_borrow(&top, &bottom) {
        return Ok(false);
    }
    let diffs = (0..top.len()).map(|place| {
        let (t, b) = (digit_at(&top, place), digit_at(&bottom, place));
        if t < b {
            t + 10 - b
        } else {
            t - b
        }
    });
    Ok(w.user == from_columns(diffs)?)
}

/// Column algorithm where a zero crossed while borrowing becomes 10, not 9.
fn borrow_across_zero(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    let Some(w) = subtraction(attempt)? else {
        return Ok(false);
    };
    let Some((top, bottom)) = columns(&w)? else {
        return Ok(false);
    };
    let mut working: Vec<i64> = top.iter().map(|&d| i64::from(d)).collect();
    let mut crossed_zero = false;
    let mut diffs = Vec::with_capacity(working.len());

    for place in 0..working.len() {
        let b = digit_at(&bottom, place);
        if working[place] < b {
            working[place] += 10;
            let mut lender = place + 1;
            while lender < working.len() && working[lender] == 0 {
                working[lender] = 10;
                crossed_zero = true;
                lender += 1;
            }
            if lender < working.len() {
                working[lender] -= 1;
            }
        }
        diffs.push(working[place] - b);
    }

    Ok(crossed_zero && w.user == from_columns(diffs)?)
}

fn reversed_operands(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    let Some(w) = subtraction(attempt)? else {
        return Ok(false);
    };
    let reversed = w
        .b
        .checked_sub(w.a)
        .ok_or(DetectionError::Overflow("reversed difference"))?;
    Ok(w.user == reversed)
}

fn added(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    let Some(w) = subtraction(attempt)? else {
        return Ok(false);
    };
    let sum = w.a.checked_add(w.b).ok_or(DetectionError::Overflow("sum"))?;
    Ok(w.b != 0 && w.user == sum)
}

fn off_by_one(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    Ok(subtraction(attempt)?.is_some_and(|w| w.distance() == 1))
}

fn off_by_ten(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    Ok(subtraction(attempt)?.is_some_and(|w| w.distance() == 10))
}

/// Only for problems generated with the `think_addition` strategy.
fn missing_addend_confusion(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    if !attempt.problem.uses_strategy("think_addition") {
        return Ok(false);
    }
    Ok(subtraction(attempt)?.is_some_and(|w| w.user == w.b))
}

fn zero_identity_confusion(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    let Some(w) = subtraction(attempt)? else {
        return Ok(false);
    };
    let minus_zero = w.b == 0 && w.a != 0 && w.user == 0;
    let minus_self = w.a == w.b && w.a != 0 && w.user == w.a;
    Ok(minus_zero || minus_self)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Problem;

    fn check(rule: fn(&AttemptRecord) -> Result<bool, DetectionError>, problem: Problem, answer: i64) -> bool {
        rule(&AttemptRecord::answered(problem, answer)).expect("detector should evaluate")
    }

    #[test]
    fn test_smaller_from_larger() {
        assert!(check(smaller_from_larger, Problem::subtraction(53, 28), 35));
        assert!(check(smaller_from_larger, Problem::subtraction(42, 17), 35));
        assert!(check(smaller_from_larger, Problem::subtraction(503, 127), 424));
        assert!(!check(smaller_from_larger, Problem::subtraction(53, 28), 36));
        // no column needs a borrow
        assert!(!check(smaller_from_larger, Problem::subtraction(58, 23), 36));
    }

    #[test]
    fn test_borrow_no_decrement() {
        assert!(check(borrow_no_decrement, Problem::subtraction(62, 37), 35));
        assert!(check(borrow_no_decrement, Problem::subtraction(503, 127), 486));
        assert!(!check(borrow_no_decrement, Problem::subtraction(62, 37), 26));
    }

    #[test]
    fn test_borrow_across_zero() {
        assert!(check(borrow_across_zero, Problem::subtraction(503, 127), 386));
        assert!(check(borrow_across_zero, Problem::subtraction(500, 123), 387));
        // no zero to cross
        assert!(!check(borrow_across_zero, Problem::subtraction(62, 37), 35));
    }

    #[test]
    fn test_operand_and_operation_slips() {
        assert!(check(reversed_operands, Problem::subtraction(9, 4), -5));
        assert!(check(added, Problem::subtraction(9, 4), 13));
        assert!(!check(added, Problem::addition(9, 4), 14));
        assert!(check(off_by_one, Problem::subtraction(13, 5), 9));
        assert!(check(off_by_ten, Problem::subtraction(53, 28), 35));
    }

    #[test]
    fn test_missing_addend_confusion_needs_strategy() {
        let think = Problem::subtraction(13, 5).with_strategy("think_addition");
        assert!(check(missing_addend_confusion, think, 5));
        assert!(!check(missing_addend_confusion, Problem::subtraction(13, 5), 5));
    }

    #[test]
    fn test_zero_identity_confusion() {
        assert!(check(zero_identity_confusion, Problem::subtraction(7, 0), 0));
        assert!(check(zero_identity_confusion, Problem::subtraction(7, 7), 7));
        assert!(!check(zero_identity_confusion, Problem::subtraction(7, 1), 0));
    }

    #[test]
    fn test_operands_out_of_order_do_not_match_column_rules() {
        let attempt = AttemptRecord::answered(Problem::subtraction(28, 53), 35);
        assert_eq!(smaller_from_larger(&attempt), Ok(false));
        assert_eq!(borrow_across_zero(&attempt), Ok(false));
    }
}
