//! Place-value misunderstandings in multi-digit answers.
//!
//! These rules apply to both addition and subtraction. Most of them compare
//! the written digits of the user's answer with those of the correct one, so
//! they only look at non-negative answers.

use super::digits::{
    digit_count, digits, is_zero_deletion, needs_carry, pow10, wrong_answer,
    wrong_answer_any, WrongAnswer,
};
use super::{never, RuleDetector};
use crate::domain::errors::DetectionError;
use crate::domain::models::{AttemptRecord, Operation, PatternCategory, PatternRule, Severity};

const CATEGORY: PatternCategory = PatternCategory::LargeNumbers;

pub fn rules() -> Vec<RuleDetector> {
    vec![
        RuleDetector::new(
            PatternRule::new(
                "large_left_aligned",
                CATEGORY,
                Severity::Major,
                "Lines numbers up on the left",
                "Aligns the shorter number under the leftmost digits (345 + 21 = 555).",
                "Lines digits up as written text instead of by place value.",
                &["place_value", "column_alignment"],
            ),
            left_aligned,
        ),
        RuleDetector::new(
            PatternRule::new(
                "large_dropped_placeholder_zero",
                CATEGORY,
                Severity::Major,
                "Drops placeholder zeros",
                "Leaves out a zero inside the answer (300 + 105 = 45).",
                "Thinks zero means nothing, so it need not be written.",
                &["place_value", "zero_placeholder"],
            ),
            dropped_placeholder_zero,
        ),
        RuleDetector::new(
            PatternRule::new(
                "large_extra_zero",
                CATEGORY,
                Severity::Moderate,
                "Adds a stray zero",
                "Writes one zero too many (200 + 5 = 2005).",
                "Writes numbers the way they are said, putting down a zero for each named place.",
                &["place_value", "zero_placeholder"],
            ),
            extra_zero,
        ),
        RuleDetector::new(
            PatternRule::new(
                "large_expanded_concatenation",
                CATEGORY,
                Severity::Major,
                "Writes expanded form side by side",
                "Writes the parts of the answer next to each other (567 written as 500607).",
                "Knows the value of each digit but not that the parts combine into one numeral.",
                &["place_value", "expanded_form"],
            ),
            expanded_concatenation,
        ),
        RuleDetector::new(
            PatternRule::new(
                "large_digits_reversed",
                CATEGORY,
                Severity::Moderate,
                "Reverses the digits",
                "Writes the answer's digits in reverse order (42 written as 24).",
                "Reads or writes the columns from right to left.",
                &["place_value", "numeral_writing"],
            ),
            digits_reversed,
        ),
        RuleDetector::new(
            PatternRule::new(
                "large_adjacent_transposition",
                CATEGORY,
                Severity::Minor,
                "Swaps two neighbouring digits",
                "Two adjacent digits of the answer are swapped (352 written as 325).",
                "Loses track of place while copying a long numeral.",
                &["numeral_writing"],
            ),
            adjacent_transposition,
        ),
        RuleDetector::new(
            PatternRule::new(
                "large_final_carry_dropped",
                CATEGORY,
                Severity::Major,
                "Drops the final carry",
                "Leaves off the carry out of the leftmost column (75 + 48 = 23).",
                "Thinks the answer cannot have more digits than the numbers being added.",
                &["place_value", "regrouping"],
            ),
            final_carry_dropped,
        ),
        RuleDetector::new(
            PatternRule::new(
                "large_magnitude_slip",
                CATEGORY,
                Severity::Moderate,
                "Answer ten times too big or small",
                "The answer's digits are right but shifted one place (120 for 12, or 12 for 120).",
                "Does not check the size of the answer against the size of the numbers.",
                &["place_value", "estimation"],
            ),
            magnitude_slip,
        ),
        RuleDetector::new(
            PatternRule::new(
                "large_rounded_estimate",
                CATEGORY,
                Severity::Minor,
                "Gives an estimate",
                "Answers with the exact answer rounded to the nearest ten or hundred.",
                "Treats an estimate as the answer once the numbers get large.",
                &["estimation"],
            ),
            rounded_estimate,
        ),
        RuleDetector::new(
            PatternRule::new(
                "large_place_value_naming",
                CATEGORY,
                Severity::Moderate,
                "Cannot name place values",
                "Cannot say which place a digit is in or what it is worth.",
                "Has learned column procedures without place names. Needs a naming question to detect.",
                &["place_value"],
            ),
            never,
        ),
    ]
}

/// Wrong answer whose user and correct values are both non-negative.
fn non_negative(attempt: &AttemptRecord) -> Result<Option<WrongAnswer>, DetectionError> {
    Ok(wrong_answer_any(attempt)?.filter(|w| w.user >= 0 && w.correct >= 0))
}

fn left_aligned(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    let Some(w) = wrong_answer_any(attempt)? else {
        return Ok(false);
    };
    if w.a < 0 || w.b < 0 || w.magnitude() < 100 {
        return Ok(false);
    }
    let (len_a, len_b) = (digit_count(w.a)?, digit_count(w.b)?);
    if len_a == len_b {
        return Ok(false);
    }
    let overflow = DetectionError::Overflow("left-aligned operand");
    let misaligned = match attempt.problem.operation {
        Operation::Addition => {
            let (longer, shorter, shift) = if len_a > len_b {
                (w.a, w.b, len_a - len_b)
            } else {
                (w.b, w.a, len_b - len_a)
            };
            shorter
                .checked_mul(pow10(shift)?)
                .and_then(|s| longer.checked_add(s))
                .ok_or(overflow)?
        }
        // only the subtrahend can be shifted under the minuend
        Operation::Subtraction if len_a > len_b => w
            .b
            .checked_mul(pow10(len_a - len_b)?)
            .and_then(|s| w.a.checked_sub(s))
            .ok_or(overflow)?,
        _ => return Ok(false),
    };
    Ok(misaligned != w.correct && w.user == misaligned)
}

fn dropped_placeholder_zero(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    Ok(non_negative(attempt)?.is_some_and(|w| {
        let correct = w.correct.to_string();
        correct.len() >= 2 && is_zero_deletion(&correct, &w.user.to_string())
    }))
}

fn extra_zero(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    Ok(non_negative(attempt)?.is_some_and(|w| {
        let (user, correct) = (w.user.to_string(), w.correct.to_string());
        user.len() == correct.len() + 1 && is_zero_deletion(&user, &correct)
    }))
}

/// Expanded form written as one numeral: 567 becomes "500607".
fn expanded_form(n: i64) -> Result<String, DetectionError> {
    let digits = digits(n)?;
    let mut out = String::new();
    for (place, &d) in digits.iter().enumerate().rev() {
        if d != 0 {
            out.push(char::from(b'0' + d));
            out.extend(std::iter::repeat('0').take(place));
        }
    }
    Ok(out)
}

fn expanded_concatenation(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    let Some(w) = non_negative(attempt)? else {
        return Ok(false);
    };
    if w.correct < 10 {
        return Ok(false);
    }
    Ok(w.user.to_string() == expanded_form(w.correct)?)
}

fn digits_reversed(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    Ok(non_negative(attempt)?.is_some_and(|w| {
        let reversed: String = w.correct.to_string().chars().rev().collect();
        w.correct >= 10 && reversed.trim_start_matches('0') == w.user.to_string()
    }))
}

fn adjacent_transposition(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    let Some(w) = non_negative(attempt)? else {
        return Ok(false);
    };
    let correct: Vec<char> = w.correct.to_string().chars().collect();
    let user: Vec<char> = w.user.to_string().chars().collect();
    if correct.len() < 3 || user.len() != correct.len() {
        return Ok(false);
    }
    let reversal: Vec<char> = correct.iter().rev().copied().collect();
    if user == reversal {
        return Ok(false);
    }
    let swapped = (0..correct.len() - 1).any(|i| {
        correct[i] != correct[i + 1] && {
            let mut candidate = correct.clone();
            candidate.swap(i, i + 1);
            candidate == user
        }
    });
    Ok(swapped)
}

fn final_carry_dropped(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    let Some(w) = wrong_answer(attempt, Operation::Addition)? else {
        return Ok(false);
    };
    if w.a < 0 || w.b < 0 || w.correct < 10 {
        return Ok(false);
    }
    let (a, b) = (digits(w.a)?, digits(w.b)?);
    let width = a.len().max(b.len());
    let answer_width = digit_count(w.correct)?;
    if answer_width <= width || !needs_carry(&a, &b) {
        return Ok(false);
    }
    Ok(w.user == w.correct % pow10(answer_width - 1)?)
}

fn magnitude_slip(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    let Some(w) = wrong_answer_any(attempt)? else {
        return Ok(false);
    };
    if w.correct == 0 {
        return Ok(false);
    }
    let tenfold = w.correct.checked_mul(10) == Some(w.user);
    let tenth = w.correct % 10 == 0 && w.user == w.correct / 10;
    Ok(tenfold || tenth)
}

fn round_to(n: i64, unit: i64) -> Option<i64> {
    n.checked_add(unit / 2)
        .map(|shifted| shifted.div_euclid(unit))
        .and_then(|q| q.checked_mul(unit))
}

fn rounded_estimate(attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    let Some(w) = wrong_answer_any(attempt)? else {
        return Ok(false);
    };
    let operands = w.a.unsigned_abs().max(w.b.unsigned_abs());
    if operands < 100 {
        return Ok(false);
    }
    Ok([10, 100]
        .into_iter()
        .any(|unit| round_to(w.correct, unit) == Some(w.user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Problem;

    fn check(rule: fn(&AttemptRecord) -> Result<bool, DetectionError>, problem: Problem, answer: i64) -> bool {
        rule(&AttemptRecord::answered(problem, answer)).expect("detector should evaluate")
    }

    #[test]
    fn test_left_aligned() {
        assert!(check(left_aligned, Problem::addition(345, 21), 555));
        assert!(check(left_aligned, Problem::addition(21, 345), 555));
        assert!(check(left_aligned, Problem::subtraction(345, 21), 135));
        // a longer subtrahend cannot be shifted
        assert!(!check(left_aligned, Problem::subtraction(21, 345), 21 - 3450));
        // two-digit problems are too small to tell
        assert!(!check(left_aligned, Problem::addition(34, 2), 54));
    }

    #[test]
    fn test_placeholder_zeros() {
        assert!(check(dropped_placeholder_zero, Problem::addition(300, 105), 45));
        assert!(check(dropped_placeholder_zero, Problem::subtraction(1500, 495), 15));
        assert!(!check(dropped_placeholder_zero, Problem::addition(300, 105), 415));

        assert!(check(extra_zero, Problem::addition(200, 5), 2005));
        assert!(!check(extra_zero, Problem::addition(200, 5), 20005));
    }

    #[test]
    fn test_expanded_concatenation() {
        assert_eq!(expanded_form(567).unwrap(), "500607");
        assert_eq!(expanded_form(405).unwrap(), "4005");
        assert!(check(expanded_concatenation, Problem::addition(345, 222), 500_607));
        assert!(!check(expanded_concatenation, Problem::addition(3, 4), 8));
    }

    #[test]
    fn test_reversals_and_transpositions() {
        assert!(check(digits_reversed, Problem::addition(30, 12), 24));
        assert!(check(digits_reversed, Problem::addition(100, 20), 21));
        assert!(!check(digits_reversed, Problem::addition(4, 3), 8));

        assert!(check(adjacent_transposition, Problem::addition(300, 52), 325));
        assert!(check(adjacent_transposition, Problem::addition(300, 52), 532));
        // full reversal belongs to the reversed-digits rule
        assert!(!check(adjacent_transposition, Problem::addition(300, 52), 253));
        assert!(!check(adjacent_transposition, Problem::addition(30, 12), 24));
    }

    #[test]
    fn test_final_carry_dropped() {
        assert!(check(final_carry_dropped, Problem::addition(75, 48), 23));
        assert!(check(final_carry_dropped, Problem::addition(999, 1), 0));
        assert!(!check(final_carry_dropped, Problem::addition(45, 48), 3));
        assert!(!check(final_carry_dropped, Problem::subtraction(123, 1), 22));
    }

    #[test]
    fn test_magnitude_slip() {
        assert!(check(magnitude_slip, Problem::addition(7, 5), 120));
        assert!(check(magnitude_slip, Problem::addition(70, 50), 12));
        assert!(!check(magnitude_slip, Problem::addition(7, 6), 1));
    }

    #[test]
    fn test_rounded_estimate() {
        assert!(check(rounded_estimate, Problem::addition(347, 218), 570));
        assert!(check(rounded_estimate, Problem::addition(347, 218), 600));
        assert!(!check(rounded_estimate, Problem::addition(47, 18), 70));
        assert!(!check(rounded_estimate, Problem::addition(347, 218), 560));
    }

    #[test]
    fn test_negative_answers_are_ignored_by_digit_rules() {
        let attempt = AttemptRecord::answered(Problem::subtraction(5, 50), -54);
        assert_eq!(digits_reversed(&attempt), Ok(false));
        assert_eq!(dropped_placeholder_zero(&attempt), Ok(false));
    }
}
