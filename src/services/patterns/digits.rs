//! Digit and column helpers shared by the detectors.
//!
//! Digit vectors are least-significant first: `digits(567) == [7, 6, 5]`.

use crate::domain::errors::DetectionError;
use crate::domain::models::{AttemptRecord, Operation};

/// The parts of a wrongly answered attempt detectors work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrongAnswer {
    pub a: i64,
    pub b: i64,
    pub user: i64,
    pub correct: i64,
}

impl WrongAnswer {
    /// Larger of the two operands and the correct answer, by magnitude.
    pub fn magnitude(&self) -> i64 {
        self.a
            .unsigned_abs()
            .max(self.b.unsigned_abs())
            .max(self.correct.unsigned_abs())
            .try_into()
            .unwrap_or(i64::MAX)
    }

    pub fn distance(&self) -> u64 {
        self.user.abs_diff(self.correct)
    }
}

/// Extract a wrong answer for `operation`.
///
/// `Ok(None)` when the attempt is for another operation or was answered
/// correctly; an error when an operand or either answer is missing.
pub fn wrong_answer(
    attempt: &AttemptRecord,
    operation: Operation,
) -> Result<Option<WrongAnswer>, DetectionError> {
    if attempt.problem.operation != operation {
        return Ok(None);
    }
    wrong_answer_any(attempt)
}

/// Like [`wrong_answer`] but for addition and subtraction alike.
pub fn wrong_answer_any(attempt: &AttemptRecord) -> Result<Option<WrongAnswer>, DetectionError> {
    if attempt.problem.operation == Operation::Other {
        return Ok(None);
    }
    let user = attempt
        .user_answer
        .ok_or(DetectionError::MissingField("user answer"))?;
    let correct = attempt
        .correct_answer
        .ok_or(DetectionError::MissingField("correct answer"))?;
    if user == correct {
        return Ok(None);
    }
    let (a, b) = attempt
        .problem
        .operands()
        .ok_or(DetectionError::MissingField("operand"))?;
    Ok(Some(WrongAnswer { a, b, user, correct }))
}

/// Decimal digits of a non-negative number, least significant first.
pub fn digits(n: i64) -> Result<Vec<u8>, DetectionError> {
    if n < 0 {
        return Err(DetectionError::NegativeOperand(n));
    }
    if n == 0 {
        return Ok(vec![0]);
    }
    let mut out = Vec::new();
    let mut rest = n;
    while rest > 0 {
        out.push(u8::try_from(rest % 10).unwrap_or_default());
        rest /= 10;
    }
    Ok(out)
}

/// `10^exp`, checked.
pub fn pow10(exp: usize) -> Result<i64, DetectionError> {
    u32::try_from(exp)
        .ok()
        .and_then(|e| 10_i64.checked_pow(e))
        .ok_or(DetectionError::Overflow("power of ten"))
}

/// Recombine column values (least significant first).
///
/// Columns may hold values above 9; each is weighted by its place.
pub fn from_columns<I>(columns: I) -> Result<i64, DetectionError>
where
    I: IntoIterator<Item = i64>,
{
    let mut total: i64 = 0;
    for (place, value) in columns.into_iter().enumerate() {
        let weighted = value
            .checked_mul(pow10(place)?)
            .ok_or(DetectionError::Overflow("column recombination"))?;
        total = total
            .checked_add(weighted)
            .ok_or(DetectionError::Overflow("column recombination"))?;
    }
    Ok(total)
}

/// Digit `place` of a digit vector, zero past its end.
pub fn digit_at(digits: &[u8], place: usize) -> i64 {
    digits.get(place).copied().map_or(0, i64::from)
}

/// Number of decimal digits in a non-negative number.
pub fn digit_count(n: i64) -> Result<usize, DetectionError> {
    Ok(digits(n)?.len())
}

/// Parse a digit string into a number, reporting overflow.
pub fn parse_digits(text: &str) -> Result<i64, DetectionError> {
    text.parse::<i64>()
        .map_err(|_| DetectionError::Overflow("digit string"))
}

/// Whether any column of `a + b` produces a carry.
pub fn needs_carry(a: &[u8], b: &[u8]) -> bool {
    (0..a.len().max(b.len())).any(|place| digit_at(a, place) + digit_at(b, place) >= 10)
}

/// Whether any column of `top - bottom` needs a borrow.
pub fn needs_borrow(top: &[u8], bottom: &[u8]) -> bool {
    (0..top.len().max(bottom.len())).any(|place| digit_at(top, place) < digit_at(bottom, place))
}

/// Whether `shorter` can be produced from `longer` by deleting only `0` characters.
pub fn is_zero_deletion(longer: &str, shorter: &str) -> bool {
    if shorter.len() >= longer.len() || shorter.is_empty() {
        return false;
    }
    let mut wanted = shorter.chars().peekable();
    for c in longer.chars() {
        match wanted.peek() {
            Some(&w) if w == c => {
                wanted.next();
            }
            _ if c == '0' => {}
            _ => return false,
        }
    }
    wanted.peek().is_none()
}
