//! Pattern catalog: the static set of misunderstanding detectors.
//!
//! Rules are grouped by category:
//! - `addition`: single and multi-digit addition slips and strategy errors
//! - `subtraction`: borrowing, operand order and strategy errors
//! - `large_numbers`: place-value errors in multi-digit answers
//!
//! Every rule is a pure predicate over one attempt. A few are deliberately
//! inert: they name errors that can only be seen across many sessions
//! (e.g. commutativity gaps), so no single wrong answer can reveal them.

pub mod addition;
pub mod digits;
pub mod large_numbers;
pub mod subtraction;

use crate::domain::errors::DetectionError;
use crate::domain::models::{AttemptRecord, PatternCategory, PatternRule};
use crate::domain::ports::Detector;

/// Predicate signature shared by every built-in rule.
pub type DetectFn = fn(&AttemptRecord) -> Result<bool, DetectionError>;

/// A built-in rule: metadata paired with its predicate.
#[derive(Debug, Clone)]
pub struct RuleDetector {
    rule: PatternRule,
    predicate: DetectFn,
}

impl RuleDetector {
    pub fn new(rule: PatternRule, predicate: DetectFn) -> Self {
        Self { rule, predicate }
    }
}

impl Detector for RuleDetector {
    fn rule(&self) -> &PatternRule {
        &self.rule
    }

    fn detect(&self, attempt: &AttemptRecord) -> Result<bool, DetectionError> {
        (self.predicate)(attempt)
    }
}

/// Predicate for misunderstandings that need cross-session evidence.
pub(crate) fn never(_attempt: &AttemptRecord) -> Result<bool, DetectionError> {
    Ok(false)
}

/// Ordered, immutable collection of detectors.
pub struct PatternCatalog {
    detectors: Vec<Box<dyn Detector>>,
}

impl std::fmt::Debug for PatternCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternCatalog")
            .field("rules", &self.rules().map(|r| r.id.as_str()).collect::<Vec<_>>())
            .finish()
    }
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PatternCatalog {
    /// The built-in catalog: addition, subtraction, then large-number rules.
    pub fn builtin() -> Self {
        let detectors = addition::rules()
            .into_iter()
            .chain(subtraction::rules())
            .chain(large_numbers::rules())
            .map(|d| Box::new(d) as Box<dyn Detector>)
            .collect();
        Self { detectors }
    }

    /// A catalog of arbitrary detectors, in the given order.
    pub fn with_detectors(detectors: Vec<Box<dyn Detector>>) -> Self {
        Self { detectors }
    }

    pub fn detectors(&self) -> impl Iterator<Item = &dyn Detector> + '_ {
        self.detectors.iter().map(|d| {
            let detector: &dyn Detector = &**d;
            detector
        })
    }

    pub fn rules(&self) -> impl Iterator<Item = &PatternRule> + '_ {
        self.detectors().map(|d| d.rule())
    }

    pub fn get(&self, id: &str) -> Option<&dyn Detector> {
        self.detectors().find(|d| d.rule().id == id)
    }

    pub fn by_category(&self, category: PatternCategory) -> Vec<&PatternRule> {
        self.rules().filter(|r| r.category == category).collect()
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Problem, Severity};
    use std::collections::HashSet;

    #[test]
    fn test_builtin_catalog_shape() {
        let catalog = PatternCatalog::builtin();
        assert_eq!(catalog.len(), 30);
        for category in PatternCategory::ALL {
            assert_eq!(catalog.by_category(category).len(), 10, "{category}");
        }
    }

    #[test]
    fn test_rule_ids_are_unique() {
        let catalog = PatternCatalog::builtin();
        let ids: HashSet<&str> = catalog.rules().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_rule_ids_carry_category_prefix() {
        let catalog = PatternCatalog::builtin();
        for rule in catalog.rules() {
            let prefix = match rule.category {
                PatternCategory::Addition => "add_",
                PatternCategory::Subtraction => "sub_",
                PatternCategory::LargeNumbers => "large_",
            };
            assert!(rule.id.starts_with(prefix), "{} in {}", rule.id, rule.category);
        }
    }

    #[test]
    fn test_no_rule_matches_a_correct_answer() {
        let catalog = PatternCatalog::builtin();
        let attempts = [
            AttemptRecord::answered(Problem::addition(27, 15), 42),
            AttemptRecord::answered(Problem::subtraction(53, 28), 25),
            AttemptRecord::answered(Problem::addition(8, 5).with_strategy("make_ten"), 13),
            AttemptRecord::answered(Problem::subtraction(503, 127), 376),
        ];
        for attempt in &attempts {
            for detector in catalog.detectors() {
                assert_eq!(detector.detect(attempt), Ok(false), "{}", detector.rule().id);
            }
        }
    }

    #[test]
    fn test_get_by_id() {
        let catalog = PatternCatalog::builtin();
        let rule = catalog.get("sub_smaller_from_larger").expect("rule exists").rule();
        assert_eq!(rule.severity, Severity::Major);
        assert!(catalog.get("does_not_exist").is_none());
    }
}
