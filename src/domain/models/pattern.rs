//! Pattern rule metadata.
//!
//! A pattern rule names one conceptual error (its root cause, severity and
//! prerequisite skills). The detection predicate lives behind the
//! [`Detector`](crate::domain::ports::Detector) port.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Catalog category a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternCategory {
    Addition,
    Subtraction,
    LargeNumbers,
}

impl PatternCategory {
    pub const ALL: [Self; 3] = [Self::Addition, Self::Subtraction, Self::LargeNumbers];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Addition => "addition",
            Self::Subtraction => "subtraction",
            Self::LargeNumbers => "large_numbers",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "addition" | "add" => Some(Self::Addition),
            "subtraction" | "sub" => Some(Self::Subtraction),
            "large_numbers" | "large" => Some(Self::LargeNumbers),
            _ => None,
        }
    }
}

impl fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much a misunderstanding blocks further progress (1 = minor slip, 3 = conceptual).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Severity {
    Minor = 1,
    Moderate = 2,
    Major = 3,
}

impl Severity {
    pub fn level(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Minor),
            2 => Ok(Self::Moderate),
            3 => Ok(Self::Major),
            other => Err(format!("severity must be 1, 2 or 3, got {other}")),
        }
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity.level()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

/// Immutable metadata of one catalogued misunderstanding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternRule {
    pub id: String,
    pub category: PatternCategory,
    pub name: String,
    pub description: String,
    pub root_cause: String,
    pub severity: Severity,
    /// Skills the learner should hold before this pattern can be fixed.
    /// Metadata only; the catalog never enforces ordering.
    #[serde(default)]
    pub prerequisites: BTreeSet<String>,
}

impl PatternRule {
    pub fn new(
        id: &str,
        category: PatternCategory,
        severity: Severity,
        name: &str,
        description: &str,
        root_cause: &str,
        prerequisites: &[&str],
    ) -> Self {
        Self {
            id: id.to_string(),
            category,
            name: name.to_string(),
            description: description.to_string(),
            root_cause: root_cause.to_string(),
            severity,
            prerequisites: prerequisites.iter().map(|p| (*p).to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Severity::Major).unwrap(), "3");
        let parsed: Severity = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, Severity::Moderate);
        assert!(serde_json::from_str::<Severity>("4").is_err());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!(
            PatternCategory::from_str("large-numbers"),
            Some(PatternCategory::LargeNumbers)
        );
        assert_eq!(PatternCategory::from_str("SUB"), Some(PatternCategory::Subtraction));
        assert_eq!(PatternCategory::from_str("fractions"), None);
    }
}
