//! Output formatters (human and JSONL)

pub mod human;
pub mod jsonl;

pub use human::HumanFormatter;
pub use jsonl::JsonlFormatter;

use crate::types::{Outcome, RuleKind};

/// Result of validating command-line values against one rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub rule: String,
    pub format: Option<String>,
    pub joint: bool,
    pub values: Vec<String>,
    pub outcome: Outcome,
}

impl ValidationReport {
    /// Every value satisfied the rule
    ///
    /// A count outcome passes only when it covers all submitted values.
    pub fn passed(&self) -> bool {
        match self.outcome {
            Outcome::Passed(passed) => passed,
            Outcome::Count(count) => count == self.values.len(),
        }
    }
}

/// A bound rule name as shown by `formrules list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleListing {
    pub name: String,
    pub kind: RuleKind,
}
