#![forbid(unsafe_code)]

//! Core Rule trait and the client-side template it produces

use crate::error::RuleError;
use crate::types::{FieldValue, RuleKind, RuleName};

/// Placeholder standing for "the value under test" inside a [`ScriptTemplate`]
pub const VALUE_PLACEHOLDER: &str = "{jsVar}";

/// Client-side fragments a rule contributes to an emitted block
///
/// `condition` is a boolean expression that is true when the value FAILS the
/// rule. It refers to the value under test through [`VALUE_PLACEHOLDER`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScriptTemplate {
    /// Statements emitted once before the check, e.g. a regex declaration
    pub prefix: String,

    /// Failure expression containing the value placeholder
    pub condition: String,
}

impl ScriptTemplate {
    pub fn new(prefix: impl Into<String>, condition: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            condition: condition.into(),
        }
    }

    /// The condition with the placeholder bound to `subject`
    pub fn condition_for(&self, subject: &str) -> String {
        self.condition.replace(VALUE_PLACEHOLDER, subject)
    }
}

/// Trait that all rules must implement
///
/// A rule instance may serve many rule names, so every operation receives the
/// name it is being evaluated under. The trait is `Send + Sync` so a built
/// registry can be shared between request handlers.
pub trait Rule: Send + Sync {
    /// Implementation family of this rule
    fn kind(&self) -> RuleKind;

    /// Evaluates a single submitted value
    ///
    /// Returns `Ok(false)` when the value does not satisfy the rule. Errors are
    /// reserved for misconfiguration such as a missing or invalid pattern.
    fn validate(
        &self,
        name: &RuleName,
        value: &FieldValue,
        format: Option<&str>,
    ) -> Result<bool, RuleError>;

    /// Counts the values that pass, each evaluated on its own
    ///
    /// Rules with per-call setup (such as compiling a pattern from `format`)
    /// override this to do that work once for the whole list.
    fn count_passing(
        &self,
        name: &RuleName,
        values: &[FieldValue],
        format: Option<&str>,
    ) -> Result<usize, RuleError> {
        let mut passed = 0;
        for value in values {
            if self.validate(name, value, format)? {
                passed += 1;
            }
        }
        Ok(passed)
    }

    /// Evaluates a group of values as one unit (cross-field checks)
    ///
    /// Scalar-only rules keep the default, which rejects the call.
    fn validate_joint(
        &self,
        name: &RuleName,
        values: &[FieldValue],
        format: Option<&str>,
    ) -> Result<bool, RuleError> {
        let _ = (values, format);
        Err(RuleError::UnsupportedJoint(name.to_string()))
    }

    /// Returns the client-side template for this rule name
    fn script(&self, name: &RuleName, format: Option<&str>) -> Result<ScriptTemplate, RuleError>;
}
