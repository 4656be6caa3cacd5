//! Error types for formrules
//!
//! Configuration problems (unknown rule names, malformed element descriptors,
//! bad patterns) are errors. A value that simply fails a rule is not: that is
//! reported through [`crate::types::Outcome`].

use crate::types::RuleKind;

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid TOML syntax or shape
    #[error("Invalid configuration syntax: {0}")]
    Parse(#[from] toml::de::Error),

    /// Semantically invalid configuration
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Rule-related errors
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Lookup of a rule name that was never registered
    #[error("Unknown rule: {0}")]
    UnknownRule(String),

    /// Invalid rule definition
    #[error("Invalid rule definition: {0}")]
    InvalidDefinition(String),

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidRegex(String),

    /// A rule name is already bound to a different kind
    #[error("Rule '{name}' is already bound to kind '{existing}', cannot rebind to '{requested}'")]
    KindConflict {
        name: String,
        existing: RuleKind,
        requested: RuleKind,
    },

    /// Element descriptor fields contradict its kind
    #[error("Malformed element descriptor '{element}': {reason}")]
    MalformedDescriptor { element: String, reason: String },

    /// Rule was asked to compare several values jointly but only handles scalars
    #[error("Rule '{0}' does not support joint validation of multiple values")]
    UnsupportedJoint(String),
}

impl RuleError {
    pub(crate) fn malformed(element: &str, reason: impl Into<String>) -> Self {
        RuleError::MalformedDescriptor {
            element: element.to_string(),
            reason: reason.into(),
        }
    }
}

/// Top-level error type for formrules
#[derive(Debug, thiserror::Error)]
pub enum FormRulesError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rule error
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// Element descriptor input could not be decoded
    #[error("Invalid element description: {0}")]
    Descriptor(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_conflict_message() {
        let err = RuleError::KindConflict {
            name: "zip".to_string(),
            existing: RuleKind::Regex,
            requested: RuleKind::Callback,
        };
        assert_eq!(
            err.to_string(),
            "Rule 'zip' is already bound to kind 'regex', cannot rebind to 'callback'"
        );
    }

    #[test]
    fn test_rule_error_converts_to_top_level() {
        let err: FormRulesError = RuleError::UnknownRule("nope".to_string()).into();
        assert!(matches!(err, FormRulesError::Rule(RuleError::UnknownRule(_))));
        assert_eq!(err.to_string(), "Rule error: Unknown rule: nope");
    }

    #[test]
    fn test_malformed_helper() {
        let err = RuleError::malformed("opts", "group has no children");
        assert_eq!(
            err.to_string(),
            "Malformed element descriptor 'opts': group has no children"
        );
    }
}
