#![forbid(unsafe_code)]

//! Pattern-based rule implementation
//!
//! This module provides PatternRule, which holds one compiled pattern per rule
//! name and tests submitted values against it. Patterns are written in the
//! subset of syntax shared by the `regex` crate and JavaScript so the same
//! source drives both the server-side test and the emitted client check.

use crate::error::RuleError;
use crate::rules::{Rule, ScriptTemplate};
use crate::script::regex_literal;
use crate::types::{FieldValue, RuleKind, RuleName};
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;

/// Patterns available on every registry
pub const BUILTIN_PATTERNS: &[(&str, &str)] = &[
    ("lettersonly", r"^[a-zA-Z]+$"),
    ("alphanumeric", r"^[a-zA-Z0-9]+$"),
    ("numeric", r"(^-?[0-9][0-9]*\.[0-9]*$)|(^-?[0-9][0-9]*$)|(^-?\.[0-9][0-9]*$)"),
    ("nopunctuation", r#"^[^().*^?#!@$%+=,"'><~\[\]{}/]+$"#),
    ("nonzero", r"^-?[1-9][0-9]*"),
];

#[derive(Clone)]
struct CompiledPattern {
    source: String,
    regex: Regex,
}

impl CompiledPattern {
    fn compile(source: &str) -> Result<Self, RuleError> {
        let regex = Regex::new(source).map_err(|e| {
            RuleError::InvalidRegex(format!("Failed to compile pattern '{}': {}", source, e))
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }
}

/// A rule that matches values against regular expressions
///
/// Rule names without a pattern of their own (such as the bare `regex` name)
/// take the pattern from the application's `format`.
#[derive(Default)]
pub struct PatternRule {
    patterns: HashMap<RuleName, CompiledPattern>,
}

impl std::fmt::Debug for PatternRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.patterns.keys().map(RuleName::as_str).collect();
        names.sort_unstable();
        f.debug_struct("PatternRule").field("patterns", &names).finish()
    }
}

impl PatternRule {
    /// Create an empty PatternRule
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a PatternRule preloaded with [`BUILTIN_PATTERNS`]
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidRegex` if a built-in pattern fails to compile.
    pub fn with_builtins() -> Result<Self, RuleError> {
        let mut rule = Self::new();
        for (name, pattern) in BUILTIN_PATTERNS {
            let name = RuleName::new(*name).ok_or_else(|| {
                RuleError::InvalidDefinition(format!("Invalid built-in rule name: {}", name))
            })?;
            rule.add_pattern(name, pattern)?;
        }
        Ok(rule)
    }

    /// Add or replace the pattern for a rule name
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidRegex` if the pattern does not compile; the
    /// previous pattern, if any, is kept.
    pub fn add_pattern(&mut self, name: RuleName, pattern: &str) -> Result<(), RuleError> {
        let compiled = CompiledPattern::compile(pattern)?;
        self.patterns.insert(name, compiled);
        Ok(())
    }

    /// Pattern source registered for a rule name
    pub fn pattern(&self, name: &RuleName) -> Option<&str> {
        self.patterns.get(name).map(|p| p.source.as_str())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The name's own pattern, else one compiled from `format`
    fn resolve(
        &self,
        name: &RuleName,
        format: Option<&str>,
    ) -> Result<Cow<'_, CompiledPattern>, RuleError> {
        if let Some(pattern) = self.patterns.get(name) {
            return Ok(Cow::Borrowed(pattern));
        }
        match format {
            Some(source) => Ok(Cow::Owned(CompiledPattern::compile(source)?)),
            None => Err(RuleError::InvalidDefinition(format!(
                "Rule '{}' has no pattern and none was given as format",
                name
            ))),
        }
    }
}

impl Rule for PatternRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Regex
    }

    fn validate(
        &self,
        name: &RuleName,
        value: &FieldValue,
        format: Option<&str>,
    ) -> Result<bool, RuleError> {
        let pattern = self.resolve(name, format)?;
        Ok(value
            .as_text()
            .is_some_and(|text| pattern.regex.is_match(text)))
    }

    fn count_passing(
        &self,
        name: &RuleName,
        values: &[FieldValue],
        format: Option<&str>,
    ) -> Result<usize, RuleError> {
        let pattern = self.resolve(name, format)?;
        Ok(values
            .iter()
            .filter_map(FieldValue::as_text)
            .filter(|text| pattern.regex.is_match(text))
            .count())
    }

    fn script(&self, name: &RuleName, format: Option<&str>) -> Result<ScriptTemplate, RuleError> {
        let pattern = self.resolve(name, format)?;
        Ok(ScriptTemplate::new(
            format!("  var regex = {};\n", regex_literal(&pattern.source)),
            "{jsVar} != '' && !regex.test({jsVar})",
        ))
    }
}
