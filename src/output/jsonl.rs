#![forbid(unsafe_code)]

//! JSONL output formatter for machine-readable output
//!
//! Outputs one JSON object per line. Every record carries a `type` field:
//! `validation` for a verdict, `rule` for each bound rule name followed by a
//! single `summary` record.

use crate::output::{RuleListing, ValidationReport};
use crate::types::{Outcome, RuleKind};
use serde::Serialize;

/// JSONL output formatter
pub struct JsonlFormatter;

impl JsonlFormatter {
    pub fn new() -> Self {
        JsonlFormatter
    }

    /// Format a validation verdict as one JSONL record
    pub fn format_validation(&self, report: &ValidationReport) -> String {
        let record = ValidationRecord {
            record_type: "validation",
            rule: &report.rule,
            format: report.format.as_deref(),
            joint: report.joint,
            values: &report.values,
            outcome: report.outcome,
            passed: report.passed(),
        };
        line(&record)
    }

    /// Format bound rule names, one record each, then a summary record
    pub fn format_rules(&self, rules: &[RuleListing]) -> String {
        let mut output = String::new();
        for rule in rules {
            output.push_str(&line(&RuleRecord {
                record_type: "rule",
                name: &rule.name,
                kind: rule.kind,
            }));
        }
        output.push_str(&line(&SummaryRecord {
            record_type: "summary",
            rules: rules.len(),
        }));
        output
    }
}

impl Default for JsonlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn line<T: Serialize>(record: &T) -> String {
    match serde_json::to_string(record) {
        Ok(json) => json + "\n",
        Err(_) => String::new(),
    }
}

#[derive(Debug, Serialize)]
struct ValidationRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    rule: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a str>,
    joint: bool,
    values: &'a [String],
    outcome: Outcome,
    passed: bool,
}

#[derive(Debug, Serialize)]
struct RuleRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    name: &'a str,
    kind: RuleKind,
}

#[derive(Debug, Serialize)]
struct SummaryRecord {
    #[serde(rename = "type")]
    record_type: &'static str,
    rules: usize,
}
