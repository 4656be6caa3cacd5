#![forbid(unsafe_code)]

//! Human-readable output formatter
//!
//! Writes through `termcolor` so the same code serves colored terminals,
//! plain pipes and in-memory buffers in tests.

use crate::output::{RuleListing, ValidationReport};
use crate::types::Outcome;
use std::io::{self, Write};
use termcolor::{Color, ColorSpec, WriteColor};

/// Human-readable formatter
pub struct HumanFormatter;

impl HumanFormatter {
    pub fn new() -> Self {
        HumanFormatter
    }

    /// Write a validation verdict
    pub fn write_validation<W: WriteColor>(
        &self,
        out: &mut W,
        report: &ValidationReport,
    ) -> io::Result<()> {
        let (icon, color, verdict) = if report.passed() {
            ("✓", Color::Green, "passed")
        } else {
            ("✗", Color::Red, "failed")
        };

        out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(out, "{} {}", icon, verdict)?;
        out.reset()?;

        write!(out, ": {}", report.rule)?;
        if let Some(format) = &report.format {
            write!(out, " ({})", format)?;
        }
        writeln!(out)?;

        match report.outcome {
            Outcome::Count(count) => {
                writeln!(out, "  {} of {} values passed", count, report.values.len())?;
            }
            Outcome::Passed(_) if report.joint => {
                writeln!(out, "  {} values compared jointly", report.values.len())?;
            }
            Outcome::Passed(_) => {}
        }

        Ok(())
    }

    /// Write the table of bound rule names
    pub fn write_rules<W: WriteColor>(&self, out: &mut W, rules: &[RuleListing]) -> io::Result<()> {
        if rules.is_empty() {
            writeln!(out, "No rules are bound.")?;
            return Ok(());
        }

        writeln!(out, "Rules ({} bound):", rules.len())?;
        writeln!(out)?;

        let width = rules.iter().map(|r| r.name.len()).max().unwrap_or(0);
        for rule in rules {
            out.set_color(ColorSpec::new().set_bold(true))?;
            write!(out, "  {:<width$}", rule.name, width = width)?;
            out.reset()?;
            out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
            write!(out, "  {}", rule.kind)?;
            out.reset()?;
            writeln!(out)?;
        }

        Ok(())
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RuleKind;
    use termcolor::Buffer;

    fn render(f: impl FnOnce(&mut Buffer) -> io::Result<()>) -> String {
        let mut buffer = Buffer::no_color();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer.into_inner()).unwrap()
    }

    fn report(values: &[&str], outcome: Outcome) -> ValidationReport {
        ValidationReport {
            rule: "nonzero".to_string(),
            format: None,
            joint: false,
            values: values.iter().map(|v| v.to_string()).collect(),
            outcome,
        }
    }

    #[test]
    fn test_passed_scalar() {
        let output = render(|out| {
            HumanFormatter::new().write_validation(out, &report(&["42"], Outcome::Passed(true)))
        });
        assert_eq!(output, "✓ passed: nonzero\n");
    }

    #[test]
    fn test_failed_count() {
        let output = render(|out| {
            HumanFormatter::new()
                .write_validation(out, &report(&["0", "5", "-3"], Outcome::Count(2)))
        });
        assert_eq!(output, "✗ failed: nonzero\n  2 of 3 values passed\n");
    }

    #[test]
    fn test_format_and_joint() {
        let report = ValidationReport {
            rule: "compare".to_string(),
            format: Some("lt".to_string()),
            joint: true,
            values: vec!["1".to_string(), "2".to_string()],
            outcome: Outcome::Passed(true),
        };
        let output = render(|out| HumanFormatter::new().write_validation(out, &report));
        assert_eq!(output, "✓ passed: compare (lt)\n  2 values compared jointly\n");
    }

    #[test]
    fn test_rules_table_is_aligned() {
        let rules = vec![
            RuleListing {
                name: "email".to_string(),
                kind: RuleKind::Email,
            },
            RuleListing {
                name: "rangelength".to_string(),
                kind: RuleKind::Range,
            },
        ];
        let output = render(|out| HumanFormatter::new().write_rules(out, &rules));
        assert!(output.starts_with("Rules (2 bound):\n\n"));
        assert!(output.contains("  email        email\n"));
        assert!(output.contains("  rangelength  range\n"));
    }

    #[test]
    fn test_no_rules() {
        let output = render(|out| HumanFormatter::new().write_rules(out, &[]));
        assert_eq!(output, "No rules are bound.\n");
    }
}
