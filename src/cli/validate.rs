//! Validate command implementation
//!
//! `formrules validate <rule> <values>...` evaluates values server-side. One
//! value is validated as a scalar; several are validated element by element
//! unless `--joint` hands them to the rule as one unit.

use crate::cli::GlobalOptions;
use crate::cli::common::{Context, EXIT_ERROR, EXIT_FAILED, EXIT_SUCCESS};
use crate::config::OutputFormat;
use crate::error::FormRulesError;
use crate::output::{HumanFormatter, JsonlFormatter, ValidationReport};
use crate::types::FieldValue;

/// Run the validate command
///
/// # Returns
///
/// Exit code:
/// - 0: Every value passed
/// - 1: At least one value failed
/// - 2: Error
pub fn run_validate(
    rule: &str,
    values: &[String],
    format: Option<&str>,
    joint: bool,
    output: Option<OutputFormat>,
    globals: &GlobalOptions<'_>,
) -> i32 {
    match run_validate_inner(rule, values, format, joint, output, globals) {
        Ok(true) => EXIT_SUCCESS,
        Ok(false) => EXIT_FAILED,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    }
}

fn run_validate_inner(
    rule: &str,
    values: &[String],
    format: Option<&str>,
    joint: bool,
    output: Option<OutputFormat>,
    globals: &GlobalOptions<'_>,
) -> Result<bool, FormRulesError> {
    let context = Context::load(globals.config)?;

    let submitted = match values {
        [single] if !joint => FieldValue::from(single.as_str()),
        _ => FieldValue::from(values.to_vec()),
    };

    let outcome = context.registry.validate(rule, &submitted, format, joint)?;
    let report = ValidationReport {
        rule: rule.to_string(),
        format: format.map(str::to_string),
        joint,
        values: values.to_vec(),
        outcome,
    };

    match context.output_format(output) {
        OutputFormat::Human => {
            let mut stdout = context.stdout(globals.color);
            HumanFormatter::new().write_validation(&mut stdout, &report)?;
        }
        OutputFormat::Jsonl => {
            print!("{}", JsonlFormatter::new().format_validation(&report));
        }
    }

    Ok(report.passed())
}
