//! List command implementation
//!
//! This module implements the `formrules list` command, which lists every
//! bound rule name with the kind serving it, in name order.

use crate::cli::GlobalOptions;
use crate::cli::common::{Context, EXIT_ERROR, EXIT_SUCCESS};
use crate::config::OutputFormat;
use crate::error::FormRulesError;
use crate::output::{HumanFormatter, JsonlFormatter, RuleListing};
use crate::rules::RuleRegistry;

/// Run the list command
///
/// # Returns
///
/// Exit code:
/// - 0: Success
/// - 2: Error
pub fn run_list(output: Option<OutputFormat>, globals: &GlobalOptions<'_>) -> i32 {
    match run_list_inner(output, globals) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    }
}

fn run_list_inner(
    output: Option<OutputFormat>,
    globals: &GlobalOptions<'_>,
) -> Result<(), FormRulesError> {
    let context = Context::load(globals.config)?;
    let listings = listings(&context.registry);

    match context.output_format(output) {
        OutputFormat::Human => {
            let mut stdout = context.stdout(globals.color);
            HumanFormatter::new().write_rules(&mut stdout, &listings)?;
        }
        OutputFormat::Jsonl => {
            print!("{}", JsonlFormatter::new().format_rules(&listings));
        }
    }

    Ok(())
}

fn listings(registry: &RuleRegistry) -> Vec<RuleListing> {
    registry
        .rule_names()
        .map(|(name, kind)| RuleListing {
            name: name.to_string(),
            kind,
        })
        .collect()
}
