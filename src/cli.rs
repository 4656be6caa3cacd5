//! CLI argument parsing and command dispatch

pub mod args;
pub mod common;
pub mod list;
pub mod script;
pub mod validate;

// Re-export types for convenient access
pub use args::{Cli, ColorOption, Command, OutputFormat};
pub use script::ScriptRequest;

use std::path::Path;

/// Options that apply to every subcommand
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalOptions<'a> {
    pub config: Option<&'a Path>,
    pub color: Option<ColorOption>,
}

/// Execute a parsed command line and return the process exit code
pub fn run(cli: &Cli) -> i32 {
    let globals = GlobalOptions {
        config: cli.config.as_deref(),
        color: cli.color,
    };

    match &cli.command {
        Command::Validate {
            rule,
            values,
            format,
            joint,
            output,
        } => validate::run_validate(rule, values, format.as_deref(), *joint, *output, &globals),
        Command::Script {
            element,
            rule,
            message,
            name,
            group,
            reset,
            howmany,
            format,
        } => {
            let request = ScriptRequest {
                rule: rule.as_str(),
                message: message.as_str(),
                name: name.as_deref(),
                group: group.as_deref(),
                reset: *reset,
                howmany: *howmany,
                format: format.as_deref(),
            };
            script::run_script(element, &request, &globals)
        }
        Command::List { output } => list::run_list(*output, &globals),
    }
}
