//! Formrules CLI entry point

use clap::Parser;
use formrules::cli::Cli;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Cli::parse();

    // stdout carries command output, logs go to stderr
    let filter =
        EnvFilter::try_from_env("FORMRULES_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    process::exit(formrules::cli::run(&args));
}
