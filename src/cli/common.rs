//! Common helper functions shared across CLI commands
//!
//! This module provides shared functionality for loading configuration,
//! building the rule registry and choosing output settings.

use crate::config::{ColorOption, Config, OutputFormat};
use crate::error::{ConfigError, FormRulesError};
use crate::rules::RuleRegistry;
use std::io::IsTerminal;
use std::path::Path;
use termcolor::{ColorChoice, StandardStream};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Configuration file picked up from the working directory
pub const CONFIG_FILE: &str = "formrules.toml";

/// Configuration and registry shared by every command
pub(crate) struct Context {
    pub config: Option<Config>,
    pub registry: RuleRegistry,
}

impl Context {
    /// Load configuration and build the registry from it
    ///
    /// An explicit path must exist. Without one, `formrules.toml` in the
    /// working directory is used when present, else only built-ins are bound.
    pub(crate) fn load(config_path: Option<&Path>) -> Result<Self, FormRulesError> {
        let config = load_config(config_path)?;
        let registry = match &config {
            Some(config) => RuleRegistry::from_config(config)?,
            None => RuleRegistry::with_builtins()?,
        };
        Ok(Self { config, registry })
    }

    /// The requested format, else the configured one
    pub(crate) fn output_format(&self, requested: Option<OutputFormat>) -> OutputFormat {
        requested
            .or_else(|| self.config.as_ref().map(|c| c.output.format))
            .unwrap_or_default()
    }

    /// Stdout stream honoring the requested or configured color setting
    pub(crate) fn stdout(&self, requested: Option<ColorOption>) -> StandardStream {
        let option = requested
            .or_else(|| self.config.as_ref().map(|c| c.output.color))
            .unwrap_or_default();
        StandardStream::stdout(color_choice(option, std::io::stdout().is_terminal()))
    }
}

/// Load the configuration file, if any
///
/// # Errors
///
/// Returns `ConfigError::Io` if an explicit path cannot be read, and
/// `ConfigError::Parse` or `ConfigError::Validation` for an invalid file.
pub(crate) fn load_config(config_path: Option<&Path>) -> Result<Option<Config>, ConfigError> {
    match config_path {
        Some(path) => Config::load(path).map(Some),
        None => {
            let default_path = Path::new(CONFIG_FILE);
            if default_path.exists() {
                tracing::debug!(path = %default_path.display(), "loading configuration");
                Config::load(default_path).map(Some)
            } else {
                Ok(None)
            }
        }
    }
}

fn color_choice(option: ColorOption, is_terminal: bool) -> ColorChoice {
    match option {
        ColorOption::Always => ColorChoice::Always,
        ColorOption::Never => ColorChoice::Never,
        ColorOption::Auto if is_terminal => ColorChoice::Auto,
        ColorOption::Auto => ColorChoice::Never,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_explicit_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        fs::write(
            &path,
            "[formrules]\nversion = \"1\"\n\n[rules]\nzip = { kind = \"regex\", pattern = \"^[0-9]{5}$\" }\n",
        )
        .unwrap();

        let context = Context::load(Some(path.as_path())).unwrap();
        assert!(context.config.is_some());
        assert!(context.registry.contains("zip"));
        assert!(context.registry.contains("required"));
    }

    #[test]
    fn test_load_missing_explicit_config() {
        let temp = TempDir::new().unwrap();
        let result = load_config(Some(temp.path().join("missing.toml").as_path()));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_output_format_precedence() {
        let config = Config::parse("[formrules]\nversion = \"1\"\n\n[output]\nformat = \"jsonl\"\n")
            .unwrap();
        let context = Context {
            registry: RuleRegistry::from_config(&config).unwrap(),
            config: Some(config),
        };
        assert_eq!(context.output_format(None), OutputFormat::Jsonl);
        assert_eq!(
            context.output_format(Some(OutputFormat::Human)),
            OutputFormat::Human
        );

        let bare = Context {
            config: None,
            registry: RuleRegistry::new(),
        };
        assert_eq!(bare.output_format(None), OutputFormat::Human);
    }

    #[test]
    fn test_color_choice() {
        assert_eq!(color_choice(ColorOption::Always, false), ColorChoice::Always);
        assert_eq!(color_choice(ColorOption::Never, true), ColorChoice::Never);
        assert_eq!(color_choice(ColorOption::Auto, true), ColorChoice::Auto);
        assert_eq!(color_choice(ColorOption::Auto, false), ColorChoice::Never);
    }
}
