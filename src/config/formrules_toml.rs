//! Parsing and validation for formrules.toml configuration files

use crate::error::ConfigError;
use crate::types::{RuleKind, RuleName};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Main configuration struct for formrules.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Formrules metadata
    pub formrules: FormRulesMeta,

    /// Identifiers of the enclosing client-side scaffold
    #[serde(default)]
    pub script: ScriptConfig,

    /// Additional rule bindings, applied on top of the built-ins
    #[serde(default)]
    pub rules: BTreeMap<RuleName, RuleDefinition>,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.formrules.version != "1" {
            return Err(ConfigError::Validation(format!(
                "Unsupported configuration version '{}'. Expected '1'",
                self.formrules.version
            )));
        }

        self.script.validate()?;

        for (name, definition) in &self.rules {
            match definition {
                RuleDefinition::Regex { pattern } => {
                    regex::Regex::new(pattern).map_err(|e| {
                        ConfigError::Validation(format!(
                            "Invalid pattern '{}' for rule '{}': {}",
                            pattern, name, e
                        ))
                    })?;
                }
                RuleDefinition::Callback { function, object } => {
                    if !crate::script::is_identifier(function) {
                        return Err(ConfigError::Validation(format!(
                            "Invalid client function '{}' for rule '{}'",
                            function, name
                        )));
                    }
                    if let Some(object) = object
                        && !crate::script::is_callee(object)
                    {
                        return Err(ConfigError::Validation(format!(
                            "Invalid client object '{}' for rule '{}'",
                            object, name
                        )));
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }
}

/// Formrules metadata section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormRulesMeta {
    /// Configuration version (must be "1")
    pub version: String,
}

/// Names of the ambient variables the emitted blocks refer to
///
/// The enclosing scaffold declares these before the blocks run: the form
/// handle, the per-key error flags, the accumulated message and the group
/// membership table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    pub form: String,
    pub error_flags: String,
    pub messages: String,
    pub groups: String,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            form: "frm".to_string(),
            error_flags: "errFlag".to_string(),
            messages: "_qfMsg".to_string(),
            groups: "_qfGroups".to_string(),
        }
    }
}

impl ScriptConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (key, ident) in [
            ("form", &self.form),
            ("error_flags", &self.error_flags),
            ("messages", &self.messages),
            ("groups", &self.groups),
        ] {
            if !crate::script::is_identifier(ident) {
                return Err(ConfigError::Validation(format!(
                    "Invalid script identifier '{}' for '{}'",
                    ident, key
                )));
            }
        }
        Ok(())
    }
}

/// A rule binding declared in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RuleDefinition {
    Regex {
        pattern: String,
    },
    Callback {
        function: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        object: Option<String>,
    },
    Required,
    Range,
    Email,
    Compare,
}

impl RuleDefinition {
    pub fn kind(&self) -> RuleKind {
        match self {
            RuleDefinition::Regex { .. } => RuleKind::Regex,
            RuleDefinition::Callback { .. } => RuleKind::Callback,
            RuleDefinition::Required => RuleKind::Required,
            RuleDefinition::Range => RuleKind::Range,
            RuleDefinition::Email => RuleKind::Email,
            RuleDefinition::Compare => RuleKind::Compare,
        }
    }
}

/// Output configuration section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default)]
    pub color: ColorOption,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON Lines format
    Jsonl,
}

/// Color output options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorOption {
    /// Auto-detect based on terminal capabilities
    #[default]
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}
