//! Configuration file parsing and validation

pub mod formrules_toml;

pub use formrules_toml::{
    ColorOption, Config, FormRulesMeta, OutputConfig, OutputFormat, RuleDefinition, ScriptConfig,
};
