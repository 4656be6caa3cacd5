#![forbid(unsafe_code)]

//! Formrules: form validation rules for both sides of the wire
//!
//! A rule registry binds rule names to implementations. Each rule validates
//! submitted values on the server and describes the same check as a
//! client-side template, which is assembled with element-specific value
//! extraction into a self-contained script block.

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod rules;
pub mod script;
pub mod types;

// Re-export error types for convenient access
pub use error::{ConfigError, FormRulesError, RuleError};

// Re-export core domain types for convenient access
pub use rules::{Callback, Rule, RuleRef, RuleRegistry, ScriptTemplate};
pub use types::{
    ElementDescriptor, ElementKind, ElementShape, FieldValue, GroupMember, Outcome,
    RuleApplication, RuleKind, RuleName,
};
