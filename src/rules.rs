#![forbid(unsafe_code)]

//! Rule definitions and registry

mod builtin;
mod callback;
mod regex_rule;
mod registry;
mod rule;

// Re-export core types
pub use builtin::{
    BUILTIN_BINDINGS, CompareOp, CompareRule, EMAIL_PATTERN, EmailRule, RangeRule, RequiredRule,
};
pub use callback::{Callback, CallbackRule, ServerCheck};
pub use regex_rule::{BUILTIN_PATTERNS, PatternRule};
pub use registry::{RuleRef, RuleRegistry};
pub use rule::{Rule, ScriptTemplate, VALUE_PLACEHOLDER};
