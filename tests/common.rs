//! Test utilities for formrules integration tests

#![allow(dead_code)]

use formrules::{FieldValue, RuleName, RuleRegistry};
use std::fs;
use std::path::{Path, PathBuf};

/// Result type alias for tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Extract Ok value or panic with context
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("assertion failed: expected Ok, got Err({:?})", e),
        }
    };
    ($expr:expr, $msg:literal) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Extract Some value or panic with context
#[macro_export]
macro_rules! assert_some {
    ($expr:expr) => {
        match $expr {
            Some(v) => v,
            None => panic!("assertion failed: expected Some, got None"),
        }
    };
    ($expr:expr, $msg:literal) => {
        match $expr {
            Some(v) => v,
            None => panic!("{}: got None", $msg),
        }
    };
}

/// Registry with every built-in rule bound
pub fn builtins() -> RuleRegistry {
    assert_ok!(RuleRegistry::with_builtins(), "built-in rules must load")
}

pub fn rule(name: &str) -> RuleName {
    assert_some!(RuleName::new(name), "test rule names are valid")
}

pub fn text(value: &str) -> FieldValue {
    FieldValue::from(value)
}

pub fn list(values: &[&str]) -> FieldValue {
    FieldValue::from(values.to_vec())
}

/// Write a file into `dir` and return its path
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    assert_ok!(fs::write(&path, content), "failed to write test file");
    path
}
