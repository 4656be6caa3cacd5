#![forbid(unsafe_code)]

//! Client-side validation script generation
//!
//! Extraction fragments read live control values, reset fragments restore
//! defaults, and assembly merges them with a rule's template into one block.

mod assemble;
mod extract;
mod grammar;
mod javascript;

pub use assemble::{ScriptTarget, validation_script};
pub use extract::{Fragments, element_fragments, repeated_fragments};
pub use grammar::{CheckParts, ScriptGrammar};
pub use javascript::{JavaScript, escape_string, regex_literal};

pub(crate) use javascript::{is_callee, is_identifier};
