#![forbid(unsafe_code)]

//! Named templates for the emitted client-side language
//!
//! The extraction dispatch and the assembly logic only talk to this trait, so
//! the target language of emitted blocks can change without touching them.

/// Pieces of one emitted check, ready to be laid out by a grammar
#[derive(Debug, Clone, Copy)]
pub struct CheckParts<'a> {
    /// Statements that read the value(s) under test
    pub extraction: &'a str,

    /// Rule-provided statements emitted before the check
    pub prefix: &'a str,

    /// Failure condition with the value placeholder already bound
    pub condition: &'a str,

    /// Error-flag key; a key reports its message at most once
    pub flag_key: &'a str,

    /// Failure message
    pub message: &'a str,

    /// Statements restoring default values, empty when reset is off
    pub reset: &'a str,
}

/// Target-language templates used by the script generator
pub trait ScriptGrammar: Send + Sync {
    /// Name of the local holding the extracted value
    fn value_var(&self) -> &str;

    /// Expression for the current element inside an aggregate loop
    fn loop_item(&self) -> &str;

    /// Expression addressing position `index` of `base`
    fn indexed(&self, base: &str, index: usize) -> String;

    /// Name under which a multi-valued control submits
    fn multiple_name(&self, name: &str) -> String;

    /// Initializes `slot` to an empty array
    fn new_array(&self, slot: &str) -> String;

    fn extract_field(&self, name: &str, slot: &str) -> String;
    fn extract_checkbox(&self, name: &str, slot: &str) -> String;
    fn extract_advanced_checkbox(&self, name: &str, slot: &str) -> String;
    fn extract_radio(&self, name: &str, slot: &str) -> String;
    fn extract_select(&self, name: &str, slot: &str) -> String;
    fn extract_select_multiple(&self, name: &str, slot: &str) -> String;

    /// Collects the values of every live control whose name is in `members`
    fn extract_group(&self, group: &str, members: &[String], slot: &str) -> String;

    /// Binds the control addressed by `name` for the reset statements that follow
    fn reset_target(&self, name: &str) -> String;

    fn reset_field(&self) -> String;
    fn reset_checkbox(&self) -> String;
    fn reset_advanced_checkbox(&self) -> String;
    fn reset_radio(&self) -> String;
    fn reset_select(&self) -> String;

    /// Restores defaults of every member of a group (uses the membership set
    /// declared by [`ScriptGrammar::extract_group`])
    fn reset_group(&self, group: &str) -> String;

    /// Check of a single extracted value
    fn check(&self, parts: &CheckParts<'_>) -> String;

    /// Loop over an extracted array counting failing elements, flagged when
    /// the count is below `howmany`
    fn aggregate_check(&self, parts: &CheckParts<'_>, howmany: usize) -> String;
}
