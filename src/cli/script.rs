//! Script command implementation
//!
//! `formrules script` reads element descriptors from a JSON file and prints
//! the client-side block for one rule application.

use crate::cli::GlobalOptions;
use crate::cli::common::{Context, EXIT_ERROR, EXIT_SUCCESS};
use crate::error::FormRulesError;
use crate::types::{ElementDescriptor, RuleApplication, RuleName};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Contents of an element file
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ElementInput {
    One(ElementDescriptor),
    Many(Vec<ElementDescriptor>),
}

/// Options of one `script` invocation
#[derive(Debug, Clone, Default)]
pub struct ScriptRequest<'a> {
    pub rule: &'a str,
    pub message: &'a str,
    pub name: Option<&'a str>,
    pub group: Option<&'a str>,
    pub reset: bool,
    pub howmany: Option<usize>,
    pub format: Option<&'a str>,
}

impl ScriptRequest<'_> {
    fn application(&self) -> Result<RuleApplication, FormRulesError> {
        let mut application =
            RuleApplication::new(RuleName::parse(self.rule)?, self.message).with_reset(self.reset);
        if let Some(format) = self.format {
            application = application.with_format(format);
        }
        if let Some(group) = self.group {
            application = application.in_group(group);
        }
        if let Some(howmany) = self.howmany {
            application = application.at_least(howmany);
        }
        Ok(application)
    }
}

/// Run the script command
///
/// # Returns
///
/// Exit code:
/// - 0: Block printed
/// - 2: Error
pub fn run_script(element: &Path, request: &ScriptRequest<'_>, globals: &GlobalOptions<'_>) -> i32 {
    match run_script_inner(element, request, globals) {
        Ok(script) => {
            print!("{}", script);
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    }
}

fn run_script_inner(
    element: &Path,
    request: &ScriptRequest<'_>,
    globals: &GlobalOptions<'_>,
) -> Result<String, FormRulesError> {
    let context = Context::load(globals.config)?;
    let input: ElementInput = serde_json::from_str(&fs::read_to_string(element)?)?;
    let application = request.application()?;

    let script = match &input {
        ElementInput::One(descriptor) => context.registry.validation_script(
            descriptor,
            request.name.unwrap_or(&descriptor.name),
            &application,
        )?,
        ElementInput::Many(descriptors) => {
            let default_name = descriptors.first().map(|d| d.name.as_str()).unwrap_or("");
            context.registry.validation_script(
                descriptors.as_slice(),
                request.name.unwrap_or(default_name),
                &application,
            )?
        }
    };

    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ElementKind;

    #[test]
    fn test_element_input_single() {
        let input: ElementInput =
            serde_json::from_str(r#"{"name": "email", "kind": "field"}"#).unwrap();
        match input {
            ElementInput::One(descriptor) => {
                assert_eq!(descriptor.name, "email");
                assert_eq!(descriptor.kind, ElementKind::Field);
            }
            other => panic!("Expected one descriptor, got {:?}", other),
        }
    }

    #[test]
    fn test_element_input_many() {
        let input: ElementInput = serde_json::from_str(
            r#"[{"name": "a", "kind": "field"}, {"name": "b", "kind": "select", "multiple": true}]"#,
        )
        .unwrap();
        match input {
            ElementInput::Many(descriptors) => {
                assert_eq!(descriptors.len(), 2);
                assert!(descriptors[1].multiple);
            }
            other => panic!("Expected descriptors, got {:?}", other),
        }
    }

    #[test]
    fn test_request_builds_application() {
        let request = ScriptRequest {
            rule: "minlength",
            message: "Too short",
            group: Some("name"),
            reset: true,
            howmany: Some(2),
            format: Some("3"),
            ..Default::default()
        };
        let application = request.application().unwrap();
        assert_eq!(application.rule.as_str(), "minlength");
        assert_eq!(application.format.as_deref(), Some("3"));
        assert_eq!(application.group.as_deref(), Some("name"));
        assert!(application.reset);
        assert_eq!(application.howmany, Some(2));
    }

    #[test]
    fn test_request_rejects_invalid_rule_name() {
        let request = ScriptRequest {
            rule: "not a rule",
            message: "x",
            ..Default::default()
        };
        assert!(request.application().is_err());
    }
}
