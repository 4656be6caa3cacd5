#![forbid(unsafe_code)]

//! Assembly of one emitted block per rule application

use crate::error::RuleError;
use crate::rules::ScriptTemplate;
use crate::script::extract::{element_fragments, repeated_fragments};
use crate::script::grammar::{CheckParts, ScriptGrammar};
use crate::types::{ElementDescriptor, RuleApplication};

/// What a rule is applied to
#[derive(Debug, Clone, Copy)]
pub enum ScriptTarget<'a> {
    /// One control or group, addressed by the element name given to assembly
    Single(&'a ElementDescriptor),

    /// Repeated controls, each addressed by its own name, collected into an array
    Repeated(&'a [ElementDescriptor]),
}

impl<'a> From<&'a ElementDescriptor> for ScriptTarget<'a> {
    fn from(element: &'a ElementDescriptor) -> Self {
        ScriptTarget::Single(element)
    }
}

impl<'a> From<&'a [ElementDescriptor]> for ScriptTarget<'a> {
    fn from(elements: &'a [ElementDescriptor]) -> Self {
        ScriptTarget::Repeated(elements)
    }
}

/// Merges extraction, the rule template, error bookkeeping and reset
///
/// Without `howmany` the block flags a failure when the rule's condition holds
/// for the extracted value. With `howmany` it loops over the extracted array,
/// counts the elements for which the condition holds, and flags a failure when
/// that count is below `howmany`.
///
/// Failures are keyed by `application.group` when set, else by `element_name`,
/// so several failing applications sharing a key report one message.
pub fn validation_script(
    grammar: &dyn ScriptGrammar,
    template: &ScriptTemplate,
    target: ScriptTarget<'_>,
    element_name: &str,
    application: &RuleApplication,
) -> Result<String, RuleError> {
    let fragments = match target {
        ScriptTarget::Single(element) => element_fragments(
            grammar,
            element,
            element_name,
            grammar.value_var(),
            application.reset,
        )?,
        ScriptTarget::Repeated(elements) => {
            repeated_fragments(grammar, elements, application.reset)?
        }
    };

    let flag_key = application.group.as_deref().unwrap_or(element_name);

    let script = match application.howmany {
        None => {
            let condition = template.condition_for(grammar.value_var());
            grammar.check(&CheckParts {
                extraction: &fragments.extraction,
                prefix: &template.prefix,
                condition: &condition,
                flag_key,
                message: &application.message,
                reset: &fragments.reset,
            })
        }
        Some(howmany) => {
            // counts elements for which the failure condition holds
            let condition = template.condition_for(grammar.loop_item());
            grammar.aggregate_check(
                &CheckParts {
                    extraction: &fragments.extraction,
                    prefix: &template.prefix,
                    condition: &condition,
                    flag_key,
                    message: &application.message,
                    reset: &fragments.reset,
                },
                howmany,
            )
        }
    };

    tracing::trace!(
        rule = %application.rule,
        element = element_name,
        bytes = script.len(),
        "assembled validation script"
    );
    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::JavaScript;
    use crate::types::RuleName;

    fn required() -> ScriptTemplate {
        ScriptTemplate::new("", "{jsVar} == ''")
    }

    fn app(message: &str) -> RuleApplication {
        RuleApplication::new(RuleName::new("required").unwrap(), message)
    }

    #[test]
    fn test_single_field_block() {
        let element = ElementDescriptor::field("name");
        let script = validation_script(
            &JavaScript::default(),
            &required(),
            (&element).into(),
            "name",
            &app("Name is required"),
        )
        .unwrap();

        let expected = "  value = frm.elements['name'].value;\n\
                        \x20 if (value == '' && !errFlag['name']) {\n\
                        \x20   errFlag['name'] = true;\n\
                        \x20   _qfMsg = _qfMsg + '\\n - Name is required';\n\
                        \x20 }\n";
        assert_eq!(script, expected);
    }

    #[test]
    fn test_group_key_overrides_element_name() {
        let element = ElementDescriptor::field("street");
        let script = validation_script(
            &JavaScript::default(),
            &required(),
            (&element).into(),
            "street",
            &app("Address incomplete").in_group("address"),
        )
        .unwrap();

        assert!(script.contains("!errFlag['address']"));
        assert!(script.contains("errFlag['address'] = true;"));
        assert!(!script.contains("errFlag['street']"));
    }

    #[test]
    fn test_prefix_precedes_check() {
        let template = ScriptTemplate::new("  var regex = /^[0-9]+$/;\n", "{jsVar} != '' && !regex.test({jsVar})");
        let element = ElementDescriptor::field("zip");
        let script = validation_script(
            &JavaScript::default(),
            &template,
            (&element).into(),
            "zip",
            &app("Digits only"),
        )
        .unwrap();

        let prefix = script.find("var regex").unwrap();
        let check = script.find("if (value != '' && !regex.test(value)").unwrap();
        assert!(prefix < check);
    }

    #[test]
    fn test_reset_inside_failure_branch() {
        let element = ElementDescriptor::field("email");
        let script = validation_script(
            &JavaScript::default(),
            &required(),
            (&element).into(),
            "email",
            &app("Email required").with_reset(true),
        )
        .unwrap();

        assert!(script.contains("  value = frm.elements['email'].value;\n"));
        let branch = script.find("errFlag['email'] = true;").unwrap();
        let reset = script.find("field.value = field.defaultValue;").unwrap();
        assert!(branch < reset);
        assert!(script.ends_with("    field.value = field.defaultValue;\n  }\n"));
    }

    #[test]
    fn test_howmany_loops_over_repeated_elements() {
        let elements = vec![
            ElementDescriptor::checkbox("a"),
            ElementDescriptor::checkbox("b"),
            ElementDescriptor::checkbox("c"),
        ];
        let script = validation_script(
            &JavaScript::default(),
            &required(),
            elements.as_slice().into(),
            "choices",
            &app("Check at least two").at_least(2),
        )
        .unwrap();

        assert_eq!(script.matches("] = frm.elements[").count(), 3);
        assert!(script.contains("  for (var i = 0; i < value.length; i++) {\n"));
        assert!(script.contains("    if (value[i] == '') {\n      res++;\n"));
        assert!(script.contains("  if (res < 2 && !errFlag['choices']) {\n"));
    }

    #[test]
    fn test_malformed_target_yields_no_output() {
        let element = ElementDescriptor::group("g", vec![]);
        let result = validation_script(
            &JavaScript::default(),
            &required(),
            (&element).into(),
            "g",
            &app("x"),
        );
        assert!(matches!(result, Err(RuleError::MalformedDescriptor { .. })));
    }
}
