#![forbid(unsafe_code)]

//! Value extraction and value reset per element shape

use crate::error::RuleError;
use crate::script::grammar::ScriptGrammar;
use crate::types::{ElementDescriptor, ElementShape};

/// Statements reading an element's live value and restoring its default
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragments {
    pub extraction: String,

    /// Empty unless reset was requested
    pub reset: String,
}

/// Builds the fragments for one element stored into `slot`
///
/// `name` addresses the element in the live form. For a group it is the key of
/// the membership set.
///
/// # Errors
///
/// Returns `RuleError::MalformedDescriptor` if the element or any group child
/// is malformed.
pub fn element_fragments(
    grammar: &dyn ScriptGrammar,
    element: &ElementDescriptor,
    name: &str,
    slot: &str,
    reset: bool,
) -> Result<Fragments, RuleError> {
    let shape = element.shape()?;

    let fragments = match shape {
        ElementShape::Group(children) => {
            let mut members = Vec::with_capacity(children.len());
            for child in children {
                let member = match child.element.shape()? {
                    ElementShape::SelectMultiple => grammar.multiple_name(&child.qualified_name),
                    _ => child.qualified_name.clone(),
                };
                members.push(member);
            }
            Fragments {
                extraction: grammar.extract_group(name, &members, slot),
                reset: if reset {
                    grammar.reset_group(name)
                } else {
                    String::new()
                },
            }
        }
        ElementShape::SelectMultiple => {
            let name = grammar.multiple_name(name);
            leaf(
                grammar,
                &name,
                reset,
                grammar.extract_select_multiple(&name, slot),
                grammar.reset_select(),
            )
        }
        ElementShape::Select => leaf(
            grammar,
            name,
            reset,
            grammar.extract_select(name, slot),
            grammar.reset_select(),
        ),
        ElementShape::AdvancedCheckbox => leaf(
            grammar,
            name,
            reset,
            grammar.extract_advanced_checkbox(name, slot),
            grammar.reset_advanced_checkbox(),
        ),
        ElementShape::Checkbox => leaf(
            grammar,
            name,
            reset,
            grammar.extract_checkbox(name, slot),
            grammar.reset_checkbox(),
        ),
        ElementShape::Radio => leaf(
            grammar,
            name,
            reset,
            grammar.extract_radio(name, slot),
            grammar.reset_radio(),
        ),
        ElementShape::Field => leaf(
            grammar,
            name,
            reset,
            grammar.extract_field(name, slot),
            grammar.reset_field(),
        ),
    };

    tracing::trace!(element = name, ?shape, "built element fragments");
    Ok(fragments)
}

fn leaf(
    grammar: &dyn ScriptGrammar,
    name: &str,
    reset: bool,
    extraction: String,
    restore: String,
) -> Fragments {
    let reset = if reset {
        grammar.reset_target(name) + &restore
    } else {
        String::new()
    };
    Fragments { extraction, reset }
}

/// Builds fragments for repeated elements collected into one array
///
/// Each element is addressed by its own name and stored at the next index of
/// the value array; resets are concatenated in the same order.
///
/// # Errors
///
/// Returns `RuleError::MalformedDescriptor` if `elements` is empty or any
/// element is malformed.
pub fn repeated_fragments(
    grammar: &dyn ScriptGrammar,
    elements: &[ElementDescriptor],
    reset: bool,
) -> Result<Fragments, RuleError> {
    if elements.is_empty() {
        return Err(RuleError::malformed("", "no elements to validate"));
    }

    let value = grammar.value_var();
    let mut fragments = Fragments {
        extraction: grammar.new_array(value),
        reset: String::new(),
    };

    for (index, element) in elements.iter().enumerate() {
        let slot = grammar.indexed(value, index);
        let part = element_fragments(grammar, element, &element.name, &slot, reset)?;
        fragments.extraction.push_str(&part.extraction);
        fragments.reset.push_str(&part.reset);
    }

    Ok(fragments)
}
