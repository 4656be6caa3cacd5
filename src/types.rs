#![forbid(unsafe_code)]

//! Core domain types for formrules
//!
//! This module defines rule names and kinds, submitted values, validation
//! outcomes, element descriptors and per-application rule options.

use crate::error::RuleError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A validated rule name
///
/// Rule names must be non-empty and contain only alphanumeric characters, hyphens, and underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleName(String);

impl RuleName {
    /// Creates a new RuleName, validating the input
    ///
    /// Returns None if the input is empty or contains invalid characters
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.is_empty() {
            return None;
        }
        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return None;
        }
        Some(RuleName(name))
    }

    /// Parses a rule name, reporting invalid names as an unknown rule
    pub fn parse(name: &str) -> Result<Self, RuleError> {
        RuleName::new(name).ok_or_else(|| RuleError::UnknownRule(name.to_string()))
    }

    /// Returns the rule name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RuleName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RuleName::new(value).ok_or_else(|| "Invalid rule name".to_string())
    }
}

impl From<RuleName> for String {
    fn from(name: RuleName) -> Self {
        name.0
    }
}

impl Borrow<str> for RuleName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Implementation family a rule name is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Regular expression match
    Regex,
    /// Host-supplied function
    Callback,
    /// Non-empty value
    Required,
    /// Length bounds (`minlength`, `maxlength`, `rangelength`)
    Range,
    /// E-mail address syntax
    Email,
    /// Joint comparison of two values
    Compare,
    /// User-supplied rule object
    Custom,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Regex => "regex",
            RuleKind::Callback => "callback",
            RuleKind::Required => "required",
            RuleKind::Range => "range",
            RuleKind::Email => "email",
            RuleKind::Compare => "compare",
            RuleKind::Custom => "custom",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A submitted form value
///
/// Scalar controls submit `Text`; repeated elements, groups and multi-selects
/// submit a `List`, which may nest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Returns the text if this is a scalar value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::List(_) => None,
        }
    }

    /// Returns the items if this is a collection
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::List(items) => Some(items),
        }
    }

    /// An empty string or an empty collection
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::List(items) => items.is_empty(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        FieldValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Result of a server-side validation
///
/// A scalar value yields `Passed`; a collection validated element by element
/// yields the number of passing elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Passed(bool),
    Count(usize),
}

impl Outcome {
    /// `Passed(true)` or any positive count
    pub fn is_success(&self) -> bool {
        match self {
            Outcome::Passed(passed) => *passed,
            Outcome::Count(count) => *count > 0,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Passed(passed) => write!(f, "{}", passed),
            Outcome::Count(count) => write!(f, "{}", count),
        }
    }
}

/// Form control kinds understood by the script generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Text input, textarea, hidden, password and similar
    Field,
    Checkbox,
    /// Checkbox paired with a hidden control: three visual states, two values
    AdvancedCheckbox,
    Radio,
    Select,
    /// Select used as an autocomplete widget
    Autocomplete,
    /// Composite of heterogeneous child controls
    Group,
}

/// A form control as seen by the script generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    /// Name addressing the control in the live form
    pub name: String,

    pub kind: ElementKind,

    /// Multi-valued select
    #[serde(default)]
    pub multiple: bool,

    /// Children of a group, in order
    #[serde(default)]
    pub children: Vec<GroupMember>,
}

/// A child of a group element together with its qualified name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub qualified_name: String,
    pub element: ElementDescriptor,
}

impl GroupMember {
    pub fn new(qualified_name: impl Into<String>, element: ElementDescriptor) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            element,
        }
    }
}

/// Validated structural view of an [`ElementDescriptor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementShape<'a> {
    Field,
    Checkbox,
    AdvancedCheckbox,
    Radio,
    Select,
    SelectMultiple,
    Group(&'a [GroupMember]),
}

impl ElementDescriptor {
    fn leaf(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            name: name.into(),
            kind,
            multiple: false,
            children: Vec::new(),
        }
    }

    pub fn field(name: impl Into<String>) -> Self {
        Self::leaf(name, ElementKind::Field)
    }

    pub fn checkbox(name: impl Into<String>) -> Self {
        Self::leaf(name, ElementKind::Checkbox)
    }

    pub fn advanced_checkbox(name: impl Into<String>) -> Self {
        Self::leaf(name, ElementKind::AdvancedCheckbox)
    }

    pub fn radio(name: impl Into<String>) -> Self {
        Self::leaf(name, ElementKind::Radio)
    }

    pub fn select(name: impl Into<String>, multiple: bool) -> Self {
        Self {
            multiple,
            ..Self::leaf(name, ElementKind::Select)
        }
    }

    pub fn autocomplete(name: impl Into<String>, multiple: bool) -> Self {
        Self {
            multiple,
            ..Self::leaf(name, ElementKind::Autocomplete)
        }
    }

    /// Group with explicitly qualified children
    pub fn group(name: impl Into<String>, children: Vec<GroupMember>) -> Self {
        Self {
            children,
            ..Self::leaf(name, ElementKind::Group)
        }
    }

    /// Group whose children are qualified as `group[child]` when `append_name`
    /// is set, or keep their own names otherwise
    pub fn group_of(
        name: impl Into<String>,
        elements: Vec<ElementDescriptor>,
        append_name: bool,
    ) -> Self {
        let name = name.into();
        let children = elements
            .into_iter()
            .map(|element| {
                let qualified = if append_name {
                    format!("{}[{}]", name, element.name)
                } else {
                    element.name.clone()
                };
                GroupMember::new(qualified, element)
            })
            .collect();
        Self::group(name, children)
    }

    /// Checks that the fields agree with the kind and returns the shape
    ///
    /// # Errors
    ///
    /// Returns `RuleError::MalformedDescriptor` if the name is empty, `multiple`
    /// is set on a non-select, a non-group has children, or a group has none.
    pub fn shape(&self) -> Result<ElementShape<'_>, RuleError> {
        if self.name.is_empty() {
            return Err(RuleError::malformed("", "element name is empty"));
        }

        let is_select = matches!(self.kind, ElementKind::Select | ElementKind::Autocomplete);
        if self.multiple && !is_select {
            return Err(RuleError::malformed(
                &self.name,
                "only select elements can be multiple",
            ));
        }

        if self.kind != ElementKind::Group && !self.children.is_empty() {
            return Err(RuleError::malformed(
                &self.name,
                "only group elements can have children",
            ));
        }

        let shape = match self.kind {
            ElementKind::Field => ElementShape::Field,
            ElementKind::Checkbox => ElementShape::Checkbox,
            ElementKind::AdvancedCheckbox => ElementShape::AdvancedCheckbox,
            ElementKind::Radio => ElementShape::Radio,
            ElementKind::Select | ElementKind::Autocomplete if self.multiple => {
                ElementShape::SelectMultiple
            }
            ElementKind::Select => ElementShape::Select,
            // A single-valued autocomplete is a text input with suggestions
            ElementKind::Autocomplete => ElementShape::Field,
            ElementKind::Group => {
                if self.children.is_empty() {
                    return Err(RuleError::malformed(&self.name, "group has no children"));
                }
                ElementShape::Group(&self.children)
            }
        };

        Ok(shape)
    }
}

/// Options for applying one rule to one element (or array of elements)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleApplication {
    /// Rule name
    #[serde(rename = "type")]
    pub rule: RuleName,

    /// Opaque rule argument, e.g. a pattern or a length
    #[serde(default)]
    pub format: Option<String>,

    /// Text shown when the rule fails
    pub message: String,

    /// Error-reporting key shared by several applications
    #[serde(default)]
    pub group: Option<String>,

    /// Restore default values on failure
    #[serde(default)]
    pub reset: bool,

    /// Minimum count threshold for repeated elements
    #[serde(default)]
    pub howmany: Option<usize>,
}

impl RuleApplication {
    pub fn new(rule: RuleName, message: impl Into<String>) -> Self {
        Self {
            rule,
            format: None,
            message: message.into(),
            group: None,
            reset: false,
            howmany: None,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    pub fn at_least(mut self, howmany: usize) -> Self {
        self.howmany = Some(howmany);
        self
    }
}
