#![forbid(unsafe_code)]

//! Built-in stateless rules and the default name bindings
//!
//! Pattern rules live in [`crate::rules::PatternRule`]; this module holds the
//! remaining built-in kinds and the table mapping built-in rule names to the
//! kind that serves them.

use crate::error::RuleError;
use crate::rules::{Rule, ScriptTemplate};
use crate::script::regex_literal;
use crate::types::{FieldValue, RuleKind, RuleName};
use regex::Regex;

/// Built-in rule names and the kind that serves each
pub const BUILTIN_BINDINGS: &[(&str, RuleKind)] = &[
    ("required", RuleKind::Required),
    ("minlength", RuleKind::Range),
    ("maxlength", RuleKind::Range),
    ("rangelength", RuleKind::Range),
    ("email", RuleKind::Email),
    ("regex", RuleKind::Regex),
    ("lettersonly", RuleKind::Regex),
    ("alphanumeric", RuleKind::Regex),
    ("numeric", RuleKind::Regex),
    ("nopunctuation", RuleKind::Regex),
    ("nonzero", RuleKind::Regex),
    ("callback", RuleKind::Callback),
    ("compare", RuleKind::Compare),
];

/// Value must not be empty
#[derive(Debug, Default)]
pub struct RequiredRule;

impl Rule for RequiredRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Required
    }

    fn validate(
        &self,
        _name: &RuleName,
        value: &FieldValue,
        _format: Option<&str>,
    ) -> Result<bool, RuleError> {
        Ok(!value.is_empty())
    }

    fn script(&self, _name: &RuleName, _format: Option<&str>) -> Result<ScriptTemplate, RuleError> {
        Ok(ScriptTemplate::new("", "{jsVar} == ''"))
    }
}

/// Length bounds parsed from a range application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bounds {
    Min(usize),
    Max(usize),
    Between(usize, usize),
}

/// Value length must respect a bound
///
/// `minlength` and `maxlength` take a single length as format; any other name
/// bound to this kind (including `rangelength`) takes `min,max`.
#[derive(Debug, Default)]
pub struct RangeRule;

impl RangeRule {
    fn bounds(name: &RuleName, format: Option<&str>) -> Result<Bounds, RuleError> {
        let format = format.map(str::trim).ok_or_else(|| {
            RuleError::InvalidDefinition(format!("Rule '{}' needs a length as format", name))
        })?;
        let parse = |text: &str| {
            text.trim().parse::<usize>().map_err(|_| {
                RuleError::InvalidDefinition(format!(
                    "Rule '{}' has an invalid length '{}'",
                    name, text
                ))
            })
        };

        match name.as_str() {
            "minlength" => Ok(Bounds::Min(parse(format)?)),
            "maxlength" => Ok(Bounds::Max(parse(format)?)),
            _ => {
                let (min, max) = format.split_once(',').ok_or_else(|| {
                    RuleError::InvalidDefinition(format!(
                        "Rule '{}' needs 'min,max' as format, got '{}'",
                        name, format
                    ))
                })?;
                Ok(Bounds::Between(parse(min)?, parse(max)?))
            }
        }
    }
}

impl Rule for RangeRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Range
    }

    fn validate(
        &self,
        name: &RuleName,
        value: &FieldValue,
        format: Option<&str>,
    ) -> Result<bool, RuleError> {
        let bounds = Self::bounds(name, format)?;
        let Some(text) = value.as_text() else {
            return Ok(false);
        };
        // UTF-16 code units, as counted by the client's `.length`
        let length = text.encode_utf16().count();

        Ok(match bounds {
            Bounds::Min(min) => length >= min,
            Bounds::Max(max) => length <= max,
            Bounds::Between(min, max) => (min..=max).contains(&length),
        })
    }

    fn script(&self, name: &RuleName, format: Option<&str>) -> Result<ScriptTemplate, RuleError> {
        let condition = match Self::bounds(name, format)? {
            Bounds::Min(min) => format!("{{jsVar}} != '' && {{jsVar}}.length < {}", min),
            Bounds::Max(max) => format!("{{jsVar}} != '' && {{jsVar}}.length > {}", max),
            Bounds::Between(min, max) => format!(
                "{{jsVar}} != '' && ({{jsVar}}.length < {} || {{jsVar}}.length > {})",
                min, max
            ),
        };
        Ok(ScriptTemplate::new("", condition))
    }
}

/// Address syntax accepted by [`EmailRule`]
///
/// Character classes are spelled out in ASCII: `\w` and `\d` match Unicode
/// letters and digits in the `regex` crate but not in JavaScript.
pub const EMAIL_PATTERN: &str = r"^[A-Za-z0-9_!#$%&'*+\-/=?^`{|}~]+(\.[A-Za-z0-9_!#$%&'*+\-/=?^`{|}~]+)*@(([A-Za-z0-9\-]+\.)+[A-Za-z\-]+|\[[0-9]{1,3}(\.[0-9]{1,3}){3}\])$";

/// Value must be an e-mail address
#[derive(Debug)]
pub struct EmailRule {
    pattern: Regex,
}

impl EmailRule {
    /// # Errors
    ///
    /// Returns `RuleError::InvalidRegex` if [`EMAIL_PATTERN`] fails to compile.
    pub fn new() -> Result<Self, RuleError> {
        let pattern = Regex::new(EMAIL_PATTERN)
            .map_err(|e| RuleError::InvalidRegex(format!("e-mail pattern: {}", e)))?;
        Ok(Self { pattern })
    }
}

impl Rule for EmailRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Email
    }

    fn validate(
        &self,
        _name: &RuleName,
        value: &FieldValue,
        _format: Option<&str>,
    ) -> Result<bool, RuleError> {
        Ok(value
            .as_text()
            .is_some_and(|text| self.pattern.is_match(text)))
    }

    fn script(&self, _name: &RuleName, _format: Option<&str>) -> Result<ScriptTemplate, RuleError> {
        Ok(ScriptTemplate::new(
            format!("  var regex = {};\n", regex_literal(EMAIL_PATTERN)),
            "{jsVar} != '' && !regex.test({jsVar})",
        ))
    }
}

/// Comparison operator of a compare application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    /// Parses `eq`, `neq`, `gt`, `gte`, `lt`, `lte` or their symbols; no
    /// format means `eq`
    pub fn parse(format: Option<&str>) -> Result<Self, RuleError> {
        match format.map(str::trim).unwrap_or("") {
            "" | "eq" | "==" | "===" => Ok(CompareOp::Eq),
            "neq" | "!=" | "!==" => Ok(CompareOp::Neq),
            "gt" | ">" => Ok(CompareOp::Gt),
            "gte" | ">=" => Ok(CompareOp::Gte),
            "lt" | "<" => Ok(CompareOp::Lt),
            "lte" | "<=" => Ok(CompareOp::Lte),
            other => Err(RuleError::InvalidDefinition(format!(
                "Unknown compare operator '{}'",
                other
            ))),
        }
    }

    fn holds(&self, left: f64, right: f64) -> bool {
        match self {
            CompareOp::Eq => left == right,
            CompareOp::Neq => left != right,
            CompareOp::Gt => left > right,
            CompareOp::Gte => left >= right,
            CompareOp::Lt => left < right,
            CompareOp::Lte => left <= right,
        }
    }

    fn js(&self) -> &'static str {
        match self {
            CompareOp::Eq => "===",
            CompareOp::Neq => "!==",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }
}

/// Numeric reading of a value, mirroring JavaScript's `Number()`
fn number(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    text.parse().unwrap_or(f64::NAN)
}

/// Two values compared jointly
///
/// `eq` compares the texts; every other operator compares them as numbers.
#[derive(Debug, Default)]
pub struct CompareRule;

impl Rule for CompareRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Compare
    }

    fn validate(
        &self,
        name: &RuleName,
        _value: &FieldValue,
        _format: Option<&str>,
    ) -> Result<bool, RuleError> {
        Err(RuleError::InvalidDefinition(format!(
            "Rule '{}' compares values jointly and needs multiple = true",
            name
        )))
    }

    fn validate_joint(
        &self,
        name: &RuleName,
        values: &[FieldValue],
        format: Option<&str>,
    ) -> Result<bool, RuleError> {
        let op = CompareOp::parse(format)?;
        let (left, right) = match values {
            [FieldValue::Text(left), FieldValue::Text(right)] => (left, right),
            _ => {
                return Err(RuleError::InvalidDefinition(format!(
                    "Rule '{}' compares exactly two scalar values, got {}",
                    name,
                    values.len()
                )));
            }
        };

        if op == CompareOp::Eq {
            return Ok(left == right);
        }
        Ok(op.holds(number(left), number(right)))
    }

    fn script(&self, _name: &RuleName, format: Option<&str>) -> Result<ScriptTemplate, RuleError> {
        let op = CompareOp::parse(format)?;
        let check = if op == CompareOp::Eq {
            format!("!({{jsVar}}[0] {} {{jsVar}}[1])", op.js())
        } else {
            format!("!(Number({{jsVar}}[0]) {} Number({{jsVar}}[1]))", op.js())
        };
        Ok(ScriptTemplate::new("", format!("'' != {{jsVar}}[0] && {}", check)))
    }
}
