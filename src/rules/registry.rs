#![forbid(unsafe_code)]

//! Rule registry binding rule names to implementations
//!
//! The RuleRegistry is responsible for:
//! - Binding built-in rule names to their kinds
//! - Registering patterns, callbacks and custom rules under new names
//! - Applying configured bindings from formrules.toml
//! - Dispatching server-side validation and client-side script generation

use crate::config::{Config, RuleDefinition};
use crate::error::RuleError;
use crate::rules::{
    BUILTIN_BINDINGS, Callback, CallbackRule, CompareRule, EmailRule, PatternRule, RangeRule,
    RequiredRule, Rule, ScriptTemplate,
};
use crate::script::{self, JavaScript, ScriptGrammar, ScriptTarget};
use crate::types::{FieldValue, Outcome, RuleApplication, RuleKind, RuleName};
use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Identity of the instance serving a rule name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum KindKey {
    Builtin(RuleKind),
    Custom(TypeId),
}

impl KindKey {
    fn kind(&self) -> RuleKind {
        match self {
            KindKey::Builtin(kind) => *kind,
            KindKey::Custom(_) => RuleKind::Custom,
        }
    }
}

/// Registry for storing and resolving rules
///
/// Every rule name is bound to exactly one kind. One instance serves all
/// names bound to its kind, so pattern and callback data are stored per name
/// inside the shared instance. Binding a name again with the same kind
/// updates its data; binding it to a different kind is rejected.
pub struct RuleRegistry {
    bindings: BTreeMap<RuleName, KindKey>,
    patterns: Option<PatternRule>,
    callbacks: Option<CallbackRule>,
    instances: HashMap<KindKey, Box<dyn Rule>>,
    grammar: Box<dyn ScriptGrammar>,
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bindings: Vec<(&str, RuleKind)> = self
            .bindings
            .iter()
            .map(|(name, key)| (name.as_str(), key.kind()))
            .collect();
        f.debug_struct("RuleRegistry")
            .field("bindings", &bindings)
            .finish_non_exhaustive()
    }
}

/// A resolved rule together with the name it was resolved under
#[derive(Clone, Copy)]
pub struct RuleRef<'a> {
    name: &'a RuleName,
    rule: &'a dyn Rule,
}

impl<'a> RuleRef<'a> {
    pub fn name(&self) -> &'a RuleName {
        self.name
    }

    pub fn kind(&self) -> RuleKind {
        self.rule.kind()
    }

    pub fn validate(&self, value: &FieldValue, format: Option<&str>) -> Result<bool, RuleError> {
        self.rule.validate(self.name, value, format)
    }

    pub fn count_passing(
        &self,
        values: &[FieldValue],
        format: Option<&str>,
    ) -> Result<usize, RuleError> {
        self.rule.count_passing(self.name, values, format)
    }

    pub fn validate_joint(
        &self,
        values: &[FieldValue],
        format: Option<&str>,
    ) -> Result<bool, RuleError> {
        self.rule.validate_joint(self.name, values, format)
    }

    pub fn script(&self, format: Option<&str>) -> Result<ScriptTemplate, RuleError> {
        self.rule.script(self.name, format)
    }
}

impl std::fmt::Debug for RuleRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRef")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .finish()
    }
}

impl RuleRegistry {
    /// Create an empty registry emitting JavaScript with default identifiers
    pub fn new() -> Self {
        Self {
            bindings: BTreeMap::new(),
            patterns: None,
            callbacks: None,
            instances: HashMap::new(),
            grammar: Box::new(JavaScript::default()),
        }
    }

    /// Create a registry with every built-in rule name bound
    ///
    /// # Errors
    ///
    /// Returns `RuleError` if a built-in pattern fails to compile.
    pub fn with_builtins() -> Result<Self, RuleError> {
        let mut registry = Self::new();
        registry.patterns = Some(PatternRule::with_builtins()?);
        for (name, kind) in BUILTIN_BINDINGS {
            registry.register_kind(name, *kind)?;
        }
        Ok(registry)
    }

    /// Create a registry from built-ins plus the bindings of a configuration
    ///
    /// Callback entries are client-only: server-side validation against them
    /// fails until the host binds a server function with
    /// [`RuleRegistry::register_callback`].
    ///
    /// # Errors
    ///
    /// Returns `RuleError` if a configured binding conflicts with an existing
    /// one or a pattern fails to compile.
    pub fn from_config(config: &Config) -> Result<Self, RuleError> {
        let mut registry = Self::with_builtins()?
            .with_grammar(JavaScript::new(config.script.clone()));

        for (name, definition) in &config.rules {
            match definition {
                RuleDefinition::Regex { pattern } => {
                    registry.register_pattern(name.as_str(), pattern)?;
                }
                RuleDefinition::Callback { function, object } => {
                    warn!(
                        rule = %name,
                        function = %function,
                        "callback configured without a server function, server-side validation will fail until one is bound"
                    );
                    let mut callback = Callback::client_only(function.clone());
                    if let Some(object) = object {
                        callback = callback.on_object(object.clone());
                    }
                    registry.register_callback(name.as_str(), callback)?;
                }
                other => registry.register_kind(name.as_str(), other.kind())?,
            }
        }

        Ok(registry)
    }

    /// Replace the target-language grammar used for script generation
    pub fn with_grammar(mut self, grammar: impl ScriptGrammar + 'static) -> Self {
        self.grammar = Box::new(grammar);
        self
    }

    pub fn grammar(&self) -> &dyn ScriptGrammar {
        self.grammar.as_ref()
    }

    /// Bind `name` to a pattern rule matching `pattern`
    ///
    /// # Errors
    ///
    /// Returns `RuleError::KindConflict` if the name is bound to another kind,
    /// or `RuleError::InvalidRegex` if the pattern does not compile.
    pub fn register_pattern(&mut self, name: &str, pattern: &str) -> Result<(), RuleError> {
        let name = new_name(name)?;
        let key = KindKey::Builtin(RuleKind::Regex);
        self.check_binding(&name, key)?;
        self.patterns
            .get_or_insert_with(PatternRule::new)
            .add_pattern(name.clone(), pattern)?;
        self.bind(name, key);
        Ok(())
    }

    /// Bind `name` to a callback rule
    ///
    /// # Errors
    ///
    /// Returns `RuleError::KindConflict` if the name is bound to another kind,
    /// or `RuleError::InvalidDefinition` if the client function is not an
    /// identifier or its object is not a dotted identifier path.
    pub fn register_callback(&mut self, name: &str, callback: Callback) -> Result<(), RuleError> {
        let name = new_name(name)?;
        if !script::is_identifier(callback.function()) {
            return Err(RuleError::InvalidDefinition(format!(
                "Rule '{}' has an invalid client function '{}'",
                name,
                callback.function()
            )));
        }
        if let Some(object) = callback.object().filter(|o| !script::is_callee(o)) {
            return Err(RuleError::InvalidDefinition(format!(
                "Rule '{}' has an invalid client object '{}'",
                name, object
            )));
        }
        let key = KindKey::Builtin(RuleKind::Callback);
        self.check_binding(&name, key)?;
        self.callbacks
            .get_or_insert_with(CallbackRule::new)
            .add_callback(name.clone(), callback);
        self.bind(name, key);
        Ok(())
    }

    /// Bind `name` to a built-in kind without per-name data
    ///
    /// A name bound to `Regex` or `Callback` this way takes its pattern or
    /// client function from the application's format.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::KindConflict` if the name is bound to another kind,
    /// or `RuleError::InvalidDefinition` for [`RuleKind::Custom`], which needs
    /// [`RuleRegistry::register_custom`].
    pub fn register_kind(&mut self, name: &str, kind: RuleKind) -> Result<(), RuleError> {
        let name = new_name(name)?;
        let key = KindKey::Builtin(kind);
        self.check_binding(&name, key)?;

        match kind {
            RuleKind::Regex => {
                self.patterns.get_or_insert_with(PatternRule::new);
            }
            RuleKind::Callback => {
                self.callbacks.get_or_insert_with(CallbackRule::new);
            }
            RuleKind::Required | RuleKind::Range | RuleKind::Email | RuleKind::Compare => {
                if !self.instances.contains_key(&key) {
                    let rule: Box<dyn Rule> = match kind {
                        RuleKind::Required => Box::new(RequiredRule),
                        RuleKind::Range => Box::new(RangeRule),
                        RuleKind::Email => Box::new(EmailRule::new()?),
                        _ => Box::new(CompareRule),
                    };
                    self.instances.insert(key, rule);
                }
            }
            RuleKind::Custom => {
                return Err(RuleError::InvalidDefinition(format!(
                    "Rule '{}' needs a rule object; use register_custom",
                    name
                )));
            }
        }

        self.bind(name, key);
        Ok(())
    }

    /// Bind `name` to a user-supplied rule
    ///
    /// Custom rules are identified by their type and keep one instance per
    /// type. Registering an instance replaces the one cached for its type, so
    /// every name bound to that type is served by the latest registration.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::KindConflict` if the name is bound to another kind
    /// or to a different custom type.
    pub fn register_custom<R: Rule + 'static>(&mut self, name: &str, rule: R) -> Result<(), RuleError> {
        let name = new_name(name)?;
        let key = KindKey::Custom(TypeId::of::<R>());
        self.check_binding(&name, key)?;
        if self.instances.insert(key, Box::new(rule)).is_some() {
            debug!(rule = %name, ty = std::any::type_name::<R>(), "replaced custom rule instance");
        }
        self.bind(name, key);
        Ok(())
    }

    /// Resolve a rule name to its serving rule
    ///
    /// # Errors
    ///
    /// Returns `RuleError::UnknownRule` if the name is not bound.
    pub fn get_rule(&self, name: &str) -> Result<RuleRef<'_>, RuleError> {
        let (name, key) = self
            .bindings
            .get_key_value(name)
            .ok_or_else(|| RuleError::UnknownRule(name.to_string()))?;

        let rule: Option<&dyn Rule> = match key {
            KindKey::Builtin(RuleKind::Regex) => self.patterns.as_ref().map(|r| r as &dyn Rule),
            KindKey::Builtin(RuleKind::Callback) => {
                self.callbacks.as_ref().map(|r| r as &dyn Rule)
            }
            other => self.instances.get(other).map(|r| r.as_ref()),
        };
        let rule = rule.ok_or_else(|| {
            RuleError::InvalidDefinition(format!("Rule '{}' has no serving instance", name))
        })?;

        debug!(rule = %name, kind = %key.kind(), "resolved rule");
        Ok(RuleRef { name, rule })
    }

    /// Validate submitted values against a rule
    ///
    /// A scalar value yields [`Outcome::Passed`]. A collection with
    /// `multiple = false` is validated element by element and yields the
    /// number of passing elements. A collection with `multiple = true` is
    /// handed to the rule as one unit and yields `Passed`.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::UnknownRule` for an unbound name, or any error the
    /// rule reports for a missing or invalid format.
    pub fn validate(
        &self,
        name: &str,
        values: &FieldValue,
        format: Option<&str>,
        multiple: bool,
    ) -> Result<Outcome, RuleError> {
        let rule = self.get_rule(name)?;
        match values {
            FieldValue::List(items) if multiple => {
                Ok(Outcome::Passed(rule.validate_joint(items, format)?))
            }
            FieldValue::List(items) => Ok(Outcome::Count(rule.count_passing(items, format)?)),
            FieldValue::Text(_) => Ok(Outcome::Passed(rule.validate(values, format)?)),
        }
    }

    /// Emit the client-side check for one rule application
    ///
    /// # Errors
    ///
    /// Returns `RuleError::UnknownRule` for an unbound rule,
    /// `RuleError::MalformedDescriptor` for an element that cannot be
    /// addressed, or any error the rule reports while building its template.
    pub fn validation_script<'a>(
        &self,
        target: impl Into<ScriptTarget<'a>>,
        element_name: &str,
        application: &RuleApplication,
    ) -> Result<String, RuleError> {
        let rule = self.get_rule(application.rule.as_str())?;
        let template = rule.script(application.format.as_deref())?;
        script::validation_script(
            self.grammar.as_ref(),
            &template,
            target.into(),
            element_name,
            application,
        )
    }

    /// Bound rule names in order, with their kinds
    pub fn rule_names(&self) -> impl Iterator<Item = (&RuleName, RuleKind)> {
        self.bindings.iter().map(|(name, key)| (name, key.kind()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn check_binding(&self, name: &RuleName, key: KindKey) -> Result<(), RuleError> {
        match self.bindings.get(name) {
            Some(existing) if *existing != key => Err(RuleError::KindConflict {
                name: name.to_string(),
                existing: existing.kind(),
                requested: key.kind(),
            }),
            _ => Ok(()),
        }
    }

    fn bind(&mut self, name: RuleName, key: KindKey) {
        debug!(rule = %name, kind = %key.kind(), "bound rule");
        self.bindings.insert(name, key);
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn new_name(name: &str) -> Result<RuleName, RuleError> {
    RuleName::new(name)
        .ok_or_else(|| RuleError::InvalidDefinition(format!("Invalid rule name '{}'", name)))
}
