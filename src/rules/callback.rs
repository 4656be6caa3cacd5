#![forbid(unsafe_code)]

//! Callback-based rule implementation
//!
//! A callback pairs a server-side Rust function with the name of the
//! client-side function that performs the same check in the browser.

use crate::error::RuleError;
use crate::rules::{Rule, ScriptTemplate};
use crate::script::escape_string;
use crate::types::{FieldValue, RuleKind, RuleName};
use std::collections::HashMap;
use std::sync::Arc;

/// Server-side check: `(value, format) -> passed`
pub type ServerCheck = Arc<dyn Fn(&FieldValue, Option<&str>) -> bool + Send + Sync>;

/// A server function and its client-side counterpart
#[derive(Clone)]
pub struct Callback {
    server: Option<ServerCheck>,
    function: String,
    object: Option<String>,
}

impl std::fmt::Debug for Callback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callback")
            .field("server", &self.server.as_ref().map(|_| "<fn>"))
            .field("function", &self.function)
            .field("object", &self.object)
            .finish()
    }
}

impl Callback {
    /// Create a callback calling `function` on the client and `server` on the server
    pub fn new<F>(function: impl Into<String>, server: F) -> Self
    where
        F: Fn(&FieldValue, Option<&str>) -> bool + Send + Sync + 'static,
    {
        Self {
            server: Some(Arc::new(server)),
            function: function.into(),
            object: None,
        }
    }

    /// A callback emitted on the client with no server function
    ///
    /// Used for callbacks declared in configuration before the host binds the
    /// real server function. Server-side validation against it is an error.
    pub fn client_only(function: impl Into<String>) -> Self {
        Self {
            server: None,
            function: function.into(),
            object: None,
        }
    }

    /// Call the client function as a method of `object`
    pub fn on_object(mut self, object: impl Into<String>) -> Self {
        self.object = Some(object.into());
        self
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn object(&self) -> Option<&str> {
        self.object.as_deref()
    }

    pub fn has_server(&self) -> bool {
        self.server.is_some()
    }

    fn callee(&self) -> String {
        match &self.object {
            Some(object) => format!("{}.{}", object, self.function),
            None => self.function.clone(),
        }
    }
}

/// A rule delegating to registered callbacks
///
/// A rule name without a callback of its own (such as the bare `callback`
/// name) takes the client function name from the application's `format`. Such
/// names, and client-only callbacks, can be emitted but not validated on the
/// server.
#[derive(Debug, Default)]
pub struct CallbackRule {
    callbacks: HashMap<RuleName, Callback>,
}

impl CallbackRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the callback for a rule name
    pub fn add_callback(&mut self, name: RuleName, callback: Callback) {
        self.callbacks.insert(name, callback);
    }

    pub fn callback(&self, name: &RuleName) -> Option<&Callback> {
        self.callbacks.get(name)
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl Rule for CallbackRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Callback
    }

    fn validate(
        &self,
        name: &RuleName,
        value: &FieldValue,
        format: Option<&str>,
    ) -> Result<bool, RuleError> {
        match self.callbacks.get(name).and_then(|c| c.server.as_ref()) {
            Some(server) => Ok(server(value, format)),
            None => Err(RuleError::InvalidDefinition(format!(
                "No server function bound for rule '{}'",
                name
            ))),
        }
    }

    fn script(&self, name: &RuleName, format: Option<&str>) -> Result<ScriptTemplate, RuleError> {
        let call = match self.callbacks.get(name) {
            Some(callback) => match format {
                Some(format) => format!(
                    "{}({{jsVar}}, '{}')",
                    callback.callee(),
                    escape_string(format)
                ),
                None => format!("{}({{jsVar}})", callback.callee()),
            },
            None => match format {
                Some(function) if crate::script::is_callee(function) => {
                    format!("{}({{jsVar}})", function)
                }
                _ => {
                    return Err(RuleError::InvalidDefinition(format!(
                        "Rule '{}' needs a client function name as format",
                        name
                    )));
                }
            },
        };

        Ok(ScriptTemplate::new("", format!("{{jsVar}} != '' && !{}", call)))
    }
}
