#![forbid(unsafe_code)]

//! JavaScript grammar for emitted validation blocks
//!
//! Emitted blocks are embedded in an enclosing function that defines the form
//! reference, the error-flag map, the message accumulator and the group
//! membership map. Their identifiers come from [`ScriptConfig`].

use crate::config::ScriptConfig;
use crate::script::grammar::{CheckParts, ScriptGrammar};

/// JavaScript templates
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JavaScript {
    idents: ScriptConfig,
}

impl JavaScript {
    pub fn new(idents: ScriptConfig) -> Self {
        Self { idents }
    }

    pub fn idents(&self) -> &ScriptConfig {
        &self.idents
    }

    /// `frm.elements['name']`
    fn element(&self, name: &str) -> String {
        format!("{}.elements['{}']", self.idents.form, escape_string(name))
    }

    /// Body of the failure branch: flag, message, then reset
    fn failure(&self, parts: &CheckParts<'_>) -> String {
        format!(
            "    {flags}['{key}'] = true;\n    {messages} = {messages} + '\\n - {message}';\n{reset}",
            flags = self.idents.error_flags,
            key = escape_string(parts.flag_key),
            messages = self.idents.messages,
            message = escape_string(parts.message),
            reset = parts.reset,
        )
    }

    fn guard(&self, flag_key: &str) -> String {
        format!("!{}['{}']", self.idents.error_flags, escape_string(flag_key))
    }
}

impl ScriptGrammar for JavaScript {
    fn value_var(&self) -> &str {
        "value"
    }

    fn loop_item(&self) -> &str {
        "value[i]"
    }

    fn indexed(&self, base: &str, index: usize) -> String {
        format!("{}[{}]", base, index)
    }

    fn multiple_name(&self, name: &str) -> String {
        format!("{}[]", name)
    }

    fn new_array(&self, slot: &str) -> String {
        format!("  {} = new Array();\n", slot)
    }

    fn extract_field(&self, name: &str, slot: &str) -> String {
        format!("  {} = {}.value;\n", slot, self.element(name))
    }

    fn extract_checkbox(&self, name: &str, slot: &str) -> String {
        format!("  {} = {}.checked? '1': '';\n", slot, self.element(name))
    }

    fn extract_advanced_checkbox(&self, name: &str, slot: &str) -> String {
        let el = self.element(name);
        format!(
            "  {slot} = {el}[1].checked? {el}[1].value: {el}[0].value;\n",
            slot = slot,
            el = el
        )
    }

    fn extract_radio(&self, name: &str, slot: &str) -> String {
        let el = self.element(name);
        format!(
            "  {slot} = '';\n\
             \x20 var els = 'length' in {el}? {el}: [ {el} ];\n\
             \x20 for (var i = 0; i < els.length; i++) {{\n\
             \x20   if (els[i].checked) {{\n\
             \x20     {slot} = els[i].value;\n\
             \x20   }}\n\
             \x20 }}\n",
            slot = slot,
            el = el
        )
    }

    fn extract_select(&self, name: &str, slot: &str) -> String {
        let el = self.element(name);
        format!(
            "  {slot} = {el}.selectedIndex == -1? '': {el}.options[{el}.selectedIndex].value;\n",
            slot = slot,
            el = el
        )
    }

    fn extract_select_multiple(&self, name: &str, slot: &str) -> String {
        let el = self.element(name);
        format!(
            "  {slot} = new Array();\n\
             \x20 var valueIdx = 0;\n\
             \x20 for (var i = 0; i < {el}.options.length; i++) {{\n\
             \x20   if ({el}.options[i].selected) {{\n\
             \x20     {slot}[valueIdx++] = {el}.options[i].value;\n\
             \x20   }}\n\
             \x20 }}\n",
            slot = slot,
            el = el
        )
    }

    fn extract_group(&self, group: &str, members: &[String], slot: &str) -> String {
        let set = members
            .iter()
            .map(|member| format!("'{}': true", escape_string(member)))
            .collect::<Vec<_>>()
            .join(", ");
        let groups = format!("{}['{}']", self.idents.groups, escape_string(group));
        let form = &self.idents.form;

        format!(
            "  {groups} = {{{set}}};\n\
             \x20 {slot} = new Array();\n\
             \x20 var valueIdx = 0;\n\
             \x20 for (var i = 0; i < {form}.elements.length; i++) {{\n\
             \x20   var _element = {form}.elements[i];\n\
             \x20   if (_element.name in {groups}) {{\n\
             \x20     switch (_element.type) {{\n\
             \x20       case 'checkbox':\n\
             \x20       case 'radio':\n\
             \x20         if (_element.checked) {{\n\
             \x20           {slot}[valueIdx++] = _element.value;\n\
             \x20         }}\n\
             \x20         break;\n\
             \x20       case 'select-one':\n\
             \x20         if (-1 != _element.selectedIndex) {{\n\
             \x20           {slot}[valueIdx++] = _element.options[_element.selectedIndex].value;\n\
             \x20         }}\n\
             \x20         break;\n\
             \x20       case 'select-multiple':\n\
             \x20         var tmpVal = new Array();\n\
             \x20         var tmpIdx = 0;\n\
             \x20         for (var j = 0; j < _element.options.length; j++) {{\n\
             \x20           if (_element.options[j].selected) {{\n\
             \x20             tmpVal[tmpIdx++] = _element.options[j].value;\n\
             \x20           }}\n\
             \x20         }}\n\
             \x20         if (tmpIdx > 0) {{\n\
             \x20           {slot}[valueIdx++] = tmpVal;\n\
             \x20         }}\n\
             \x20         break;\n\
             \x20       default:\n\
             \x20         {slot}[valueIdx++] = _element.value;\n\
             \x20     }}\n\
             \x20   }}\n\
             \x20 }}\n",
            groups = groups,
            set = set,
            slot = slot,
            form = form
        )
    }

    fn reset_target(&self, name: &str) -> String {
        format!("    var field = {};\n", self.element(name))
    }

    fn reset_field(&self) -> String {
        "    field.value = field.defaultValue;\n".to_string()
    }

    fn reset_checkbox(&self) -> String {
        "    field.checked = field.defaultChecked;\n".to_string()
    }

    fn reset_advanced_checkbox(&self) -> String {
        "    field[1].checked = field[1].defaultChecked;\n".to_string()
    }

    fn reset_radio(&self) -> String {
        "    var els = 'length' in field? field: [ field ];\n\
         \x20   for (var i = 0; i < els.length; i++) {\n\
         \x20     els[i].checked = els[i].defaultChecked;\n\
         \x20   }\n"
            .to_string()
    }

    fn reset_select(&self) -> String {
        "    for (var i = 0; i < field.options.length; i++) {\n\
         \x20     field.options[i].selected = field.options[i].defaultSelected;\n\
         \x20   }\n"
            .to_string()
    }

    fn reset_group(&self, group: &str) -> String {
        let groups = format!("{}['{}']", self.idents.groups, escape_string(group));
        let form = &self.idents.form;

        format!(
            "    for (var i = 0; i < {form}.elements.length; i++) {{\n\
             \x20     var _element = {form}.elements[i];\n\
             \x20     if (_element.name in {groups}) {{\n\
             \x20       switch (_element.type) {{\n\
             \x20         case 'checkbox':\n\
             \x20         case 'radio':\n\
             \x20           _element.checked = _element.defaultChecked;\n\
             \x20           break;\n\
             \x20         case 'select-one':\n\
             \x20         case 'select-multiple':\n\
             \x20           for (var j = 0; j < _element.options.length; j++) {{\n\
             \x20             _element.options[j].selected = _element.options[j].defaultSelected;\n\
             \x20           }}\n\
             \x20           break;\n\
             \x20         default:\n\
             \x20           _element.value = _element.defaultValue;\n\
             \x20       }}\n\
             \x20     }}\n\
             \x20   }}\n",
            form = form,
            groups = groups
        )
    }

    fn check(&self, parts: &CheckParts<'_>) -> String {
        format!(
            "{extraction}{prefix}  if ({condition} && {guard}) {{\n{failure}  }}\n",
            extraction = parts.extraction,
            prefix = parts.prefix,
            condition = parts.condition,
            guard = self.guard(parts.flag_key),
            failure = self.failure(parts),
        )
    }

    fn aggregate_check(&self, parts: &CheckParts<'_>, howmany: usize) -> String {
        format!(
            "{extraction}{prefix}  var res = 0;\n\
             \x20 for (var i = 0; i < {value}.length; i++) {{\n\
             \x20   if ({condition}) {{\n\
             \x20     res++;\n\
             \x20   }}\n\
             \x20 }}\n\
             \x20 if (res < {howmany} && {guard}) {{\n{failure}  }}\n",
            extraction = parts.extraction,
            prefix = parts.prefix,
            value = self.value_var(),
            condition = parts.condition,
            howmany = howmany,
            guard = self.guard(parts.flag_key),
            failure = self.failure(parts),
        )
    }
}

/// Escapes text for a single-quoted JavaScript string literal
pub fn escape_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            // keep `</script>` from closing an inline script element
            '<' if chars.peek() == Some(&'/') => escaped.push_str("<\\"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Renders a pattern source as a JavaScript regex literal
///
/// A leading inline flag group such as `(?i)` becomes literal flags, and
/// unescaped `/` characters are escaped.
pub fn regex_literal(source: &str) -> String {
    let (flags, body) = split_inline_flags(source);

    let mut literal = String::with_capacity(body.len() + 2);
    literal.push('/');
    let mut escaped = false;
    for c in body.chars() {
        match c {
            '/' if !escaped => literal.push_str("\\/"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            c => literal.push(c),
        }
        escaped = c == '\\' && !escaped;
    }
    literal.push('/');
    literal.push_str(flags);
    literal
}

fn split_inline_flags(source: &str) -> (&str, &str) {
    if let Some(rest) = source.strip_prefix("(?")
        && let Some(end) = rest.find(')')
    {
        let flags = &rest[..end];
        if !flags.is_empty() && flags.chars().all(|c| matches!(c, 'i' | 'm' | 's')) {
            return (flags, &rest[end + 1..]);
        }
    }
    ("", source)
}

/// A bare JavaScript identifier
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// A dotted path of identifiers such as `Validators.checkZip`
pub(crate) fn is_callee(path: &str) -> bool {
    path.split('.').all(is_identifier)
}
