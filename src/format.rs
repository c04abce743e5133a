//! Short diagnostic renderings of values for failure messages.
//!
//! Rendering never fails. Cycles print as `[Circular]` and nesting past
//! [`FormatOptions::max_depth`] collapses to `[Object]`/`[Array]`.
//! Long collections end in `... N more`; wide strings are cut on a
//! grapheme boundary.

use crate::coerce::format_number;
use crate::value::{Object, ObjectKind, Value};
use chrono::{SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Limits applied when rendering values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Composite nesting rendered in full; deeper composites collapse.
    pub max_depth: usize,
    /// Entries rendered per array or object.
    pub max_items: usize,
    /// Display columns a rendered string may occupy, quotes excluded.
    pub max_string_width: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            max_depth: 4,
            max_items: 32,
            max_string_width: 200,
        }
    }
}

/// Renders a value with the default options.
pub fn describe(value: &Value) -> String {
    describe_with(value, &FormatOptions::default())
}

/// Renders a value with explicit options.
pub fn describe_with(value: &Value, options: &FormatOptions) -> String {
    let mut describer = Describer {
        options,
        ancestors: Vec::new(),
        output: String::new(),
    };
    describer.value(value, 0);
    describer.output
}

struct Describer<'a> {
    options: &'a FormatOptions,
    /// Ids of the objects currently being rendered, outermost first.
    ancestors: Vec<usize>,
    output: String,
}

impl<'a> Describer<'a> {
    fn value(&mut self, value: &Value, depth: usize) {
        match value {
            Value::Undefined => self.output.push_str("undefined"),
            Value::Null => self.output.push_str("null"),
            Value::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => self.output.push_str(&format_number(*n)),
            Value::String(s) => self.string(s),
            Value::Object(obj) => {
                let id = obj.id();
                if self.ancestors.contains(&id) {
                    self.output.push_str("[Circular]");
                    return;
                }
                let object = match obj.try_borrow() {
                    Some(object) => object,
                    None => {
                        self.output.push_str("[Borrowed]");
                        return;
                    }
                };
                self.ancestors.push(id);
                self.object(&object, depth);
                self.ancestors.pop();
            }
        }
    }

    fn string(&mut self, s: &str) {
        self.output.push('"');
        let max = self.options.max_string_width;
        if UnicodeWidthStr::width(s) <= max {
            push_escaped(&mut self.output, s);
        } else {
            // Leave a column for the ellipsis.
            let mut width = 0;
            for grapheme in s.graphemes(true) {
                let w = UnicodeWidthStr::width(grapheme);
                if width + w + 1 > max {
                    break;
                }
                width += w;
                push_escaped(&mut self.output, grapheme);
            }
            self.output.push('…');
        }
        self.output.push('"');
    }

    fn object(&mut self, object: &Object, depth: usize) {
        match object.kind() {
            ObjectKind::Function(function) => {
                if function.name.is_empty() {
                    self.output.push_str("function () {}");
                } else {
                    self.output.push_str("function ");
                    self.output.push_str(&function.name);
                    self.output.push_str("() {}");
                }
            }
            ObjectKind::Date(millis) => self.output.push_str(&render_date(*millis)),
            ObjectKind::Pattern(pattern) => {
                self.output.push('/');
                self.output.push_str(&pattern.source);
                self.output.push('/');
                self.output.push_str(&pattern.flags);
                if !object.is_empty() {
                    self.output.push(' ');
                    self.properties(object, depth);
                }
            }
            ObjectKind::Boxed(inner) => {
                self.output.push('[');
                self.output.push_str(object.class_name());
                self.output.push_str(": ");
                self.value(inner, depth + 1);
                self.output.push(']');
            }
            ObjectKind::Array(items) => self.items(items, object, depth),
            ObjectKind::Arguments(items) => {
                self.output.push_str("[Arguments] ");
                self.items(items, object, depth);
            }
            ObjectKind::Plain => {
                let class = object.class_name();
                if class != "Object" {
                    self.output.push_str(class);
                    self.output.push(' ');
                }
                self.properties(object, depth);
            }
        }
    }

    fn items(&mut self, items: &[Value], object: &Object, depth: usize) {
        if items.is_empty() && object.is_empty() {
            self.output.push_str("[]");
            return;
        }
        if depth >= self.options.max_depth {
            self.output.push_str("[Array]");
            return;
        }

        self.output.push('[');
        let shown = items.len().min(self.options.max_items);
        for (i, item) in items.iter().take(shown).enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.value(item, depth + 1);
        }
        let mut written = shown;
        if items.len() > shown {
            self.output.push_str(&format!(", ... {} more", items.len() - shown));
        }
        for (key, value) in object.properties() {
            if written > 0 {
                self.output.push_str(", ");
            }
            written += 1;
            self.entry(key, value, depth);
        }
        self.output.push(']');
    }

    fn properties(&mut self, object: &Object, depth: usize) {
        if object.is_empty() {
            self.output.push_str("{}");
            return;
        }
        if depth >= self.options.max_depth {
            self.output.push_str("[Object]");
            return;
        }

        self.output.push_str("{ ");
        let shown = object.len().min(self.options.max_items);
        for (i, (key, value)) in object.properties().take(shown).enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.entry(key, value, depth);
        }
        if object.len() > shown {
            self.output
                .push_str(&format!(", ... {} more", object.len() - shown));
        }
        self.output.push_str(" }");
    }

    fn entry(&mut self, key: &str, value: &Value, depth: usize) {
        if is_bare_key(key) {
            self.output.push_str(key);
        } else {
            self.string(key);
        }
        self.output.push_str(": ");
        self.value(value, depth + 1);
    }
}

fn push_escaped(output: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c => output.push(c),
        }
    }
}

/// Identifier-like keys and array indices print unquoted.
fn is_bare_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => key.bytes().all(|b| b.is_ascii_digit()),
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

fn render_date(millis: f64) -> String {
    if !millis.is_finite() {
        return "Invalid Date".to_string();
    }
    match Utc.timestamp_millis_opt(millis as i64).single() {
        Some(instant) => instant.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => "Invalid Date".to_string(),
    }
}
