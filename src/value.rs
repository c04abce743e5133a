//! Dynamic values that assertions operate on.
//!
//! Primitives (`undefined`, `null`, booleans, numbers, strings) are plain
//! data. Everything else is an [`Obj`]: a shared handle to an [`Object`],
//! where cloning the handle shares identity the way two references to the
//! same object would. Reference identity is what `same` checks and what
//! the equality engine's fast path relies on.

use chrono::{DateTime, Utc};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// A dynamically typed value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Object(Obj),
}

impl Value {
    /// A new empty plain object (`{}`).
    pub fn object() -> Self {
        Value::Object(Obj::new(Object::new(ObjectKind::Plain)))
    }

    /// A plain object with the given own properties, in order.
    pub fn object_from<K, V, I>(properties: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut object = Object::new(ObjectKind::Plain);
        for (key, value) in properties {
            object.set(key, value);
        }
        Value::Object(Obj::new(object))
    }

    /// A new array holding `items`.
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Object(Obj::new(Object::new(ObjectKind::Array(
            items.into_iter().collect(),
        ))))
    }

    /// A captured argument list, the indexed collection a function call
    /// receives.
    pub fn arguments(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Object(Obj::new(Object::new(ObjectKind::Arguments(
            items.into_iter().collect(),
        ))))
    }

    /// A date at the given instant.
    pub fn date(instant: DateTime<Utc>) -> Self {
        Self::date_millis(instant.timestamp_millis() as f64)
    }

    /// A date from milliseconds since the Unix epoch. `NaN` makes an invalid
    /// date.
    pub fn date_millis(millis: f64) -> Self {
        Value::Object(Obj::new(Object::new(ObjectKind::Date(millis))))
    }

    /// A regular-expression value. Flags are normalised to canonical order.
    pub fn pattern(source: impl Into<String>, flags: &str) -> Self {
        Value::Object(Obj::new(Object::new(ObjectKind::Pattern(Pattern::new(
            source, flags,
        )))))
    }

    /// A function value. Every call creates a distinct function.
    pub fn function(name: impl Into<String>) -> Self {
        Value::Object(Obj::new(Object::new(ObjectKind::Function(Function {
            name: name.into(),
        }))))
    }

    /// Wraps a primitive in its object form (`new String("")` and friends).
    ///
    /// Objects are returned unchanged and `null`/`undefined` box to a fresh
    /// empty object.
    pub fn boxed(value: impl Into<Value>) -> Self {
        match value.into() {
            Value::Object(obj) => Value::Object(obj),
            Value::Undefined | Value::Null => Value::object(),
            primitive => Value::Object(Obj::new(Object::new(ObjectKind::Boxed(Box::new(
                primitive,
            ))))),
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// `null` or `undefined`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn as_object(&self) -> Option<&Obj> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The `typeof`-style name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Object(obj) => match obj.borrow().kind() {
                ObjectKind::Function(_) => "function",
                _ => "object",
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::describe(self))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Number(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Obj> for Value {
    fn from(value: Obj) -> Self {
        Value::Object(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    /// `None` maps to `undefined`.
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Undefined, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::array(items.into_iter().map(Value::from))
            }
            serde_json::Value::Object(map) => Value::object_from(map),
        }
    }
}

/// Shared handle to an [`Object`].
///
/// Clones point at the same object. Interior mutability lets callers build
/// self-referential graphs (`a.self = a`).
#[derive(Clone)]
pub struct Obj(Rc<RefCell<Object>>);

impl Obj {
    pub fn new(object: Object) -> Self {
        Obj(Rc::new(RefCell::new(object)))
    }

    /// Reference identity.
    pub fn ptr_eq(&self, other: &Obj) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared object, stable for the object's lifetime.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn borrow(&self) -> Ref<'_, Object> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Object> {
        self.0.borrow_mut()
    }

    /// `None` while the object is mutably borrowed.
    pub fn try_borrow(&self) -> Option<Ref<'_, Object>> {
        self.0.try_borrow().ok()
    }

    /// Sets an own property, keeping its position if it already exists.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.borrow_mut().set(key, value);
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.borrow().get(key).cloned()
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.borrow_mut().remove(key)
    }

    /// Appends to an array or argument list. Other kinds are left untouched.
    pub fn push(&self, value: impl Into<Value>) {
        match self.borrow_mut().kind_mut() {
            ObjectKind::Array(items) | ObjectKind::Arguments(items) => items.push(value.into()),
            _ => {}
        }
    }
}

impl fmt::Debug for Obj {
    // Contents are not printed: the graph may be cyclic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.try_borrow() {
            Some(object) => write!(f, "Obj({} @ {:#x})", object.class_name(), self.id()),
            None => write!(f, "Obj(<borrowed> @ {:#x})", self.id()),
        }
    }
}

/// A composite value: its kind-specific payload plus own enumerable
/// properties in insertion order.
#[derive(Debug, Clone)]
pub struct Object {
    kind: ObjectKind,
    class: Option<String>,
    properties: Vec<(String, Value)>,
}

impl Object {
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            class: None,
            properties: Vec::new(),
        }
    }

    /// Override the class name, e.g. `HTMLDivElement` for a host element.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ObjectKind {
        &mut self.kind
    }

    /// Class name: the override if one was set, otherwise the built-in name
    /// for the kind.
    pub fn class_name(&self) -> &str {
        if let Some(class) = &self.class {
            return class;
        }
        match &self.kind {
            ObjectKind::Plain => "Object",
            ObjectKind::Array(_) => "Array",
            ObjectKind::Arguments(_) => "Arguments",
            ObjectKind::Date(_) => "Date",
            ObjectKind::Pattern(_) => "RegExp",
            ObjectKind::Function(_) => "Function",
            ObjectKind::Boxed(inner) => match **inner {
                Value::String(_) => "String",
                Value::Number(_) => "Number",
                _ => "Boolean",
            },
        }
    }

    /// Own enumerable properties, in insertion order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn has(&self, key: &str) -> bool {
        self.properties.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.properties.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.properties.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let pos = self.properties.iter().position(|(k, _)| k == key)?;
        Some(self.properties.remove(pos).1)
    }
}

/// Kind-specific payload of an [`Object`].
#[derive(Debug, Clone)]
pub enum ObjectKind {
    Plain,
    Array(Vec<Value>),
    Arguments(Vec<Value>),
    /// Milliseconds since the Unix epoch; `NaN` for an invalid date.
    Date(f64),
    Pattern(Pattern),
    Function(Function),
    /// A boxed string, number or boolean.
    Boxed(Box<Value>),
}

/// Source text and flags of a regular expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub source: String,
    pub flags: String,
}

impl Pattern {
    const FLAG_ORDER: &'static str = "dgimsuy";

    pub fn new(source: impl Into<String>, flags: &str) -> Self {
        let mut normalized: String = Self::FLAG_ORDER
            .chars()
            .filter(|c| flags.contains(*c))
            .collect();
        // Unknown flags are kept, after the known ones.
        normalized.extend(flags.chars().filter(|c| !Self::FLAG_ORDER.contains(*c)));
        Self {
            source: source.into(),
            flags: normalized,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clone_shares_identity() {
        let a = Value::object();
        let b = a.clone();
        let c = Value::object();
        assert!(a.as_object().unwrap().ptr_eq(b.as_object().unwrap()));
        assert!(!a.as_object().unwrap().ptr_eq(c.as_object().unwrap()));
    }

    #[test]
    fn test_set_keeps_position() {
        let obj = Obj::new(Object::new(ObjectKind::Plain));
        obj.set("a", 1);
        obj.set("b", 2);
        obj.set("a", 3);
        let keys: Vec<String> = obj.borrow().keys().map(String::from).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert!(matches!(obj.get("a"), Some(Value::Number(n)) if n == 3.0));
    }

    #[test]
    fn test_pattern_flags_normalized() {
        assert_eq!(Pattern::new("a", "ig").flags, "gi");
        assert_eq!(Pattern::new("a", "yg").flags, Pattern::new("a", "gy").flags);
    }

    #[test]
    fn test_boxed_class_names() {
        let s = Value::boxed("");
        let n = Value::boxed(0);
        let b = Value::boxed(false);
        assert_eq!(s.as_object().unwrap().borrow().class_name(), "String");
        assert_eq!(n.as_object().unwrap().borrow().class_name(), "Number");
        assert_eq!(b.as_object().unwrap().borrow().class_name(), "Boolean");
        assert!(matches!(
            Value::boxed(Value::Null).as_object().unwrap().borrow().kind(),
            ObjectKind::Plain
        ));
    }

    #[test]
    fn test_from_json() {
        let value = Value::from(json!({ "id": 42, "tags": ["a", null] }));
        let obj = value.as_object().unwrap().borrow();
        assert!(matches!(obj.get("id"), Some(Value::Number(n)) if *n == 42.0));
        match obj.get("tags").and_then(Value::as_object) {
            Some(tags) => match tags.borrow().kind() {
                ObjectKind::Array(items) => {
                    assert_eq!(items.len(), 2);
                    assert!(matches!(items[1], Value::Null));
                }
                other => panic!("expected array, got {:?}", other),
            },
            None => panic!("missing tags"),
        }
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Undefined.type_name(), "undefined");
        assert_eq!(Value::function("f").type_name(), "function");
        assert_eq!(Value::array(vec![]).type_name(), "object");
    }

    #[test]
    fn test_debug_does_not_recurse_into_cycles() {
        let value = Value::object();
        let obj = value.as_object().unwrap();
        obj.set("self", value.clone());
        let debug = format!("{:?}", value);
        assert!(debug.contains("Obj(Object"));
    }
}
