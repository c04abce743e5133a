//! Deep structural equality.
//!
//! Each side of a comparison is classified once into a [`Kind`], and the
//! pair is dispatched to the strategy for that kind:
//!
//! - primitives: strict equality, then the loose-equality table
//! - functions and host objects: reference identity only
//! - dates: identical timestamps
//! - patterns: identical source and flags, no extra own properties
//! - array-likes: equal length, then the indices either side holds, then
//!   any named properties of arrays and argument lists
//! - other composites: same class, same own key set, equal values
//!
//! Objects never equal primitives, and composites of different kinds never
//! equal each other. Pairs already under comparison are assumed equal, so
//! cyclic graphs terminate.

use crate::coerce::{loose_equal, strict_equal};
use crate::host::HostDetector;
use crate::value::{Object, ObjectKind, Obj, Value};
use std::collections::{BTreeSet, HashSet};

/// Closed set of value kinds the engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// `undefined`, `null`, booleans, numbers and strings.
    Primitive,
    Function,
    Date,
    Pattern,
    /// Arrays, argument lists and plain objects shaped like them; carries the
    /// length.
    ArrayLike(usize),
    /// Plain objects and boxed primitives.
    Composite,
    HostObject,
}

/// Classifies a single value.
pub fn classify(value: &Value, host: Option<&dyn HostDetector>) -> Kind {
    match value {
        Value::Object(obj) => classify_object(&obj.borrow(), host),
        _ => Kind::Primitive,
    }
}

fn classify_object(object: &Object, host: Option<&dyn HostDetector>) -> Kind {
    if host.map_or(false, |h| h.is_host_object(object)) {
        return Kind::HostObject;
    }
    match object.kind() {
        ObjectKind::Function(_) => Kind::Function,
        ObjectKind::Date(_) => Kind::Date,
        ObjectKind::Pattern(_) => Kind::Pattern,
        ObjectKind::Array(items) | ObjectKind::Arguments(items) => Kind::ArrayLike(items.len()),
        ObjectKind::Plain => match array_like_length(object) {
            Some(len) => Kind::ArrayLike(len),
            None => Kind::Composite,
        },
        ObjectKind::Boxed(_) => Kind::Composite,
    }
}

/// A plain object is array-like when it has a non-negative integer `length`
/// and every other own key is an index below that length.
fn array_like_length(object: &Object) -> Option<usize> {
    let len = match object.get("length")? {
        Value::Number(n) if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 => *n as usize,
        _ => return None,
    };
    let indices_only = object
        .keys()
        .filter(|k| *k != "length")
        .all(|k| parse_index(k).map_or(false, |i| i < len));
    indices_only.then_some(len)
}

/// Canonical array index: decimal digits, no sign, no leading zeros.
fn parse_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

/// Indices that hold an entry. Plain array-likes may claim any `length`, so
/// only their own index keys are visited; an index absent on both sides
/// reads `undefined` on both.
fn present_indices(object: &Object, len: usize) -> Vec<usize> {
    match object.kind() {
        ObjectKind::Array(items) | ObjectKind::Arguments(items) => (0..items.len()).collect(),
        _ => object
            .keys()
            .filter_map(parse_index)
            .filter(|i| *i < len)
            .collect(),
    }
}

fn named_properties(object: &Object) -> Vec<(&str, &Value)> {
    match object.kind() {
        ObjectKind::Array(_) | ObjectKind::Arguments(_) => object.properties().collect(),
        _ => Vec::new(),
    }
}

fn element(object: &Object, index: usize) -> Option<&Value> {
    match object.kind() {
        ObjectKind::Array(items) | ObjectKind::Arguments(items) => items.get(index),
        _ => object.get(&index.to_string()),
    }
}

/// Deep equality without a host detector.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    Equality::new(None).equal(a, b)
}

/// Deep equality, treating objects the detector recognises as opaque.
pub fn deep_equal_with(a: &Value, b: &Value, host: Option<&dyn HostDetector>) -> bool {
    Equality::new(host).equal(a, b)
}

/// One comparison run. Tracks the object pairs currently being compared.
struct Equality<'h> {
    host: Option<&'h dyn HostDetector>,
    in_progress: HashSet<(usize, usize)>,
}

impl<'h> Equality<'h> {
    fn new(host: Option<&'h dyn HostDetector>) -> Self {
        Self {
            host,
            in_progress: HashSet::new(),
        }
    }

    fn equal(&mut self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Object(x), Value::Object(y)) => {
                if x.ptr_eq(y) {
                    return true;
                }
                self.objects_equal(x, y)
            }
            // No coercion across the primitive/object boundary.
            (Value::Object(_), _) | (_, Value::Object(_)) => false,
            _ => strict_equal(a, b) || loose_equal(a, b),
        }
    }

    fn objects_equal(&mut self, x: &Obj, y: &Obj) -> bool {
        let pair = (x.id(), y.id());
        if !self.in_progress.insert(pair) {
            return true;
        }

        let left = x.borrow();
        let right = y.borrow();
        let result = match (
            classify_object(&left, self.host),
            classify_object(&right, self.host),
        ) {
            // Distinct references; identity was already checked.
            (Kind::HostObject, _) | (_, Kind::HostObject) => false,
            (Kind::Function, _) | (_, Kind::Function) => false,
            (Kind::Date, Kind::Date) => dates_equal(&left, &right),
            (Kind::Pattern, Kind::Pattern) => patterns_equal(&left, &right),
            (Kind::ArrayLike(n), Kind::ArrayLike(m)) => n == m && self.elements_equal(&left, &right, n),
            (Kind::Composite, Kind::Composite) => self.composites_equal(&left, &right),
            _ => false,
        };

        drop(left);
        drop(right);
        self.in_progress.remove(&pair);
        result
    }

    fn elements_equal(&mut self, left: &Object, right: &Object, len: usize) -> bool {
        let undefined = Value::Undefined;
        let indices = present_indices(left, len)
            .into_iter()
            .chain(present_indices(right, len))
            .collect::<BTreeSet<_>>();
        let elements_match = indices.into_iter().all(|i| {
            let a = element(left, i).unwrap_or(&undefined);
            let b = element(right, i).unwrap_or(&undefined);
            self.equal(a, b)
        });
        elements_match && self.named_properties_equal(left, right)
    }

    /// Own non-index properties of arrays and argument lists.
    fn named_properties_equal(&mut self, left: &Object, right: &Object) -> bool {
        let left_named = named_properties(left);
        let right_named = named_properties(right);
        if left_named.len() != right_named.len() {
            return false;
        }
        left_named.into_iter().all(|(key, a)| {
            match right_named.iter().find(|(k, _)| *k == key) {
                Some((_, b)) => self.equal(a, b),
                None => false,
            }
        })
    }

    fn composites_equal(&mut self, left: &Object, right: &Object) -> bool {
        if left.class_name() != right.class_name() {
            return false;
        }
        match (left.kind(), right.kind()) {
            (ObjectKind::Boxed(a), ObjectKind::Boxed(b)) => {
                if !strict_equal(a, b) {
                    return false;
                }
            }
            (ObjectKind::Boxed(_), _) | (_, ObjectKind::Boxed(_)) => return false,
            _ => {}
        }
        if left.len() != right.len() {
            return false;
        }
        left.properties().all(|(key, a)| match right.get(key) {
            Some(b) => self.equal(a, b),
            None => false,
        })
    }
}

fn dates_equal(left: &Object, right: &Object) -> bool {
    match (left.kind(), right.kind()) {
        (ObjectKind::Date(a), ObjectKind::Date(b)) => a == b,
        _ => false,
    }
}

fn patterns_equal(left: &Object, right: &Object) -> bool {
    match (left.kind(), right.kind()) {
        (ObjectKind::Pattern(a), ObjectKind::Pattern(b)) => {
            a == b && left.is_empty() && right.is_empty()
        }
        _ => false,
    }
}
