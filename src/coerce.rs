//! Primitive coercion rules: truthiness, strict equality and the loose
//! equality table.
//!
//! Loose equality is spelled out rule by rule rather than borrowed from a
//! host language, so `4 == "4"` and `0 == ""` hold while `null == 0` and
//! `true == "true"` do not.

use crate::value::Value;

/// Whether a value counts as true in a boolean context.
///
/// `undefined`, `null`, `false`, `±0`, `NaN` and `""` are falsy. Every
/// object is truthy, including empty arrays and boxed `false`.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Undefined | Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => !(*n == 0.0 || n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Object(_) => true,
    }
}

/// Identity without coercion: same type and value for primitives, same
/// reference for objects. `NaN` is not strictly equal to itself and `+0`
/// equals `-0`.
pub fn strict_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Object(x), Value::Object(y)) => x.ptr_eq(y),
        _ => false,
    }
}

/// Loose equality between two non-object values.
///
/// | left            | right            | rule                          |
/// |-----------------|------------------|-------------------------------|
/// | null/undefined  | null/undefined   | equal                         |
/// | null/undefined  | anything else    | unequal                       |
/// | same type       | same type        | strict equality               |
/// | number          | string           | string converted to a number  |
/// | boolean         | anything         | boolean converted to 0 or 1   |
///
/// Objects never compare loosely equal here; the equality engine handles
/// them before reaching this table.
pub fn loose_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
        (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
        (Value::Object(_), _) | (_, Value::Object(_)) => false,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            *n == string_to_number(s)
        }
        (Value::Bool(b), other) | (other, Value::Bool(b)) => {
            loose_equal(&Value::Number(if *b { 1.0 } else { 0.0 }), other)
        }
    }
}

/// Numeric value of a string under numeric-literal rules.
///
/// Surrounding whitespace is ignored and an empty string is `0`.
/// `0x`/`0o`/`0b` select a radix. Anything else that isn't a decimal literal
/// or a signed `Infinity` is `NaN`.
pub fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match trimmed.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix(&trimmed[2..], radix);
    }

    let is_decimal_literal = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !is_decimal_literal {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    let mut result = 0.0;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => result = result * radix as f64 + d as f64,
            None => return f64::NAN,
        }
    }
    result
}

/// Renders a number the way numeric literals read. Integers print without
/// a fraction; magnitudes outside `[1e-6, 1e21)` use exponent notation.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let magnitude = n.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{:e}", n);
        // `1e21` -> `1e+21`
        return match formatted.find('e') {
            Some(pos) if !formatted[pos + 1..].starts_with('-') => {
                format!("{}e+{}", &formatted[..pos], &formatted[pos + 1..])
            }
            _ => formatted,
        };
    }
    format!("{}", n)
}

/// Plain string form of a value, used when a non-string leading message is
/// supplied. Strings are returned unquoted; objects fall back to their
/// diagnostic rendering.
pub fn to_plain_string(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::String(s) => s.clone(),
        Value::Object(_) => crate::format::describe(value),
    }
}
