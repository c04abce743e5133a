#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Assertions with deep structural equality and a uniform failure protocol.
//!
//! This crate provides the checks a test runner calls to verify
//! expectations over dynamically typed [`Value`]s, and a single contract for
//! how every check counts itself, builds its message and reports failure.
//!
//! ## Overview
//!
//! ```
//! use deep_assert::{args, Asserter, Value};
//! use serde_json::json;
//!
//! let asserter = Asserter::new();
//!
//! let a = Value::from(json!({ "a": 1, "b": [1, 2] }));
//! let b = Value::from(json!({ "b": [1, 2], "a": 1 }));
//! assert!(asserter.equals(&args![a.clone(), b.clone()]).is_ok());
//!
//! let error = asserter.same(&args![a, b]).unwrap_err();
//! assert_eq!(error.kind(), "AssertionError");
//! assert_eq!(asserter.count(), 2);
//! ```
//!
//! ## Modules
//!
//! - [`value`] - Dynamic values and shared objects
//! - [`coerce`] - Truthiness, strict equality and the loose-equality table
//! - [`equality`] - Deep structural equality
//! - [`format`] - Diagnostic rendering of values
//! - [`protocol`] - Counter, failure hook and the assertion contract
//! - [`assertions`] - `assert`, `is_true`, `is_false`, `same`, `not_same`,
//!   `equals`, `not_equals`
//! - [`host`] - Host object detection supplied by the environment
//! - [`config`] - TOML configuration
//! - [`errors`] - Error types

pub mod assertions;
pub mod coerce;
pub mod config;
pub mod equality;
pub mod errors;
pub mod format;
pub mod host;
pub mod protocol;
pub mod value;

// Re-exports for convenient access to core types
pub use assertions::{assert, equals, is_false, is_true, not_equals, not_same, same};
pub use config::AssertConfig;
pub use equality::{classify, deep_equal, deep_equal_with, Kind};
pub use errors::{AssertResult, AssertionError, ConfigError};
pub use format::{describe, describe_with, FormatOptions};
pub use host::{HostClasses, HostDetector};
pub use protocol::{global, raise, Asserter, FailureHook};
pub use value::{Function, Obj, Object, ObjectKind, Pattern, Value};

#[cfg(test)]
mod tests {
    mod assert;
    mod equals;
    mod global;
    mod is_bool;
    mod properties;
    mod same;
}
