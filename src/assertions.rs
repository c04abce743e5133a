//! The named assertions.
//!
//! Every assertion takes its arguments as a slice of [`Value`]s using the
//! `(message?, subjects...)` convention and returns the failure hook's
//! result. The [`args!`](crate::args) macro builds the slice from anything
//! convertible into a `Value`.
//!
//! ```
//! use deep_assert::{args, Asserter};
//!
//! let asserter = Asserter::new();
//! assert!(asserter.equals(&args!["4", 4]).is_ok());
//!
//! let error = asserter.is_true(&args!["Awww", false]).unwrap_err();
//! assert_eq!(error.message(), "Awww: Expected true but was false");
//! assert_eq!(asserter.count(), 2);
//! ```

use crate::coerce::{is_truthy, strict_equal};
use crate::errors::AssertResult;
use crate::protocol::{global, Asserter, Check};
use crate::value::Value;

const ASSERT: Check = Check {
    name: "assert",
    subjects: 1,
    message: "Expected truthy value but was {0}",
};

const IS_TRUE: Check = Check {
    name: "isTrue",
    subjects: 1,
    message: "Expected true but was {0}",
};

const IS_FALSE: Check = Check {
    name: "isFalse",
    subjects: 1,
    message: "Expected false but was {0}",
};

const SAME: Check = Check {
    name: "same",
    subjects: 2,
    message: "Expected {0} to be the same object as {1}",
};

const NOT_SAME: Check = Check {
    name: "notSame",
    subjects: 2,
    message: "Expected {0} not to be the same object as {1}",
};

const EQUALS: Check = Check {
    name: "equals",
    subjects: 2,
    message: "Expected {0} to be equal to {1}",
};

const NOT_EQUALS: Check = Check {
    name: "notEquals",
    subjects: 2,
    message: "Expected {0} not to be equal to {1}",
};

impl Asserter {
    /// Passes for any truthy value.
    pub fn assert(&self, args: &[Value]) -> AssertResult {
        self.run(&ASSERT, args, |_, v| is_truthy(&v[0]))
    }

    /// Passes only for `true` itself.
    pub fn is_true(&self, args: &[Value]) -> AssertResult {
        self.run(&IS_TRUE, args, |_, v| matches!(v[0], Value::Bool(true)))
    }

    /// Passes only for `false` itself.
    pub fn is_false(&self, args: &[Value]) -> AssertResult {
        self.run(&IS_FALSE, args, |_, v| matches!(v[0], Value::Bool(false)))
    }

    /// Identity: the same object, or strictly equal primitives.
    pub fn same(&self, args: &[Value]) -> AssertResult {
        self.run(&SAME, args, |_, v| strict_equal(&v[0], &v[1]))
    }

    pub fn not_same(&self, args: &[Value]) -> AssertResult {
        self.run(&NOT_SAME, args, |_, v| !strict_equal(&v[0], &v[1]))
    }

    /// Deep structural equality.
    pub fn equals(&self, args: &[Value]) -> AssertResult {
        self.run(&EQUALS, args, |a, v| a.deep_equal(&v[0], &v[1]))
    }

    pub fn not_equals(&self, args: &[Value]) -> AssertResult {
        self.run(&NOT_EQUALS, args, |a, v| !a.deep_equal(&v[0], &v[1]))
    }
}

/// [`Asserter::assert`] on the process-wide context.
pub fn assert(args: &[Value]) -> AssertResult {
    global().assert(args)
}

/// [`Asserter::is_true`] on the process-wide context.
pub fn is_true(args: &[Value]) -> AssertResult {
    global().is_true(args)
}

/// [`Asserter::is_false`] on the process-wide context.
pub fn is_false(args: &[Value]) -> AssertResult {
    global().is_false(args)
}

/// [`Asserter::same`] on the process-wide context.
pub fn same(args: &[Value]) -> AssertResult {
    global().same(args)
}

/// [`Asserter::not_same`] on the process-wide context.
pub fn not_same(args: &[Value]) -> AssertResult {
    global().not_same(args)
}

/// [`Asserter::equals`] on the process-wide context.
pub fn equals(args: &[Value]) -> AssertResult {
    global().equals(args)
}

/// [`Asserter::not_equals`] on the process-wide context.
pub fn not_equals(args: &[Value]) -> AssertResult {
    global().not_equals(args)
}

/// Builds an argument array of [`Value`](crate::Value)s.
///
/// Each expression is converted with `Value::from`, so strings, numbers,
/// booleans, options and existing values can be mixed.
#[macro_export]
macro_rules! args {
    ($($value:expr),* $(,)?) => {
        [$($crate::Value::from($value)),*]
    };
}
