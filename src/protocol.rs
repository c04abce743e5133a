//! The contract every assertion follows.
//!
//! An assertion call:
//!
//! 1. splits its arguments: with one argument more than the assertion's
//!    subject count, the first is a custom message
//! 2. evaluates its predicate over the subjects
//! 3. increments the counter, pass or fail
//! 4. on failure, renders `"<custom>: <default>"` (or just the default) and
//!    hands it to the failure hook, whose result is returned
//!
//! The default hook raises an [`AssertionError`]. A replacement hook is the
//! only path failures take, so a runner can collect failures instead of
//! stopping at the first one.
//!
//! State lives in an [`Asserter`]. Free functions in this crate go through a
//! process-wide default, reachable with [`global`]; runners that want
//! isolation build their own.

use crate::coerce::to_plain_string;
use crate::config::AssertConfig;
use crate::equality::deep_equal_with;
use crate::errors::{AssertResult, AssertionError};
use crate::format::{describe_with, FormatOptions};
use crate::host::HostDetector;
use crate::value::Value;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Replaceable failure handler. Receives the full failure message.
pub type FailureHook = Arc<dyn Fn(&str) -> AssertResult + Send + Sync>;

static GLOBAL: Lazy<Asserter> = Lazy::new(Asserter::new);

/// The process-wide assertion context behind the free functions.
pub fn global() -> &'static Asserter {
    &GLOBAL
}

/// The default failure hook: raise an [`AssertionError`].
pub fn raise(message: &str) -> AssertResult {
    Err(AssertionError::new(message))
}

/// Assertion state: counter, failure hook, host detector and formatting.
pub struct Asserter {
    count: AtomicUsize,
    fail: RwLock<FailureHook>,
    host: RwLock<Option<Arc<dyn HostDetector>>>,
    format: RwLock<FormatOptions>,
}

impl Asserter {
    /// Counter at zero, raising hook, no host detector, default formatting.
    pub fn new() -> Self {
        let hook: FailureHook = Arc::new(raise);
        Self {
            count: AtomicUsize::new(0),
            fail: RwLock::new(hook),
            host: RwLock::new(None),
            format: RwLock::new(FormatOptions::default()),
        }
    }

    pub fn with_config(config: AssertConfig) -> Self {
        let asserter = Self::new();
        asserter.set_format(config.format);
        asserter
    }

    /// Assertions run since creation or the last reset.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    pub fn set_count(&self, count: usize) {
        self.count.store(count, Ordering::Relaxed);
    }

    /// Zero the counter, returning the previous value.
    pub fn reset_count(&self) -> usize {
        let previous = self.count.swap(0, Ordering::Relaxed);
        tracing::debug!(previous, "assertion counter reset");
        previous
    }

    /// Install a failure hook, returning the one it replaces.
    pub fn set_fail<F>(&self, hook: F) -> FailureHook
    where
        F: Fn(&str) -> AssertResult + Send + Sync + 'static,
    {
        self.replace_fail(Arc::new(hook))
    }

    /// Install an already shared hook, e.g. one returned by [`set_fail`],
    /// returning the one it replaces.
    ///
    /// [`set_fail`]: Asserter::set_fail
    pub fn replace_fail(&self, hook: FailureHook) -> FailureHook {
        tracing::debug!("failure hook replaced");
        let mut slot = self.fail.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, hook)
    }

    /// Restore the raising hook.
    pub fn reset_fail(&self) -> FailureHook {
        self.replace_fail(Arc::new(raise))
    }

    /// Dispatch a failure message through the current hook.
    pub fn fail(&self, message: &str) -> AssertResult {
        // Clone out of the lock so the hook may itself replace the hook.
        let hook = Arc::clone(&*self.fail.read().unwrap_or_else(PoisonError::into_inner));
        (*hook)(message)
    }

    pub fn set_host_detector<D>(&self, detector: D)
    where
        D: HostDetector + 'static,
    {
        let detector: Arc<dyn HostDetector> = Arc::new(detector);
        *self.host.write().unwrap_or_else(PoisonError::into_inner) = Some(detector);
    }

    pub fn clear_host_detector(&self) {
        *self.host.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn set_format(&self, options: FormatOptions) {
        *self.format.write().unwrap_or_else(PoisonError::into_inner) = options;
    }

    pub fn format_options(&self) -> FormatOptions {
        self.format
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Render a value with this context's formatting options.
    pub fn describe(&self, value: &Value) -> String {
        let options = self.format.read().unwrap_or_else(PoisonError::into_inner);
        describe_with(value, &options)
    }

    /// Deep equality using this context's host detector.
    pub fn deep_equal(&self, a: &Value, b: &Value) -> bool {
        let host = self
            .host
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        deep_equal_with(a, b, host.as_deref())
    }

    /// Run one assertion through the protocol.
    pub(crate) fn run<P>(&self, check: &Check, args: &[Value], predicate: P) -> AssertResult
    where
        P: FnOnce(&Self, &[Value]) -> bool,
    {
        let (message, operands) = split_args(args, check.subjects);
        let passed = predicate(self, &operands);
        self.count.fetch_add(1, Ordering::Relaxed);

        if passed {
            tracing::trace!(assertion = check.name, "assertion passed");
            return Ok(());
        }

        let rendered: Vec<String> = operands.iter().map(|v| self.describe(v)).collect();
        let default_message = interpolate(check.message, &rendered);
        let message = match message {
            Some(custom) => format!("{}: {}", to_plain_string(custom), default_message),
            None => default_message,
        };
        tracing::debug!(assertion = check.name, %message, "assertion failed");
        self.fail(&message)
    }
}

impl Default for Asserter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Asserter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Asserter")
            .field("count", &self.count())
            .field("format", &self.format_options())
            .finish_non_exhaustive()
    }
}

/// Static description of one assertion.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Check {
    pub name: &'static str,
    /// Required subject arguments, not counting the optional message.
    pub subjects: usize,
    /// Default failure message; `{N}` is replaced by the rendered Nth subject.
    pub message: &'static str,
}

/// Splits `(message?, subjects...)`.
///
/// More arguments than subjects means the first is the message; surplus
/// trailing arguments are ignored and missing subjects read as `undefined`.
fn split_args(args: &[Value], subjects: usize) -> (Option<&Value>, Vec<Value>) {
    let (message, rest) = if args.len() > subjects {
        (args.first(), &args[1..])
    } else {
        (None, args)
    };
    let mut operands: Vec<Value> = rest.iter().take(subjects).cloned().collect();
    operands.resize(subjects, Value::Undefined);
    (message, operands)
}

/// Replace `{N}` placeholders with the Nth operand. Unknown placeholders are
/// left as written.
fn interpolate(template: &str, operands: &[String]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            operands.get(index).map(|operand| (operand, close))
        });
        match replaced {
            Some((operand, close)) => {
                output.push_str(operand);
                rest = &after[close + 1..];
            }
            None => {
                output.push('{');
                rest = after;
            }
        }
    }
    output.push_str(rest);
    output
}
