//! Runtime values.
//!
//! Values are cheap to clone: strings are `Rc<str>` and callables are
//! reference-counted handles whose identity is preserved across clones.

use std::fmt;
use std::rc::Rc;

use crate::Callable;

/// A runtime value.
///
/// There is no implicit coercion anywhere: operators and equality only ever
/// combine values of the same variant.
#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Callable(Callable),
}

impl Value {
    /// Create a string value.
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::Str(s.into())
    }

    /// Truthiness: only `nil` and `false` are falsy.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// Value equality used by `==` and `!=`.
    ///
    /// Different variants are never equal. Numbers follow boxed-double
    /// equality: `NaN` equals `NaN`, and `0.0` differs from `-0.0`.
    /// Callables are equal only to themselves.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => number_equals(*a, *b),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Callable(_) => "function",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Callable(c) => Some(c),
            _ => None,
        }
    }
}

#[inline]
fn number_equals(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a.to_bits() == b.to_bits()
}

/// Textual form of a number as `print` shows it.
///
/// Integral values drop the fractional part (`3`, not `3.0`); non-finite
/// values print as `Infinity`, `-Infinity` and `NaN`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_owned()
    } else {
        // Rust's shortest round-trip form already omits `.0` for integral values.
        format!("{n}")
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<Callable> for Value {
    fn from(c: Callable) -> Self {
        Value::Callable(c)
    }
}

/// The stringification `print` writes.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Str(s) => f.write_str(s),
            Value::Callable(c) => write!(f, "{c}"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("Nil"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({n:?})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Callable(c) => write!(f, "Callable({c})"),
        }
    }
}
