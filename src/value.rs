//! The typed value universe evaluated globals live in.
//!
//! A small tagged variant with structural equality and no implicit
//! coercions, extended with list and object shapes because globals evaluate
//! into structured data, not just scalars.

use std::fmt::Debug;
use std::sync::Arc;

use ordered_float::NotNan;

/// A number that preserves exact integers up to `i64` range and otherwise
/// rounds to `f64`, matching the literal forms an expression parser emits:
/// integer literals preserve exact value, fractional literals round to
/// double precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
  /// An exact signed integer.
  Int(i64),
  /// A double-precision float. Never NaN: the parser never emits one and the
  /// registry exposes no arithmetic that could produce one.
  Float(NotNan<f64>),
}

impl Number {
  /// Canonical decimal rendering without trailing zeros, used by
  /// [stringify].
  pub fn to_canonical_string(&self) -> String {
    match self {
      Self::Int(i) => i.to_string(),
      Self::Float(f) => {
        let f = f.into_inner();
        if f.is_finite() && f == f.trunc() { format!("{f:.0}") } else { format!("{f}") }
      },
    }
  }
}

impl From<i64> for Number {
  fn from(value: i64) -> Self { Self::Int(value) }
}

impl TryFrom<f64> for Number {
  type Error = ();
  fn try_from(value: f64) -> Result<Self, ()> {
    NotNan::new(value).map(Self::Float).map_err(|_| ())
  }
}

/// An ordered string-keyed mapping. A thin wrapper over a vector of pairs
/// rather than a hash map: globals objects are small (a handful of fields)
/// and stable iteration order matters more here than lookup complexity.
#[derive(Debug, Clone)]
pub struct Object(Arc<Vec<(Arc<str>, Value)>>);

impl Object {
  /// Build an object from an ordered sequence of fields.
  pub fn new(fields: Vec<(Arc<str>, Value)>) -> Self { Self(Arc::new(fields)) }

  /// Look up a field by key.
  pub fn get(&self, key: &str) -> Option<&Value> {
    self.0.iter().find(|(k, _)| k.as_ref() == key).map(|(_, v)| v)
  }

  /// Iterate over fields in declaration order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
    self.0.iter().map(|(k, v)| (k.as_ref(), v))
  }

  /// Number of fields.
  pub fn len(&self) -> usize { self.0.len() }

  /// Whether the object has no fields.
  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl PartialEq for Object {
  /// Structural equality: same key set, each mapped to an equal value,
  /// independent of declaration order (construction order is a display
  /// concern, not part of a value's identity).
  fn eq(&self, other: &Self) -> bool {
    if self.0.len() != other.0.len() {
      return false;
    }
    self.0.iter().all(|(k, v)| other.get(k) == Some(v))
  }
}

/// The value universe: {Null, Bool, Number, String, List, Object}.
///
/// Values are pure data: cloning a [Value] never aliases into source text or
/// shares mutable state — the value model has no shared references, so it
/// cannot itself become cyclic. [Value::List] and
/// [Value::Object] are [Arc]-shared for cheap cloning, but that sharing is an
/// implementation detail invisible through the public API since values are
/// never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  /// The absence of a value.
  Null,
  /// A boolean.
  Bool(bool),
  /// A number, see [Number].
  Number(Number),
  /// A UTF-8 string, indexed by unicode code point throughout this crate.
  String(Arc<str>),
  /// An ordered sequence of values.
  List(Arc<Vec<Value>>),
  /// An ordered mapping from string keys to values.
  Object(Object),
}

impl Value {
  /// Build a string value from anything stringlike.
  pub fn string(s: impl Into<Arc<str>>) -> Self { Self::String(s.into()) }

  /// Build a list value.
  pub fn list(items: Vec<Value>) -> Self { Self::List(Arc::new(items)) }

  /// A short, lowercase name for this value's shape, used in diagnostics.
  pub fn type_name(&self) -> &'static str {
    match self {
      Self::Null => "null",
      Self::Bool(_) => "bool",
      Self::Number(_) => "number",
      Self::String(_) => "string",
      Self::List(_) => "list",
      Self::Object(_) => "object",
    }
  }

  /// Whether this value has a string form. List and Object do not.
  pub fn is_stringifiable(&self) -> bool { !matches!(self, Self::List(_) | Self::Object(_)) }
}

/// Render a value for template interpolation.
///
/// Null -> `"null"`, Bool -> `"true"`/`"false"`, Number -> canonical decimal,
/// String -> itself. [Value::List] and [Value::Object] have no string form;
/// callers (the template composer) must check [Value::is_stringifiable]
/// before calling this, or handle the `None` themselves.
pub fn stringify(value: &Value) -> Option<String> {
  Some(match value {
    Value::Null => "null".to_string(),
    Value::Bool(b) => b.to_string(),
    Value::Number(n) => n.to_canonical_string(),
    Value::String(s) => s.to_string(),
    Value::List(_) | Value::Object(_) => return None,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn integers_render_without_decimal_point() {
    assert_eq!(stringify(&Value::Number(Number::Int(666))).unwrap(), "666");
  }

  #[test]
  fn objects_are_not_stringifiable() {
    let obj = Value::Object(Object::new(vec![("a".into(), Value::Null)]));
    assert!(!obj.is_stringifiable());
    assert_eq!(stringify(&obj), None);
  }

  #[test]
  fn object_equality_ignores_field_order() {
    let a = Object::new(vec![
      ("x".into(), Value::Bool(true)),
      ("y".into(), Value::Null),
    ]);
    let b = Object::new(vec![
      ("y".into(), Value::Null),
      ("x".into(), Value::Bool(true)),
    ]);
    assert_eq!(Value::Object(a), Value::Object(b));
  }

  #[test]
  fn lists_are_structurally_equal() {
    let a = Value::list(vec![Value::Number(Number::Int(1)), Value::string("x")]);
    let b = Value::list(vec![Value::Number(Number::Int(1)), Value::string("x")]);
    assert_eq!(a, b);
  }
}
