//! Stack metadata supplied by the external scanner, exposed to expressions
//! as the `terramate.*` namespace.

use hashbrown::HashMap;

use crate::location::Utf8PathBuf;
use crate::value::Value;

/// An immutable record describing one stack. The scanner is free to attach
/// arbitrary extra fields beyond `path`/`name`/`description`; they are
/// carried in [StackMeta::extra] and resolved the same way as the built-in
/// three.
#[derive(Debug, Clone)]
pub struct StackMeta {
  /// Absolute logical path from the project root, e.g.
  /// `/envs/prod/stacks/web`.
  pub path: Utf8PathBuf,
  /// The stack's name, typically the final path segment unless the scanner
  /// overrides it.
  pub name: String,
  /// A human description, possibly empty.
  pub description: String,
  /// Any additional fields the scanner defines, exposed the same way as the
  /// built-in fields.
  pub extra: HashMap<String, Value>,
}

impl StackMeta {
  /// Build stack metadata with no extra fields, deriving `name` from the
  /// final path segment.
  pub fn new(path: Utf8PathBuf, description: impl Into<String>) -> Self {
    let name = path
      .as_str()
      .rsplit('/')
      .find(|s| !s.is_empty())
      .unwrap_or(path.as_str())
      .to_string();
    Self { path, name, description: description.into(), extra: HashMap::new() }
  }

  /// Resolve a `terramate.<field>` reference. Returns `None` if `field`
  /// names nothing on this record; the caller is responsible for turning
  /// `None` into [crate::error::UnknownReferenceError].
  pub fn field(&self, field: &str) -> Option<Value> {
    match field {
      "path" => Some(Value::string(self.path.as_str())),
      "name" => Some(Value::string(self.name.clone())),
      "description" => Some(Value::string(self.description.clone())),
      other => self.extra.get(other).cloned(),
    }
  }
}
