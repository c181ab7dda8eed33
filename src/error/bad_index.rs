use super::{Diagnostic, ErrorKind, ErrorPosition};
use crate::location::Location;

/// An [Index] expression addressed a key that doesn't exist in an object, or
/// an offset outside a list's bounds.
///
/// [Index]: crate::expr::Expr::Index
#[derive(Debug, Clone)]
pub struct BadIndexError {
  /// The base value's shape (`"list"` or `"object"`), for context.
  pub base_type: &'static str,
  /// A rendering of the offending key (the string key or numeric offset).
  pub key: String,
  /// Where the indexing expression was written.
  pub location: Location,
}

impl Diagnostic for BadIndexError {
  fn kind(&self) -> ErrorKind { ErrorKind::GlobalEval }
  fn message(&self) -> String {
    format!("no element at {} in {} value", self.key, self.base_type)
  }
  fn positions(&self) -> Vec<ErrorPosition> { vec![self.location.clone().into()] }
}
