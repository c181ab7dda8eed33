use super::{Diagnostic, ErrorKind, ErrorPosition};
use crate::location::Location;

/// A composed template tried to stringify a [crate::value::Value::List] or
/// [crate::value::Value::Object].
#[derive(Debug, Clone)]
pub struct NonStringifiableError {
  /// The offending value's shape (`"list"` or `"object"`).
  pub type_name: &'static str,
  /// Where the template that required stringification was written.
  pub location: Location,
}

impl Diagnostic for NonStringifiableError {
  fn kind(&self) -> ErrorKind { ErrorKind::GlobalEval }
  fn message(&self) -> String {
    format!("cannot interpolate a {} value into a composed template", self.type_name)
  }
  fn positions(&self) -> Vec<ErrorPosition> { vec![self.location.clone().into()] }
}
