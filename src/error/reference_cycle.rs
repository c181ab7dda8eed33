use super::{Diagnostic, ErrorKind, ErrorPosition};
use crate::location::Location;

/// A cycle was found among the globals that would actually be demanded
/// during evaluation.
#[derive(Debug, Clone)]
pub struct ReferenceCycleError {
  /// The attribute names participating in the cycle, in the order the walk
  /// encountered them.
  pub names: Vec<String>,
  /// Locations of each participating attribute's definition.
  pub locations: Vec<Location>,
}

impl Diagnostic for ReferenceCycleError {
  fn kind(&self) -> ErrorKind { ErrorKind::GlobalEval }
  fn message(&self) -> String {
    format!("cyclic global reference: {}", self.names.join(" -> "))
  }
  fn positions(&self) -> Vec<ErrorPosition> {
    self.locations.iter().cloned().map(ErrorPosition::from).collect()
  }
}
