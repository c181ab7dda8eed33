use super::{Diagnostic, ErrorKind, ErrorPosition};
use crate::location::Location;

/// A `global.*` or `terramate.*` reference named something that doesn't
/// exist: an unknown global, a missing object key, an out-of-range list
/// index addressed via dotted path, or an unknown `terramate.*` field.
#[derive(Debug, Clone)]
pub struct UnknownReferenceError {
  /// The full dotted reference as written, e.g. `global.team.mistake`.
  pub reference: String,
  /// Where the reference was written.
  pub location: Location,
}

impl Diagnostic for UnknownReferenceError {
  fn kind(&self) -> ErrorKind { ErrorKind::GlobalEval }
  fn message(&self) -> String { format!("unresolved reference \"{}\"", self.reference) }
  fn positions(&self) -> Vec<ErrorPosition> { vec![self.location.clone().into()] }
}
