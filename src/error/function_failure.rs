use super::{Diagnostic, ErrorKind, ErrorPosition};
use crate::location::Location;

/// A known function rejected its arguments: wrong arity, wrong argument
/// type, or an impl-specific failure (out-of-range `substr`, etc.) that
/// wasn't absorbed by an enclosing `try`.
#[derive(Debug, Clone)]
pub struct FunctionFailureError {
  /// The function that failed.
  pub function: &'static str,
  /// What went wrong.
  pub reason: String,
  /// Where the call was written.
  pub location: Location,
}

impl Diagnostic for FunctionFailureError {
  fn kind(&self) -> ErrorKind { ErrorKind::GlobalEval }
  fn message(&self) -> String { format!("{}: {}", self.function, self.reason) }
  fn positions(&self) -> Vec<ErrorPosition> { vec![self.location.clone().into()] }
}
