use super::{Diagnostic, ErrorKind, ErrorPosition};
use crate::location::Location;

/// A [FunctionCall] named a function the registry doesn't know about.
///
/// [FunctionCall]: crate::expr::Expr::FunctionCall
#[derive(Debug, Clone)]
pub struct UnknownFunctionError {
  /// The name that was called.
  pub name: String,
  /// Where the call was written.
  pub location: Location,
}

impl Diagnostic for UnknownFunctionError {
  fn kind(&self) -> ErrorKind { ErrorKind::GlobalEval }
  fn message(&self) -> String { format!("unknown function \"{}\"", self.name) }
  fn positions(&self) -> Vec<ErrorPosition> { vec![self.location.clone().into()] }
}
