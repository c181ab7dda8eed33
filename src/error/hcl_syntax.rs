use super::{Diagnostic, ErrorKind, ErrorPosition};
use crate::location::Location;

/// A configuration file could not be parsed at all. The core never produces
/// this itself; it is propagated unchanged from the external parser when the
/// merger is asked to walk over a file the parser rejected.
#[derive(Debug, Clone)]
pub struct HclSyntaxError {
  /// The parser's own message, passed through verbatim.
  pub message: String,
  /// The location the parser reported, if any.
  pub location: Location,
}

impl Diagnostic for HclSyntaxError {
  fn kind(&self) -> ErrorKind { ErrorKind::HclSyntax }
  fn message(&self) -> String { self.message.clone() }
  fn positions(&self) -> Vec<ErrorPosition> { vec![self.location.clone().into()] }
}
