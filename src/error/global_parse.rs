use super::{Diagnostic, ErrorKind, ErrorPosition};
use crate::location::Location;

/// A `globals` block was structurally invalid: it carried labels, or
/// contained nested blocks. A `globals` block must have no labels and no
/// nested blocks.
#[derive(Debug, Clone)]
pub struct GlobalParseError {
  /// What made the block invalid.
  pub reason: String,
  /// Where the offending block was declared.
  pub location: Location,
}

impl Diagnostic for GlobalParseError {
  fn kind(&self) -> ErrorKind { ErrorKind::GlobalParse }
  fn message(&self) -> String { format!("invalid globals block: {}", self.reason) }
  fn positions(&self) -> Vec<ErrorPosition> { vec![self.location.clone().into()] }
}
