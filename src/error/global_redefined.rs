use super::{Diagnostic, ErrorKind, ErrorPosition};
use crate::location::{Location, Utf8PathBuf};

/// The same attribute name was defined by more than one `globals` block at
/// the same directory level.
#[derive(Debug, Clone)]
pub struct GlobalRedefinedError {
  /// The attribute name defined twice.
  pub name: String,
  /// The directory both definitions live in.
  pub dir: Utf8PathBuf,
  /// Location of the definition that was kept first.
  pub first: Location,
  /// Location of the conflicting redefinition.
  pub second: Location,
}

impl Diagnostic for GlobalRedefinedError {
  fn kind(&self) -> ErrorKind { ErrorKind::GlobalRedefined }
  fn message(&self) -> String {
    format!("global \"{}\" is defined more than once in {}", self.name, self.dir)
  }
  fn positions(&self) -> Vec<ErrorPosition> {
    vec![
      ErrorPosition { location: self.first.clone(), message: Some("first definition".into()) },
      ErrorPosition { location: self.second.clone(), message: Some("redefinition".into()) },
    ]
  }
}
