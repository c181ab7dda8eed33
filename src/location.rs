//! Source locations and attribute origins.
//!
//! The core never parses or reads files itself; it treats every [Location]
//! as an opaque token supplied by the external parser and only uses it to
//! decorate diagnostics (see [crate::error]).

use std::fmt::Display;
use std::ops::Range;
use std::sync::Arc;

/// A span of a configuration file, identified by a sequence of unicode code
/// point offsets. Meaningful only to a human reading the original source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
  /// Location information was lost, or the expression was generated rather
  /// than parsed.
  Unknown,
  /// Only the file is known, not a specific span within it.
  File(Arc<Utf8PathBuf>),
  /// A code point range within a known file.
  Range {
    /// The file the range belongs to.
    file: Arc<Utf8PathBuf>,
    /// Unicode code point offsets into the file.
    range: Range<usize>,
  },
}

impl Location {
  /// The range, if known. If the range is known the file is always known.
  pub fn range(&self) -> Option<Range<usize>> {
    match self {
      Self::Range { range, .. } => Some(range.clone()),
      _ => None,
    }
  }

  /// The file, if known.
  pub fn file(&self) -> Option<&Utf8PathBuf> {
    match self {
      Self::File(file) | Self::Range { file, .. } => Some(file),
      Self::Unknown => None,
    }
  }
}

impl Display for Location {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Unknown => write!(f, "<unknown>"),
      Self::File(file) => write!(f, "{file}"),
      Self::Range { file, range } =>
        write!(f, "{file}:{}..{}", range.start, range.end),
    }
  }
}

/// A minimal standalone stand-in for a UTF-8 validated path. The real parser
/// and scanner collaborators are expected to hand in whatever their own path
/// type lowers to; the core only ever displays and compares it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Utf8PathBuf(String);

impl Utf8PathBuf {
  /// Build a path from an owned string, without touching the filesystem.
  pub fn new(path: impl Into<String>) -> Self { Self(path.into()) }

  /// Borrow the path as a plain string slice.
  pub fn as_str(&self) -> &str { &self.0 }

  /// Whether this path is an absolute logical path (starts with `/`).
  pub fn is_absolute(&self) -> bool { self.0.starts_with('/') }

  /// The parent directory, if any segment precedes the final one.
  pub fn parent(&self) -> Option<Utf8PathBuf> {
    let trimmed = self.0.trim_end_matches('/');
    let idx = trimmed.rfind('/')?;
    if idx == 0 { Some(Utf8PathBuf::new("/")) } else { Some(Utf8PathBuf::new(&trimmed[..idx])) }
  }

  /// Every ancestor directory from the root down to and including `self`.
  pub fn ancestors_from_root(&self) -> Vec<Utf8PathBuf> {
    let trimmed = self.0.trim_end_matches('/');
    let segments: Vec<&str> =
      trimmed.split('/').filter(|s| !s.is_empty()).collect();
    let mut out = Vec::with_capacity(segments.len() + 1);
    out.push(Utf8PathBuf::new("/"));
    let mut acc = String::new();
    for seg in segments {
      acc.push('/');
      acc.push_str(seg);
      out.push(Utf8PathBuf::new(acc.clone()));
    }
    out
  }
}

impl Display for Utf8PathBuf {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<&str> for Utf8PathBuf {
  fn from(value: &str) -> Self { Self::new(value) }
}

/// Where a globals attribute came from: the directory that contributed it,
/// the file within that directory, and the span inside that file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin {
  /// The directory that won the merge for this attribute (never an
  /// overridden ancestor).
  pub dir: Arc<Utf8PathBuf>,
  /// The configuration file within `dir` that declared the attribute.
  pub file: Arc<Utf8PathBuf>,
  /// The attribute's location within `file`.
  pub location: Location,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ancestors_from_root_includes_stack_dir() {
    let stack = Utf8PathBuf::new("/envs/prod/stacks/web");
    let ancestors = stack.ancestors_from_root();
    assert_eq!(
      ancestors.iter().map(Utf8PathBuf::as_str).collect::<Vec<_>>(),
      vec!["/", "/envs", "/envs/prod", "/envs/prod/stacks", "/envs/prod/stacks/web"]
    );
  }

  #[test]
  fn root_has_a_single_ancestor() {
    let root = Utf8PathBuf::new("/");
    assert_eq!(root.ancestors_from_root(), vec![Utf8PathBuf::new("/")]);
  }
}
