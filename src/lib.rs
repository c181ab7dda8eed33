#![deny(missing_docs)]
//! Merges and evaluates declarative `globals` attributes across a project's
//! directory tree into the concrete, per-stack values a code generator
//! consumes.
//!
//! The crate is a pure, I/O-free evaluation core: it never parses
//! configuration text and never touches a filesystem. Callers supply parsed
//! [`expr::Expr`] trees through a [`merger::ConfigSource`] implementation and
//! get back a fully evaluated [`evaluator::GlobalsMap`] or a precisely
//! classified [`error::EvalError`].

pub mod error;
pub mod evaluator;
pub mod expr;
pub mod host;
pub mod location;
pub mod merger;
pub mod stack;
pub mod value;

pub use error::{EvalError, EvalResult};
pub use evaluator::GlobalsMap;
pub use host::HostConfig;
pub use location::{Location, Origin, Utf8PathBuf};
pub use merger::{ConfigSource, GlobalsBlock, UnevaluatedGlobals};
pub use stack::StackMeta;
pub use value::{Number, Object, Value};

use error::GlobalParseError;

/// Merge and evaluate every `globals` attribute visible to `stack`, from
/// `project_root` down to the stack's own directory, yielding its final
/// globals map.
///
/// `project_root` must be an absolute logical path; a relative one is
/// rejected before any ancestor is walked.
pub fn load_stack_globals(
  project_root: &Utf8PathBuf,
  stack: &StackMeta,
  source: &dyn ConfigSource,
  host: &HostConfig,
) -> EvalResult<GlobalsMap> {
  if !project_root.is_absolute() {
    return Err(EvalError::single(GlobalParseError {
      reason: format!("project root \"{project_root}\" must be an absolute path"),
      location: Location::Unknown,
    }));
  }
  let globals = merger::merge_globals(&stack.path, source)?;
  evaluator::evaluate(&globals, stack, host)
}
