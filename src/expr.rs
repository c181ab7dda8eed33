//! The expression surface the core receives from the external parser.
//!
//! A location-free tagged variant ([ExprKind]) wrapped in a thin shell that
//! carries the one piece of metadata every node needs ([Expr::location]).
//! The core never parses text into this tree and never mutates it — it only
//! inspects it.

use crate::location::Location;

/// One step of a dotted reference path following the namespace root and
/// root name, e.g. the `.members` and `.0` in `global.team.members.0`.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
  /// Descend into an [crate::value::Value::Object] by key.
  Field(String),
  /// Descend into a [crate::value::Value::List] by position.
  Index(usize),
}

/// A `global.*` or `terramate.*` reference, or a reference through any other
/// namespace root, which is always an evaluation error.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
  /// The first path segment: `"global"`, `"terramate"`, or anything else.
  pub namespace: String,
  /// For `global.*`, the root attribute name. For `terramate.*`, the field
  /// name. Empty only if the parser allows a bare `global` or `terramate`
  /// reference, which this core always rejects.
  pub root: String,
  /// Further dotted/indexed descent past the root.
  pub path: Vec<PathSegment>,
}

/// One part of a [ExprKind::Template]: either literal source text or a
/// sub-expression to evaluate and splice in.
#[derive(Debug, Clone)]
pub enum TemplatePart {
  /// Literal characters copied verbatim.
  Literal(String),
  /// A sub-expression whose evaluated value is spliced in.
  Expr(Expr),
}

/// The expression tree node kinds this core evaluates.
#[derive(Debug, Clone)]
pub enum ExprKind {
  /// A value known without evaluation.
  Literal(crate::value::Value),
  /// A `global.*` or `terramate.*` reference.
  Reference(Reference),
  /// A call to one of the registry's builtin functions.
  FunctionCall {
    /// The function's name.
    name: String,
    /// Evaluated left-to-right before the call.
    args: Vec<Expr>,
  },
  /// A string built from literal parts and spliced sub-expressions.
  Template(Vec<TemplatePart>),
  /// A list literal.
  ListCtor(Vec<Expr>),
  /// An object literal. Keys are plain identifiers, not expressions.
  ObjectCtor(Vec<(String, Expr)>),
  /// Structural indexing into a list or object by an evaluated key.
  Index {
    /// The value being indexed into.
    base: Box<Expr>,
    /// The key or offset, evaluated before indexing.
    key: Box<Expr>,
  },
  /// The first arm that evaluates successfully wins; if all fail, the error
  /// from the last arm propagates.
  Try(Vec<Expr>),
}

/// An expression node together with the source range the parser attached to
/// it. The core treats [Expr::location] as opaque and only forwards it into
/// diagnostics.
#[derive(Debug, Clone)]
pub struct Expr {
  /// The node itself.
  pub kind: ExprKind,
  /// Where the parser found it.
  pub location: Location,
}

impl Expr {
  /// Construct an expression with a known location.
  pub fn new(kind: ExprKind, location: Location) -> Self { Self { kind, location } }

  /// Construct an expression with no location information, for
  /// programmatically-built trees (tests, generated defaults).
  pub fn unlocated(kind: ExprKind) -> Self { Self { kind, location: Location::Unknown } }

  /// Visit every `global.<root>` name this expression may read, including
  /// references nested in function arguments, template splices, and `try`
  /// arms. `terramate.*` contributes nothing.
  pub fn visit_global_roots(&self, cb: &mut impl FnMut(&str)) {
    match &self.kind {
      ExprKind::Literal(_) => {},
      ExprKind::Reference(r) => {
        if r.namespace == "global" {
          cb(&r.root);
        }
      },
      ExprKind::FunctionCall { args, .. } => args.iter().for_each(|a| a.visit_global_roots(cb)),
      ExprKind::Template(parts) => parts.iter().for_each(|p| {
        if let TemplatePart::Expr(e) = p {
          e.visit_global_roots(cb)
        }
      }),
      ExprKind::ListCtor(items) => items.iter().for_each(|e| e.visit_global_roots(cb)),
      ExprKind::ObjectCtor(fields) => fields.iter().for_each(|(_, e)| e.visit_global_roots(cb)),
      ExprKind::Index { base, key } => {
        base.visit_global_roots(cb);
        key.visit_global_roots(cb);
      },
      ExprKind::Try(arms) => arms.iter().for_each(|a| a.visit_global_roots(cb)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn global_ref(root: &str) -> Expr {
    Expr::unlocated(ExprKind::Reference(Reference {
      namespace: "global".into(),
      root: root.into(),
      path: vec![],
    }))
  }

  #[test]
  fn collects_refs_through_function_args_and_try_arms() {
    let expr = Expr::unlocated(ExprKind::Try(vec![
      Expr::unlocated(ExprKind::FunctionCall {
        name: "replace".into(),
        args: vec![global_ref("a"), global_ref("b")],
      }),
      global_ref("c"),
    ]));
    let mut seen = Vec::new();
    expr.visit_global_roots(&mut |name| seen.push(name.to_string()));
    assert_eq!(seen, vec!["a", "b", "c"]);
  }

  #[test]
  fn terramate_references_contribute_no_dependency() {
    let expr = Expr::unlocated(ExprKind::Reference(Reference {
      namespace: "terramate".into(),
      root: "name".into(),
      path: vec![],
    }));
    let mut seen = Vec::new();
    expr.visit_global_roots(&mut |name| seen.push(name.to_string()));
    assert!(seen.is_empty());
  }
}
