//! The hierarchy merger: walks from the project root down to a stack
//! directory, ingesting `globals` blocks along the way, and produces the
//! unevaluated globals map for that stack.

use hashbrown::HashMap;
use std::sync::Arc;

use crate::error::{EvalError, EvalResult, GlobalParseError, GlobalRedefinedError};
use crate::expr::Expr;
use crate::location::{Location, Origin, Utf8PathBuf};

/// A single `globals { ... }` block as the external parser hands it in,
/// before the merger has validated its shape.
#[derive(Debug, Clone)]
pub struct GlobalsBlock {
  /// Block labels. Must be empty; a `globals "foo" { ... }` is rejected.
  pub labels: Vec<String>,
  /// Whether the block contains any nested block (as opposed to only plain
  /// attributes). Must be `false`.
  pub has_nested_blocks: bool,
  /// The attributes declared in this block, in source order. The parser
  /// guarantees no name repeats *within one block* (a duplicate inside a
  /// single block is `ErrHCLSyntax`, not this crate's concern).
  pub attrs: Vec<(String, Expr)>,
  /// The file this block was declared in.
  pub file: Utf8PathBuf,
  /// The block's own location, used when the block itself is rejected.
  pub location: Location,
}

/// The parser/file-system collaborator the merger consumes. A production
/// caller backs this with an HCL file loader; tests back it with an
/// in-memory map (see `tests::MapConfigSource` below).
pub trait ConfigSource {
  /// All `globals` blocks declared directly in `dir` (not its descendants),
  /// across every configuration file found there. Order between files does
  /// not matter. Propagates the external parser's own errors unchanged
  /// (`ErrHCLSyntax`) if a file couldn't be read.
  fn globals_blocks(&self, dir: &Utf8PathBuf) -> EvalResult<Vec<GlobalsBlock>>;
}

/// The unevaluated globals map for one stack: an ordered `name -> (Expr,
/// Origin)` mapping with no two entries sharing a name.
#[derive(Debug, Clone, Default)]
pub struct UnevaluatedGlobals {
  order: Vec<String>,
  entries: HashMap<String, (Expr, Origin)>,
}

impl UnevaluatedGlobals {
  /// An empty map.
  pub fn new() -> Self { Self::default() }

  /// Insert or override an attribute. If `name` was already present (from a
  /// shallower directory), its previous expression and origin are discarded
  /// and its position in iteration order is preserved — deeper directories
  /// win the *value*, not necessarily a fresh slot. An entry's origin is
  /// always the directory that won, never an overridden one.
  pub fn insert_override(&mut self, name: String, expr: Expr, origin: Origin) {
    if !self.entries.contains_key(&name) {
      self.order.push(name.clone());
    }
    self.entries.insert(name, (expr, origin));
  }

  /// Look up an attribute by name.
  pub fn get(&self, name: &str) -> Option<&(Expr, Origin)> { self.entries.get(name) }

  /// Whether `name` is defined at all.
  pub fn contains(&self, name: &str) -> bool { self.entries.contains_key(name) }

  /// Iterate attributes in first-declared order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &Expr, &Origin)> {
    self.order.iter().map(move |name| {
      let (expr, origin) = &self.entries[name];
      (name.as_str(), expr, origin)
    })
  }

  /// Number of attributes.
  pub fn len(&self) -> usize { self.order.len() }

  /// Whether the map has no attributes.
  pub fn is_empty(&self) -> bool { self.order.is_empty() }
}

/// Walk every ancestor directory from the project root down to `stack`,
/// inclusive, merging `globals` blocks with last-write-wins override
/// semantics.
pub fn merge_globals(
  stack: &Utf8PathBuf,
  source: &dyn ConfigSource,
) -> EvalResult<UnevaluatedGlobals> {
  let mut globals = UnevaluatedGlobals::new();
  for dir in stack.ancestors_from_root() {
    let blocks = source.globals_blocks(&dir)?;
    let mut seen_in_dir: HashMap<String, Location> = HashMap::new();
    for block in blocks {
      if !block.labels.is_empty() || block.has_nested_blocks {
        let reason = if !block.labels.is_empty() {
          "globals blocks may not carry labels".to_string()
        } else {
          "globals blocks may not contain nested blocks".to_string()
        };
        return Err(EvalError::single(GlobalParseError { reason, location: block.location }));
      }
      for (name, expr) in block.attrs {
        if let Some(first) = seen_in_dir.get(&name) {
          return Err(EvalError::single(GlobalRedefinedError {
            name,
            dir: dir.clone(),
            first: first.clone(),
            second: expr.location.clone(),
          }));
        }
        seen_in_dir.insert(name.clone(), expr.location.clone());
        let origin = Origin {
          dir: Arc::new(dir.clone()),
          file: Arc::new(block.file.clone()),
          location: expr.location.clone(),
        };
        globals.insert_override(name, expr, origin);
      }
    }
  }
  Ok(globals)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::expr::ExprKind;
  use crate::value::Value;

  /// An in-memory [ConfigSource] keyed by logical directory, for tests.
  #[derive(Default)]
  pub struct MapConfigSource {
    pub dirs: HashMap<String, Vec<GlobalsBlock>>,
  }

  impl MapConfigSource {
    fn block(attrs: Vec<(&str, Expr)>) -> GlobalsBlock {
      GlobalsBlock {
        labels: vec![],
        has_nested_blocks: false,
        attrs: attrs.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        file: Utf8PathBuf::new("main.tm.hcl"),
        location: Location::Unknown,
      }
    }

    fn with(mut self, dir: &str, attrs: Vec<(&str, Expr)>) -> Self {
      self.dirs.entry(dir.to_string()).or_default().push(Self::block(attrs));
      self
    }
  }

  impl ConfigSource for MapConfigSource {
    fn globals_blocks(&self, dir: &Utf8PathBuf) -> EvalResult<Vec<GlobalsBlock>> {
      Ok(self.dirs.get(dir.as_str()).cloned().unwrap_or_default())
    }
  }

  fn lit(s: &str) -> Expr { Expr::unlocated(ExprKind::Literal(Value::string(s))) }

  #[test]
  fn root_merges_into_two_stacks() {
    let source = MapConfigSource::default().with("/", vec![("root", lit("hi"))]);
    for stack in ["/stacks/stack-1", "/stacks/stack-2"] {
      let merged = merge_globals(&Utf8PathBuf::new(stack), &source).unwrap();
      let (_, expr, _) = merged.iter().find(|(n, ..)| *n == "root").unwrap();
      assert!(matches!(&expr.kind, ExprKind::Literal(Value::String(s)) if &**s == "hi"));
    }
  }

  #[test]
  fn deeper_directory_overrides_shallower() {
    let source = MapConfigSource::default()
      .with("/", vec![("field_a", lit("A0")), ("field_b", lit("B0"))])
      .with("/stacks", vec![
        ("field_b", lit("B1")),
        ("field_c", lit("C1")),
        ("field_d", lit("D1")),
      ])
      .with("/stacks/stack-1", vec![
        ("field_a", lit("A*")),
        ("field_b", lit("B*")),
        ("field_c", lit("C*")),
      ])
      .with("/stacks/stack-2", vec![("field_d", lit("D*"))]);

    let assert_value = |merged: &UnevaluatedGlobals, name: &str, expected: &str| {
      let (_, expr, _) = merged.iter().find(|(n, ..)| *n == name).unwrap();
      match &expr.kind {
        ExprKind::Literal(Value::String(s)) => assert_eq!(&**s, expected, "{name}"),
        _ => panic!("{name} is not a literal string"),
      }
    };

    let stack1 = merge_globals(&Utf8PathBuf::new("/stacks/stack-1"), &source).unwrap();
    assert_value(&stack1, "field_a", "A*");
    assert_value(&stack1, "field_b", "B*");
    assert_value(&stack1, "field_c", "C*");
    assert_value(&stack1, "field_d", "D1");

    let stack2 = merge_globals(&Utf8PathBuf::new("/stacks/stack-2"), &source).unwrap();
    assert_value(&stack2, "field_a", "A0");
    assert_value(&stack2, "field_b", "B1");
    assert_value(&stack2, "field_c", "C1");
    assert_value(&stack2, "field_d", "D*");

    let stack3 = merge_globals(&Utf8PathBuf::new("/stacks/stack-3"), &source).unwrap();
    assert_value(&stack3, "field_a", "A0");
    assert_value(&stack3, "field_b", "B1");
    assert_value(&stack3, "field_c", "C1");
    assert_value(&stack3, "field_d", "D1");
  }

  #[test]
  fn unused_ill_referenced_shallow_definition_is_ignored() {
    // An undefined reference at the root is never evaluated because
    // `/stacks/a` redefines `field`; the merger doesn't even look at the
    // shallow expression's shape, so this succeeds.
    let bogus = Expr::unlocated(ExprKind::Reference(crate::expr::Reference {
      namespace: "global".into(),
      root: "does_not_exist_anywhere".into(),
      path: vec![],
    }));
    let source = MapConfigSource::default()
      .with("/", vec![("field", bogus)])
      .with("/stacks/a", vec![("field", lit("fine"))]);
    let merged = merge_globals(&Utf8PathBuf::new("/stacks/a"), &source).unwrap();
    let (_, expr, _) = merged.iter().find(|(n, ..)| *n == "field").unwrap();
    assert!(matches!(&expr.kind, ExprKind::Literal(Value::String(s)) if &**s == "fine"));
  }

  #[test]
  fn same_directory_redefinition_is_an_error() {
    let mut source = MapConfigSource::default();
    source.dirs.entry("/".to_string()).or_default().extend([
      MapConfigSource::block(vec![("a", lit("1"))]),
      MapConfigSource::block(vec![("a", lit("2"))]),
    ]);
    let err = merge_globals(&Utf8PathBuf::new("/stacks/a"), &source).unwrap_err();
    assert_eq!(err.kind(), crate::error::ErrorKind::GlobalRedefined);
  }

  #[test]
  fn labeled_globals_block_is_rejected() {
    let mut source = MapConfigSource::default();
    let mut block = MapConfigSource::block(vec![("a", lit("1"))]);
    block.labels.push("oops".into());
    source.dirs.entry("/".to_string()).or_default().push(block);
    let err = merge_globals(&Utf8PathBuf::new("/"), &source).unwrap_err();
    assert_eq!(err.kind(), crate::error::ErrorKind::GlobalParse);
  }
}
