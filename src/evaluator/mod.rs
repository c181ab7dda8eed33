//! Reference resolution, dependency ordering, and expression evaluation.
//!
//! The demand-driven walk and its cycle detection use a borrowed,
//! call-stack-shaped [Stackframe] to track the chain of attributes currently
//! being evaluated, giving O(1) cycle membership checks without any
//! heap-allocated visited set.

mod functions;

use hashbrown::HashMap;
use itertools::Itertools;
use substack::{Stackframe, Substack};

use crate::error::{
  BadIndexError, EvalError, EvalResult, NonStringifiableError, ReferenceCycleError,
  UnknownFunctionError, UnknownReferenceError,
};
use crate::expr::{Expr, ExprKind, PathSegment, TemplatePart};
use crate::host::HostConfig;
use crate::location::Location;
use crate::merger::UnevaluatedGlobals;
use crate::stack::StackMeta;
use crate::value::{stringify, Number, Object, Value};

/// The final globals map for one stack: `name -> Value`, produced only when
/// every attribute evaluates successfully.
#[derive(Debug, Clone, Default)]
pub struct GlobalsMap {
  order: Vec<String>,
  values: HashMap<String, Value>,
}

impl GlobalsMap {
  fn new() -> Self { Self::default() }

  fn insert(&mut self, name: String, value: Value) {
    if !self.values.contains_key(&name) {
      self.order.push(name.clone());
    }
    self.values.insert(name, value);
  }

  /// Look up an evaluated attribute.
  pub fn get(&self, name: &str) -> Option<&Value> { self.values.get(name) }

  /// Iterate attributes in first-declared order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
    self.order.iter().map(move |name| (name.as_str(), &self.values[name]))
  }

  /// Number of evaluated attributes.
  pub fn len(&self) -> usize { self.order.len() }

  /// Whether the map has no attributes.
  pub fn is_empty(&self) -> bool { self.order.is_empty() }
}

impl std::fmt::Display for GlobalsMap {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{{{}}}", self.iter().map(|(k, v)| format!("{k} = {v:?}")).join(", "))
  }
}

/// Evaluate every attribute in `globals` against `stack`'s metadata, under
/// `host`'s platform behavior, into a [GlobalsMap].
///
/// Independently detectable failures across different top-level attributes
/// are collected and reported together rather than one at a time. Each
/// attribute's outcome — success or failure — is computed once and reused by
/// every dependent, so a diagnostic shared by several attributes (a cycle
/// running through all of them, say) is reported once, not once per
/// attribute that depends on it.
pub fn evaluate(globals: &UnevaluatedGlobals, stack: &StackMeta, host: &HostConfig) -> EvalResult<GlobalsMap> {
  let mut memo: HashMap<String, Result<Value, EvalError>> = HashMap::new();
  let mut errors = Vec::new();
  for (name, _, _) in globals.iter() {
    if memo.contains_key(name) {
      continue;
    }
    let frame = Substack::Bottom.new_frame(name);
    if let Err(e) = eval_attr(globals, stack, host, &mut memo, frame, &Location::Unknown) {
      errors.push(e);
    }
  }
  if !errors.is_empty() {
    return Err(EvalError::aggregate(errors));
  }
  let mut out = GlobalsMap::new();
  for (name, _, _) in globals.iter() {
    let value = match memo.remove(name).expect("every attribute evaluated above") {
      Ok(value) => value,
      Err(_) => unreachable!("no attribute failed: checked above"),
    };
    out.insert(name.to_string(), value);
  }
  Ok(out)
}

/// Evaluate (or fetch the memoized outcome of) the global attribute named by
/// `chain.item`, a frame in the chain of attributes currently being
/// resolved. `reference_location` is the location of the reference that
/// first demanded this attribute, used only if the attribute turns out not
/// to exist at all.
///
/// The outcome — `Ok` or `Err` alike — is cached under `name` before
/// returning, so a failing attribute is evaluated exactly once no matter how
/// many dependents demand it.
fn eval_attr<'a>(
  globals: &'a UnevaluatedGlobals,
  stack: &StackMeta,
  host: &HostConfig,
  memo: &mut HashMap<String, Result<Value, EvalError>>,
  chain: Stackframe<'a, &'a str>,
  reference_location: &Location,
) -> Result<Value, EvalError> {
  let name: &str = chain.item;
  if let Some(cached) = memo.get(name) {
    return cached.clone();
  }
  let result = match globals.get(name) {
    None => Err(EvalError::single(UnknownReferenceError {
      reference: format!("global.{name}"),
      location: reference_location.clone(),
    })),
    Some((expr, _origin)) => eval_expr(expr, globals, stack, host, memo, Substack::Frame(chain)),
  };
  memo.insert(name.to_string(), result.clone());
  result
}

fn eval_expr<'a>(
  expr: &'a Expr,
  globals: &'a UnevaluatedGlobals,
  stack: &StackMeta,
  host: &HostConfig,
  memo: &mut HashMap<String, Result<Value, EvalError>>,
  chain: Substack<'a, &'a str>,
) -> EvalResult<Value> {
  match &expr.kind {
    ExprKind::Literal(v) => Ok(v.clone()),

    ExprKind::Reference(r) => match r.namespace.as_str() {
      "global" => {
        let dep = r.root.as_str();
        if chain.iter().any(|c| *c == dep) {
          let mut names = vec![dep.to_string()];
          names.extend(chain.iter().map(|s| s.to_string()));
          let locations = names
            .iter()
            .map(|n| globals.get(n).map(|(e, _)| e.location.clone()).unwrap_or(Location::Unknown))
            .collect();
          return Err(EvalError::single(ReferenceCycleError { names, locations }));
        }
        let base = eval_attr(globals, stack, host, memo, chain.new_frame(dep), &expr.location)?;
        resolve_path(&base, &r.path, &expr.location)
      },
      "terramate" => {
        let base = stack.field(&r.root).ok_or_else(|| {
          EvalError::single(UnknownReferenceError {
            reference: format!("terramate.{}", r.root),
            location: expr.location.clone(),
          })
        })?;
        resolve_path(&base, &r.path, &expr.location)
      },
      other => Err(EvalError::single(UnknownReferenceError {
        reference: format!("{other}.{}", r.root),
        location: expr.location.clone(),
      })),
    },

    ExprKind::FunctionCall { name, args } => {
      let values =
        args.iter().map(|a| eval_expr(a, globals, stack, host, memo, chain)).collect::<EvalResult<Vec<_>>>()?;
      match functions::dispatch(name, &values, host, &expr.location) {
        Some(result) => result,
        None =>
          Err(EvalError::single(UnknownFunctionError { name: name.clone(), location: expr.location.clone() })),
      }
    },

    ExprKind::Template(parts) => {
      if let [TemplatePart::Expr(only)] = parts.as_slice() {
        return eval_expr(only, globals, stack, host, memo, chain);
      }
      let mut out = String::new();
      for part in parts {
        match part {
          TemplatePart::Literal(s) => out.push_str(s),
          TemplatePart::Expr(sub) => {
            let v = eval_expr(sub, globals, stack, host, memo, chain)?;
            match stringify(&v) {
              Some(s) => out.push_str(&s),
              None =>
                return Err(EvalError::single(NonStringifiableError {
                  type_name: v.type_name(),
                  location: sub.location.clone(),
                })),
            }
          },
        }
      }
      Ok(Value::string(out))
    },

    ExprKind::ListCtor(items) => {
      let values =
        items.iter().map(|e| eval_expr(e, globals, stack, host, memo, chain)).collect::<EvalResult<Vec<_>>>()?;
      Ok(Value::list(values))
    },

    ExprKind::ObjectCtor(fields) => {
      let mut out = Vec::with_capacity(fields.len());
      for (key, e) in fields {
        let value = eval_expr(e, globals, stack, host, memo, chain)?;
        out.push((key.as_str().into(), value));
      }
      Ok(Value::Object(Object::new(out)))
    },

    ExprKind::Index { base, key } => {
      let base = eval_expr(base, globals, stack, host, memo, chain)?;
      let key = eval_expr(key, globals, stack, host, memo, chain)?;
      index_value(&base, &key, &expr.location)
    },

    ExprKind::Try(arms) => {
      let mut last_err = None;
      for arm in arms {
        match eval_expr(arm, globals, stack, host, memo, chain) {
          Ok(v) => return Ok(v),
          Err(e) => last_err = Some(e),
        }
      }
      Err(last_err.unwrap_or_else(|| {
        EvalError::single(crate::error::FunctionFailureError {
          function: "try",
          reason: "no arms to evaluate".into(),
          location: expr.location.clone(),
        })
      }))
    },
  }
}

/// Descend into `base` through a dotted/indexed path, as produced by
/// `global.root.path...` or `terramate.field.path...` references.
fn resolve_path(base: &Value, path: &[PathSegment], location: &Location) -> EvalResult<Value> {
  let mut current = base.clone();
  for segment in path {
    current = match segment {
      PathSegment::Field(field) => index_value(&current, &Value::string(field.clone()), location)?,
      PathSegment::Index(i) =>
        index_value(&current, &Value::Number(Number::Int(*i as i64)), location)?,
    };
  }
  Ok(current)
}

fn index_value(base: &Value, key: &Value, location: &Location) -> EvalResult<Value> {
  match (base, key) {
    (Value::Object(obj), Value::String(field)) => obj.get(field).cloned().ok_or_else(|| {
      EvalError::single(BadIndexError { base_type: "object", key: field.to_string(), location: location.clone() })
    }),
    (Value::List(items), Value::Number(Number::Int(i))) => {
      let idx = usize::try_from(*i).ok().and_then(|idx| items.get(idx));
      idx.cloned().ok_or_else(|| {
        EvalError::single(BadIndexError { base_type: "list", key: i.to_string(), location: location.clone() })
      })
    },
    (other, key) => Err(EvalError::single(BadIndexError {
      base_type: other.type_name(),
      key: stringify(key).unwrap_or_else(|| key.type_name().to_string()),
      location: location.clone(),
    })),
  }
}
