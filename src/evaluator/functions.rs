//! The builtin function registry.
//!
//! One small file mapping names to Rust closures over already-evaluated
//! arguments, generated by a `paste`-driven macro so each entry only has to
//! state its name and body once.

use crate::error::{EvalError, FunctionFailureError};
use crate::host::HostConfig;
use crate::location::Location;
use crate::value::{Number, Value};

trait_set::trait_set! {
  /// The bound every registry entry's implementation must satisfy: a pure
  /// function from already-evaluated arguments (plus the injected host
  /// configuration) to a value or a function-specific failure.
  pub trait Builtin = Fn(&[Value], &HostConfig, &Location) -> Result<Value, EvalError> + Send + Sync;
}

fn fail(function: &'static str, reason: impl Into<String>, location: &Location) -> EvalError {
  EvalError::single(FunctionFailureError { function, reason: reason.into(), location: location.clone() })
}

fn expect_arity(
  function: &'static str,
  args: &[Value],
  n: usize,
  location: &Location,
) -> Result<(), EvalError> {
  if args.len() != n {
    return Err(fail(function, format!("expected {n} argument(s), got {}", args.len()), location));
  }
  Ok(())
}

fn expect_string<'a>(
  function: &'static str,
  value: &'a Value,
  location: &Location,
) -> Result<&'a str, EvalError> {
  match value {
    Value::String(s) => Ok(s),
    other => Err(fail(function, format!("expected a string, got a {}", other.type_name()), location)),
  }
}

fn expect_int(function: &'static str, value: &Value, location: &Location) -> Result<i64, EvalError> {
  match value {
    Value::Number(Number::Int(i)) => Ok(*i),
    other => Err(fail(function, format!("expected an integer, got a {}", other.type_name()), location)),
  }
}

macro_rules! builtins {
  ($($name:ident($args:ident, $host:ident, $location:ident) $body:block)+) => {
    paste::paste! {
      $(
        fn [<fn_ $name>]($args: &[Value], $host: &HostConfig, $location: &Location) -> Result<Value, EvalError> $body
      )+

      /// Look up and invoke a builtin by name. `None` means the name is not
      /// in the registry at all (`ErrGlobalEval` via
      /// [crate::error::UnknownFunctionError], raised by the caller).
      pub fn dispatch(
        name: &str,
        args: &[Value],
        host: &HostConfig,
        location: &Location,
      ) -> Option<Result<Value, EvalError>> {
        match name {
          $(stringify!($name) => Some([<fn_ $name>](args, host, location)),)+
          _ => None,
        }
      }
    }
  };
}

builtins! {
  replace(args, _host, location) {
    expect_arity("replace", args, 3, location)?;
    let s = expect_string("replace", &args[0], location)?;
    let old = expect_string("replace", &args[1], location)?;
    let new = expect_string("replace", &args[2], location)?;
    Ok(Value::string(s.replace(old, new)))
  }

  split(args, _host, location) {
    expect_arity("split", args, 2, location)?;
    let sep = expect_string("split", &args[0], location)?;
    let s = expect_string("split", &args[1], location)?;
    let parts = if sep.is_empty() {
      vec![Value::string(s)]
    } else {
      s.split(sep).map(Value::string).collect()
    };
    Ok(Value::list(parts))
  }

  basename(args, host, location) {
    expect_arity("basename", args, 1, location)?;
    let s = expect_string("basename", &args[0], location)?;
    let base = s.rsplit(host.path_separator).next().unwrap_or(s);
    Ok(Value::string(base))
  }

  dirname(args, host, location) {
    expect_arity("dirname", args, 1, location)?;
    let s = expect_string("dirname", &args[0], location)?;
    match s.rfind(host.path_separator) {
      Some(idx) => Ok(Value::string(&s[..idx])),
      None => Ok(Value::string("")),
    }
  }

  substr(args, _host, location) {
    expect_arity("substr", args, 3, location)?;
    let s = expect_string("substr", &args[0], location)?;
    let start = expect_int("substr", &args[1], location)?;
    let len = expect_int("substr", &args[2], location)?;
    if start < 0 || len < 0 {
      return Err(fail("substr", "start and length must be non-negative", location));
    }
    let chars: Vec<char> = s.chars().collect();
    let start = start as usize;
    let end = start.saturating_add(len as usize);
    if start > chars.len() || end > chars.len() {
      return Err(fail(
        "substr",
        format!("range {start}..{end} is out of bounds for a {}-codepoint string", chars.len()),
        location,
      ));
    }
    Ok(Value::string(chars[start..end].iter().collect::<String>()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn replace_is_left_to_right_and_non_overlapping() {
    let args = [Value::string("aaa"), Value::string("aa"), Value::string("b")];
    let out = fn_replace(&args, &HostConfig::unix(), &Location::Unknown).unwrap();
    assert_eq!(out, Value::string("ba"));
  }

  #[test]
  fn split_produces_a_list_of_strings() {
    let args = [Value::string(","), Value::string("a,b,c")];
    let out = fn_split(&args, &HostConfig::unix(), &Location::Unknown).unwrap();
    assert_eq!(out, Value::list(vec![Value::string("a"), Value::string("b"), Value::string("c")]));
  }

  #[test]
  fn basename_and_dirname_honor_the_host_separator() {
    let host = HostConfig::windows();
    let args = [Value::string(r"C:\stacks\web")];
    assert_eq!(fn_basename(&args, &host, &Location::Unknown).unwrap(), Value::string("web"));
    assert_eq!(fn_dirname(&args, &host, &Location::Unknown).unwrap(), Value::string(r"C:\stacks"));
  }

  #[test]
  fn substr_counts_unicode_codepoints_not_bytes() {
    let args = [Value::string("héllo"), Value::Number(Number::Int(1)), Value::Number(Number::Int(2))];
    let out = fn_substr(&args, &HostConfig::unix(), &Location::Unknown).unwrap();
    assert_eq!(out, Value::string("él"));
  }

  #[test]
  fn substr_out_of_range_is_a_function_failure() {
    let args = [Value::string("ab"), Value::Number(Number::Int(0)), Value::Number(Number::Int(5))];
    assert!(fn_substr(&args, &HostConfig::unix(), &Location::Unknown).is_err());
  }

  #[test]
  fn unknown_name_is_not_in_the_registry() {
    assert!(dispatch("frobnicate", &[], &HostConfig::unix(), &Location::Unknown).is_none());
  }
}
