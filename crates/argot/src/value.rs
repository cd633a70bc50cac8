//! Typed option values and raw-token coercion.

use crate::error::UsageError;

/// Argument type attached to an option via a `{type}` code in its help
/// string: `{s}` plain string, `{i}` integer, `{n}` nonnegative integer,
/// `{f}` decimal number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Str,
    Int,
    NonNegInt,
    Float,
}

impl TypeTag {
    pub(crate) fn from_code(code: &str) -> Option<TypeTag> {
        match code {
            "s" => Some(TypeTag::Str),
            "i" => Some(TypeTag::Int),
            "n" => Some(TypeTag::NonNegInt),
            "f" => Some(TypeTag::Float),
            _ => None,
        }
    }
}

/// A single parsed option value.
///
/// `Flag` marks bare presence of a no-argument or optional-argument option;
/// the other variants carry the coerced argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Flag,
    Str(String),
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, Value::Flag)
    }
}

/// Validate and convert a raw token according to `tag`.
///
/// `opt` is the option as the user typed it (`-x` or `--name`) and only
/// appears in error messages.
pub fn coerce(raw: &str, tag: Option<TypeTag>, opt: &str) -> Result<Value, UsageError> {
    match tag {
        None | Some(TypeTag::Str) => Ok(Value::Str(raw.to_string())),
        Some(TypeTag::Int) => coerce_int(raw, opt, false),
        Some(TypeTag::NonNegInt) => coerce_int(raw, opt, true),
        Some(TypeTag::Float) => coerce_float(raw, opt),
    }
}

fn coerce_int(raw: &str, opt: &str, nonneg: bool) -> Result<Value, UsageError> {
    if !int_shaped(raw) {
        return Err(UsageError::new(format!("`{opt}` requires integer")));
    }
    // Strip a redundant `+` and leading zeros, then require the parsed value
    // to render back to the canonical form. This rejects overflow and inputs
    // like `-0` that cannot survive a round trip.
    let canon = canonical_int(raw);
    let out_of_range = || UsageError::new(format!("`{opt}` out of range"));
    let v: i64 = canon.parse().map_err(|_| out_of_range())?;
    if v.to_string() != canon || (nonneg && v < 0) {
        return Err(out_of_range());
    }
    Ok(Value::Int(v))
}

fn int_shaped(s: &str) -> bool {
    let body = s.strip_prefix(|c| c == '+' || c == '-').unwrap_or(s);
    !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit())
}

fn canonical_int(s: &str) -> String {
    let (sign, body) = match s.strip_prefix('-') {
        Some(b) => ("-", b),
        None => ("", s.strip_prefix('+').unwrap_or(s)),
    };
    let digits = body.trim_start_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    format!("{sign}{digits}")
}

fn coerce_float(raw: &str, opt: &str) -> Result<Value, UsageError> {
    let t = raw.trim();
    if float_shaped(t) {
        if let Ok(v) = t.parse::<f64>() {
            return Ok(Value::Float(v));
        }
    }
    Err(UsageError::new(format!("`{opt}` requires decimal number")))
}

// [+-]? ( digits [ "." digits? ] | "." digits ) ( [eE] [+-]? digits )?
fn float_shaped(s: &str) -> bool {
    let b = s.as_bytes();
    let mut i = 0;
    if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
        i += 1;
    }
    let start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i > start;
    let mut frac_digits = false;
    if i < b.len() && b[i] == b'.' {
        i += 1;
        let fs = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        frac_digits = i > fs;
    }
    if !int_digits && !frac_digits {
        return false;
    }
    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        i += 1;
        if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
            i += 1;
        }
        let es = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        if i == es {
            return false;
        }
    }
    i == b.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_canonicalizes_leading_zeros_and_plus() {
        assert_eq!(coerce("007", Some(TypeTag::Int), "-n").unwrap(), Value::Int(7));
        assert_eq!(coerce("+42", Some(TypeTag::Int), "-n").unwrap(), Value::Int(42));
        assert_eq!(coerce("-12", Some(TypeTag::Int), "-n").unwrap(), Value::Int(-12));
        assert_eq!(coerce("0", Some(TypeTag::Int), "-n").unwrap(), Value::Int(0));
    }

    #[test]
    fn int_rejects_garbage_and_overflow() {
        let err = coerce("abc", Some(TypeTag::Int), "-n").unwrap_err();
        assert!(err.message().contains("requires integer"));
        let err = coerce("1.5", Some(TypeTag::Int), "-n").unwrap_err();
        assert!(err.message().contains("requires integer"));
        let err = coerce("99999999999999999999", Some(TypeTag::Int), "-n").unwrap_err();
        assert!(err.message().contains("out of range"));
        // `-0` does not round-trip to its canonical rendering.
        let err = coerce("-0", Some(TypeTag::Int), "-n").unwrap_err();
        assert!(err.message().contains("out of range"));
    }

    #[test]
    fn nonneg_rejects_negative() {
        assert_eq!(coerce("3", Some(TypeTag::NonNegInt), "-n").unwrap(), Value::Int(3));
        let err = coerce("-3", Some(TypeTag::NonNegInt), "-n").unwrap_err();
        assert!(err.message().contains("out of range"));
    }

    #[test]
    fn float_accepts_numeric_literals() {
        assert_eq!(coerce("3.5", Some(TypeTag::Float), "-f").unwrap(), Value::Float(3.5));
        assert_eq!(coerce(" 2.5 ", Some(TypeTag::Float), "-f").unwrap(), Value::Float(2.5));
        assert_eq!(coerce("1e3", Some(TypeTag::Float), "-f").unwrap(), Value::Float(1000.0));
        assert_eq!(coerce("-.5", Some(TypeTag::Float), "-f").unwrap(), Value::Float(-0.5));
        assert_eq!(coerce("10", Some(TypeTag::Float), "-f").unwrap(), Value::Float(10.0));
    }

    #[test]
    fn float_rejects_non_numeric() {
        for bad in ["", "abc", "1.2.3", "1e", ".", "nan", "inf"] {
            let err = coerce(bad, Some(TypeTag::Float), "-f").unwrap_err();
            assert!(err.message().contains("requires decimal number"), "{bad}");
        }
    }

    #[test]
    fn untyped_is_identity() {
        assert_eq!(coerce("abc", None, "-s").unwrap(), Value::Str("abc".into()));
        assert_eq!(
            coerce("007", Some(TypeTag::Str), "-s").unwrap(),
            Value::Str("007".into())
        );
    }
}
