//! Parse results and the tagged parse outcome.

use std::slice;

use indexmap::IndexMap;

use crate::spec::Arity;
use crate::value::Value;

/// The recorded value(s) for one canonical option: a scalar for plain
/// options, an ordered list for repeated ones (or for any option once the
/// all-multi merge mode is enabled).
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Single(Value),
    Many(Vec<Value>),
}

impl OptionValue {
    /// All values in occurrence order; a scalar is a one-element slice.
    pub fn values(&self) -> &[Value] {
        match self {
            OptionValue::Single(v) => slice::from_ref(v),
            OptionValue::Many(vs) => vs,
        }
    }

    /// The effective value: the scalar, or the last element of a list.
    pub fn last(&self) -> Option<&Value> {
        self.values().last()
    }
}

/// Everything one `parse` call produced: option values keyed by canonical
/// name in first-occurrence order, the positional tail, the matched
/// subcommand, and (under the Collect policy) unrecognized option tokens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseResult {
    pub(crate) options: IndexMap<String, OptionValue>,
    pub(crate) positionals: Vec<String>,
    pub(crate) subcommand: Option<String>,
    pub(crate) unknown: Vec<String>,
}

impl ParseResult {
    /// The effective value of an option (last occurrence for lists).
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.options.get(name).and_then(OptionValue::last)
    }

    /// Every value of an option, in occurrence order.
    pub fn get_all(&self, name: &str) -> Option<&[Value]> {
        self.options.get(name).map(OptionValue::values)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    pub fn is_present(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    /// Options in first-occurrence order.
    pub fn options(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Tokens left over after option and subcommand scanning ended.
    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    /// Canonical name of the matched subcommand, if any.
    pub fn subcommand(&self) -> Option<&str> {
        self.subcommand.as_deref()
    }

    /// Raw unrecognized option tokens collected under
    /// [`UnknownPolicy::Collect`](crate::UnknownPolicy::Collect).
    pub fn unknown(&self) -> &[String] {
        &self.unknown
    }

    pub(crate) fn insert(&mut self, name: &str, value: Value, arity: Arity, all_multi: bool) {
        match self.options.get_mut(name) {
            None => {
                let entry = if arity.repeated() {
                    OptionValue::Many(vec![value])
                } else {
                    OptionValue::Single(value)
                };
                self.options.insert(name.to_string(), entry);
            }
            Some(slot) => {
                if !arity.repeated() && !all_multi {
                    *slot = OptionValue::Single(value);
                } else {
                    match slot {
                        OptionValue::Many(vs) => vs.push(value),
                        OptionValue::Single(old) => {
                            *slot = OptionValue::Many(vec![old.clone(), value]);
                        }
                    }
                }
            }
        }
    }
}

/// Outcome of a successful scan. Help rendering is a tagged variant rather
/// than a process exit so the engine stays callable as a pure function; a
/// top-level driver decides whether to terminate.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Matches(ParseResult),
    Help(String),
}

impl ParseOutcome {
    /// Unwrap the result, yielding `None` for a help request.
    pub fn into_matches(self) -> Option<ParseResult> {
        match self {
            ParseOutcome::Matches(res) => Some(res),
            ParseOutcome::Help(_) => None,
        }
    }
}
