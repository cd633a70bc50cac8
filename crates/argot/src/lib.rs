//! Declarative getopt-style option parsing.
//!
//! A caller registers short options, long options, and subcommands with
//! compact definition strings, then parses one argument vector into a
//! [`ParseResult`]. The engine supports POSIX short-option bundling
//! (`-abc`), GNU long options with `=value`, optional/required/repeated/
//! greedy arities, typed value coercion, exact-match subcommand dispatch,
//! and help rendering with subtype filtering.
//!
//! Parsing never exits the process: help is surfaced as
//! [`ParseOutcome::Help`] and malformed input as [`UsageError`], so the
//! engine stays callable as a pure function. [`Getopt::parse_or_exit`] is
//! the conventional top-level driver for binaries.

mod error;
mod getopt;
mod help;
mod result;
mod spec;
mod subcommand;
mod value;

pub use error::{UsageError, default_exit_status, set_default_exit_status};
pub use getopt::{Getopt, UnknownPolicy};
pub use result::{OptionValue, ParseOutcome, ParseResult};
pub use spec::{Arity, OptionSpec};
pub use subcommand::Subcommand;
pub use value::{TypeTag, Value, coerce};
