//! The parser builder and the scanning engine.

use std::collections::VecDeque;
use std::io::Write;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::UsageError;
use crate::help;
use crate::result::{ParseOutcome, ParseResult};
use crate::spec::{Arity, OptionSpec, parse_long_def, parse_short_defs};
use crate::subcommand::{HELP_SUBCOMMAND, Subcommand};
use crate::value::{Value, coerce};

/// What to do with an option token that matches no registered alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownPolicy {
    /// Fail immediately with a usage error.
    #[default]
    Reject,
    /// Record the raw token in [`ParseResult::unknown`] and keep scanning.
    Collect,
    /// Stop scanning; the token and everything after it become positionals.
    StopParsing,
}

/// A declarative option parser.
///
/// Built once via the chaining methods, then immutable: `parse` takes
/// `&self`, so one configuration can serve concurrent parses.
///
/// ```
/// use argot::{Getopt, ParseOutcome};
///
/// let getopt = Getopt::new()
///     .short("vo:")
///     .long("count,n: {n}=N How many times");
/// let ParseOutcome::Matches(res) = getopt
///     .parse(&["prog", "-v", "--count=3", "file"])
///     .unwrap()
/// else {
///     panic!("no help option configured");
/// };
/// assert!(res.is_present("v"));
/// assert_eq!(res.get_int("count"), Some(3));
/// assert_eq!(res.positionals(), ["file"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Getopt {
    pub(crate) specs: Vec<OptionSpec>,
    pub(crate) aliases: IndexMap<String, usize>,
    pub(crate) subcommands: Vec<Subcommand>,
    has_subcommands: bool,
    pub(crate) help_opt: Option<String>,
    pub(crate) description: Option<String>,
    all_multi: bool,
    unknown: UnknownPolicy,
    min_args: Option<usize>,
    max_args: Option<usize>,
}

impl Getopt {
    pub fn new() -> Self {
        Getopt::default()
    }

    /// Register short options from a getopt-style definition string
    /// (see [`crate::spec`] for the grammar). Panics on a malformed string.
    pub fn short(mut self, defs: &str) -> Self {
        for (ch, arity) in parse_short_defs(defs) {
            let spec = OptionSpec {
                name: ch.to_string(),
                arity,
                type_tag: None,
                help: None,
            };
            let idx = self.push_spec(spec);
            self.aliases.insert(ch.to_string(), idx);
        }
        self
    }

    /// Register one long-option alias group (see [`crate::spec`] for the
    /// grammar). Panics on a malformed definition or when the group's
    /// canonical name was already registered with a different arity.
    pub fn long(mut self, def: &str) -> Self {
        let group = parse_long_def(def);
        let canonical = &group.aliases[0];
        if let Some(existing) = self.specs.iter().find(|s| &s.name == canonical) {
            if existing.arity != group.arity {
                panic!("option {canonical:?} redefined with conflicting argspec");
            }
        }
        let idx = self.push_spec(OptionSpec {
            name: canonical.clone(),
            arity: group.arity,
            type_tag: group.type_tag,
            help: group.help,
        });
        for alias in group.aliases {
            // Last registration wins per alias; earlier specs are untouched.
            self.aliases.insert(alias, idx);
        }
        self
    }

    /// Register several long-option alias groups at once.
    pub fn longs<I, S>(mut self, defs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for def in defs {
            self = self.long(def.as_ref());
        }
        self
    }

    /// Register subcommands from `"alias1,alias2 help"` definition strings.
    pub fn subcommands<I, S>(mut self, defs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.has_subcommands = true;
        for def in defs {
            self.subcommands.push(Subcommand::parse(def.as_ref()));
        }
        self
    }

    /// Set the canonical option name that triggers help output. Also makes
    /// the literal token `help` match a synthetic subcommand when
    /// subcommands are configured.
    pub fn help_opt(mut self, name: impl Into<String>) -> Self {
        self.help_opt = Some(name.into());
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn unknown_policy(mut self, policy: UnknownPolicy) -> Self {
        self.unknown = policy;
        self
    }

    /// Accumulate every repeated occurrence into a list, even for options
    /// not declared repeatable.
    pub fn all_multi(mut self, yes: bool) -> Self {
        self.all_multi = yes;
        self
    }

    pub fn min_args(mut self, n: usize) -> Self {
        self.min_args = Some(n);
        self
    }

    pub fn max_args(mut self, n: usize) -> Self {
        self.max_args = Some(n);
        self
    }

    fn push_spec(&mut self, spec: OptionSpec) -> usize {
        self.specs.push(spec);
        self.specs.len() - 1
    }

    fn alias_index(&self, alias: &str) -> Option<usize> {
        self.aliases.get(alias).copied()
    }

    /// Resolve `token` against the subcommand registry: the canonical alias
    /// on an exact match, `{help}` for the literal `help` token when a help
    /// option is configured, `None` otherwise.
    pub fn find_subcommand(&self, token: &str) -> Option<&str> {
        for sc in &self.subcommands {
            if sc.matches(token) {
                return Some(sc.canonical());
            }
        }
        if self.help_opt.is_some() && token == "help" {
            return Some(HELP_SUBCOMMAND);
        }
        None
    }

    /// Render help text, optionally filtered to a subtype tag.
    pub fn help(&self, subtype: Option<&str>) -> String {
        help::render(self, subtype)
    }

    /// The `Usage:` paragraph of the description, if present, for terse
    /// error reporting.
    pub fn short_usage(&self) -> String {
        let Some(desc) = &self.description else {
            return String::new();
        };
        let Some(pos) = desc.find("Usage: ") else {
            return String::new();
        };
        let s = &desc[pos..];
        match s.find("\n\n") {
            Some(end) => s[..end + 1].to_string(),
            None => format!("{}\n", s.trim_end()),
        }
    }

    fn usage_error(&self, message: String) -> UsageError {
        UsageError::new(message).with_usage(self.short_usage())
    }

    /// Scan `argv` (program name at index 0, never consumed as data).
    ///
    /// Returns [`ParseOutcome::Help`] when the configured help option or the
    /// `help` pseudo-subcommand was given; the caller decides whether to
    /// print it and exit.
    pub fn parse<S: AsRef<str>>(&self, argv: &[S]) -> Result<ParseOutcome, UsageError> {
        let mut queue: VecDeque<String> = argv
            .iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();
        let mut res = ParseResult::default();
        let mut tail: Vec<String> = Vec::new();
        // The spec currently absorbing greedy values, with the display name
        // it was invoked under (for error messages).
        let mut greedy: Option<(usize, String)> = None;

        while let Some(arg) = queue.pop_front() {
            if arg == "--" {
                // Consumed: everything after it is positional.
                break;
            }
            if arg == "-" {
                // Quirk preserved from the original implementation: unlike
                // `--`, the bare `-` terminator itself stays in the tail.
                tail.push(arg);
                break;
            }

            if !arg.starts_with('-') {
                if self.has_subcommands && res.subcommand.is_none() {
                    if let Some(sc) = self.find_subcommand(&arg) {
                        debug!(subcommand = %sc, "matched subcommand");
                        res.subcommand = Some(sc.to_string());
                        greedy = None;
                        continue;
                    }
                }
                match &greedy {
                    Some((idx, display)) => {
                        let spec = &self.specs[*idx];
                        let value = coerce(&arg, spec.type_tag, display)
                            .map_err(|e| e.with_usage(self.short_usage()))?;
                        res.insert(&spec.name, value, spec.arity, self.all_multi);
                        continue;
                    }
                    None => {
                        tail.push(arg);
                        break;
                    }
                }
            }

            if let Some(body) = arg.strip_prefix("--") {
                let (name, eq_value) = match body.split_once('=') {
                    Some((n, v)) => (n, Some(v.to_string())),
                    None => (body, None),
                };
                let Some(idx) = self.alias_index(name) else {
                    match self.unknown {
                        UnknownPolicy::Reject => {
                            return Err(self.usage_error(format!("Unknown option `{arg}`")));
                        }
                        UnknownPolicy::Collect => {
                            res.unknown.push(arg);
                            continue;
                        }
                        UnknownPolicy::StopParsing => {
                            tail.push(arg);
                            break;
                        }
                    }
                };
                let spec = &self.specs[idx];
                let display = format!("--{name}");
                if eq_value.is_some() && spec.arity == Arity::NoArg {
                    return Err(self.usage_error(format!("`{display}` takes no arguments")));
                }
                if eq_value.is_none() && spec.arity.requires_value() && queue.is_empty() {
                    return Err(self.usage_error(format!("Missing argument for `{display}`")));
                }
                let raw = match eq_value {
                    Some(v) => Some(v),
                    None if spec.arity.requires_value() => queue.pop_front(),
                    None => None,
                };
                self.record(&mut res, idx, &display, raw, &mut greedy)?;
                continue;
            }

            // Short option. `arg` starts with `-` followed by at least one
            // more character.
            let letter = arg[1..].chars().next().unwrap_or(' ');
            if !letter.is_ascii_alphanumeric() {
                tail.push(arg);
                break;
            }
            let display = format!("-{letter}");
            let Some(idx) = self.alias_index(&letter.to_string()) else {
                match self.unknown {
                    UnknownPolicy::Reject => {
                        return Err(self.usage_error(format!("Unknown option `{arg}`")));
                    }
                    UnknownPolicy::Collect => {
                        res.unknown.push(arg);
                        continue;
                    }
                    UnknownPolicy::StopParsing => {
                        tail.push(arg);
                        break;
                    }
                }
            };
            let spec = &self.specs[idx];
            let rest = &arg[2..];
            if rest.is_empty() && spec.arity.requires_value() && queue.is_empty() {
                return Err(self.usage_error(format!("Missing argument for `{display}`")));
            }
            let raw = if spec.arity == Arity::NoArg
                || (spec.arity == Arity::Optional && rest.is_empty())
            {
                None
            } else if let Some(attached) = rest.strip_prefix('=') {
                Some(attached.to_string())
            } else if !rest.is_empty() {
                Some(rest.to_string())
            } else {
                queue.pop_front()
            };
            if spec.arity == Arity::NoArg && !rest.is_empty() {
                // Bundled flags: re-queue the remainder as a fresh short
                // token so `-abc` behaves like `-a -b -c`.
                queue.push_front(format!("-{rest}"));
            }
            self.record(&mut res, idx, &display, raw, &mut greedy)?;
        }

        tail.extend(queue.drain(..));

        if let Some(help_opt) = &self.help_opt {
            if res.options.contains_key(help_opt)
                || res.subcommand.as_deref() == Some(HELP_SUBCOMMAND)
            {
                debug!("help requested");
                let subtype = res.get(help_opt).and_then(Value::as_str).map(str::to_string);
                return Ok(ParseOutcome::Help(self.help(subtype.as_deref())));
            }
        }

        res.positionals = tail;
        if let Some(max) = self.max_args {
            if res.positionals.len() > max {
                return Err(self.usage_error("Too many arguments".into()));
            }
        }
        if let Some(min) = self.min_args {
            if res.positionals.len() < min {
                return Err(self.usage_error("Too few arguments".into()));
            }
        }
        Ok(ParseOutcome::Matches(res))
    }

    fn record(
        &self,
        res: &mut ParseResult,
        idx: usize,
        display: &str,
        raw: Option<String>,
        greedy: &mut Option<(usize, String)>,
    ) -> Result<(), UsageError> {
        let spec = &self.specs[idx];
        let value = match raw {
            Some(raw) => coerce(&raw, spec.type_tag, display)
                .map_err(|e| e.with_usage(self.short_usage()))?,
            None => Value::Flag,
        };
        // The `display` local can't be referenced inside `trace!`: the macro
        // expands `use tracing::field::display;`, which shadows it.
        let option_display = display;
        trace!(option = %option_display, canonical = %spec.name, "recorded option");
        res.insert(&spec.name, value, spec.arity, self.all_multi);
        *greedy = if spec.arity == Arity::RepeatedGreedy {
            Some((idx, display.to_string()))
        } else {
            None
        };
        Ok(())
    }

    /// One-shot convenience: build a parser from definition strings and
    /// parse immediately.
    pub fn rest<S, T>(argv: &[S], short: &str, longs: &[T]) -> Result<ParseResult, UsageError>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut getopt = Getopt::new().short(short);
        for def in longs {
            getopt = getopt.long(def.as_ref());
        }
        match getopt.parse(argv)? {
            ParseOutcome::Matches(res) => Ok(res),
            // No help option was configured above.
            ParseOutcome::Help(_) => unreachable!("help option is not configured"),
        }
    }

    /// The canonical top-level driver: print help to stdout and exit 0, or
    /// print the error (plus short usage) to stderr and exit with its
    /// status. Use [`Getopt::parse`] directly to keep control of the
    /// process.
    pub fn parse_or_exit<S: AsRef<str>>(&self, argv: &[S]) -> ParseResult {
        match self.parse(argv) {
            Ok(ParseOutcome::Matches(res)) => res,
            Ok(ParseOutcome::Help(text)) => {
                print!("{text}");
                let _ = std::io::stdout().flush();
                std::process::exit(0);
            }
            Err(err) => {
                eprintln!("{err}");
                if let Some(usage) = err.usage() {
                    eprint!("{usage}");
                }
                std::process::exit(err.exit_status());
            }
        }
    }
}
