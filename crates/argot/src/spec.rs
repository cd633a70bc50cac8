//! Option definitions and the compact definition grammars.
//!
//! Short options are declared getopt-style, one character per option with an
//! optional arity suffix (`a`, `b:`, `c::`, `d[]`, `e[]+`). Long options are
//! declared one alias group per string:
//!
//! ```text
//! "name,n,other-name[SUFFIX] {TYPE}=ARGNAME help text"
//! ```
//!
//! where `SUFFIX` is one of `:` (required argument), `::` (optional
//! argument), `[]` (required, repeatable), `[]+` (required, repeatable, and
//! greedy: one occurrence keeps absorbing following bare tokens), `{TYPE}`
//! is a [`TypeTag`] code and `=ARGNAME` names the argument in help output.
//! All aliases of a group share one spec; the first alias is the canonical
//! name used as the result key.

use crate::value::TypeTag;

/// How many values an option accepts and how repetition is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Bare flag, no argument.
    NoArg,
    /// Exactly one mandatory argument.
    Required,
    /// At most one argument, attached with `=` only.
    Optional,
    /// Mandatory argument, option may be repeated (`-n a -n b`).
    RepeatedSingle,
    /// Mandatory argument, repeated, and a single occurrence consumes
    /// following bare tokens (`-n a b c`).
    RepeatedGreedy,
}

impl Arity {
    pub fn takes_value(self) -> bool {
        self != Arity::NoArg
    }

    /// Whether a value must be found for every occurrence.
    pub fn requires_value(self) -> bool {
        matches!(
            self,
            Arity::Required | Arity::RepeatedSingle | Arity::RepeatedGreedy
        )
    }

    pub fn repeated(self) -> bool {
        matches!(self, Arity::RepeatedSingle | Arity::RepeatedGreedy)
    }
}

/// One canonical option: result key, arity, argument type, and help text.
///
/// Aliases are not stored here; the registry maps every alias to a shared
/// spec so they cannot drift out of agreement on arity.
#[derive(Debug, Clone)]
pub struct OptionSpec {
    pub(crate) name: String,
    pub(crate) arity: Arity,
    pub(crate) type_tag: Option<TypeTag>,
    pub(crate) help: Option<String>,
}

impl OptionSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn type_tag(&self) -> Option<TypeTag> {
        self.type_tag
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }
}

/// Parse a short-option definition string into `(letter, arity)` pairs.
///
/// Panics on any character that is not an alphanumeric option letter or a
/// recognized arity suffix.
pub(crate) fn parse_short_defs(defs: &str) -> Vec<(char, Arity)> {
    let b = defs.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < b.len() {
        let c = b[i] as char;
        if !c.is_ascii_alphanumeric() {
            panic!("malformed short option definition {defs:?} at {c:?}");
        }
        i += 1;
        let mut arity = Arity::NoArg;
        if b.get(i) == Some(&b':') {
            i += 1;
            arity = Arity::Required;
            if b.get(i) == Some(&b':') {
                i += 1;
                arity = Arity::Optional;
            }
        } else if b.get(i) == Some(&b'[') && b.get(i + 1) == Some(&b']') {
            if b.get(i + 2) == Some(&b'+') {
                i += 3;
                arity = Arity::RepeatedGreedy;
            } else {
                i += 2;
                arity = Arity::RepeatedSingle;
            }
        }
        out.push((c, arity));
    }
    out
}

/// One parsed long-option alias group.
#[derive(Debug, Clone)]
pub(crate) struct LongGroup {
    pub aliases: Vec<String>,
    pub arity: Arity,
    pub type_tag: Option<TypeTag>,
    pub help: Option<String>,
}

/// Parse one long-option definition string.
///
/// Panics on conflicting arity suffixes within the group, an unknown type
/// code, or a no-argument option that claims a type or `=ARGNAME`.
pub(crate) fn parse_long_def(def: &str) -> LongGroup {
    let (names_part, mut help) = match def.find(' ') {
        Some(sp) => (&def[..sp], Some(def[sp + 1..].to_string())),
        None => (def, None),
    };

    let mut type_tag = None;
    if let Some(h) = &help {
        if let Some(body) = h.strip_prefix('{') {
            if let Some(rbr) = body.find('}') {
                let code = &body[..rbr];
                type_tag = Some(TypeTag::from_code(code).unwrap_or_else(|| {
                    panic!("bad option type {code:?} in definition {def:?}")
                }));
                help = Some(body[rbr + 1..].trim_start().to_string());
            }
        }
    }

    let mut aliases = Vec::new();
    let mut group_arity = None;
    for seg in names_part.split(',') {
        let (name, arity) = split_arity_suffix(seg);
        if name.is_empty() {
            panic!("empty option name in definition {def:?}");
        }
        match group_arity {
            None => group_arity = Some(arity),
            Some(a) if a != arity => {
                panic!("option {name:?} has conflicting argspec in {def:?}")
            }
            Some(_) => {}
        }
        aliases.push(name.to_string());
    }
    let arity = group_arity.unwrap_or(Arity::NoArg);

    if arity == Arity::NoArg
        && (type_tag.is_some() || help.as_deref().is_some_and(|h| h.starts_with('=')))
    {
        panic!("option {:?} should take an argument", aliases[0]);
    }

    LongGroup {
        aliases,
        arity,
        type_tag,
        help,
    }
}

fn split_arity_suffix(seg: &str) -> (&str, Arity) {
    if seg.len() > 3 && seg.ends_with("[]+") {
        (&seg[..seg.len() - 3], Arity::RepeatedGreedy)
    } else if seg.len() > 2 && seg.ends_with("[]") {
        (&seg[..seg.len() - 2], Arity::RepeatedSingle)
    } else if seg.len() > 2 && seg.ends_with("::") {
        (&seg[..seg.len() - 2], Arity::Optional)
    } else if seg.len() > 1 && seg.ends_with(':') {
        (&seg[..seg.len() - 1], Arity::Required)
    } else {
        (seg, Arity::NoArg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_defs_cover_every_arity() {
        let defs = parse_short_defs("ab:c::d[]e[]+");
        assert_eq!(
            defs,
            vec![
                ('a', Arity::NoArg),
                ('b', Arity::Required),
                ('c', Arity::Optional),
                ('d', Arity::RepeatedSingle),
                ('e', Arity::RepeatedGreedy),
            ]
        );
    }

    #[test]
    #[should_panic(expected = "malformed short option definition")]
    fn short_defs_reject_stray_characters() {
        parse_short_defs("a[x");
    }

    #[test]
    fn long_def_parses_aliases_type_and_help() {
        let g = parse_long_def("count,n: {n}=N Number of items");
        assert_eq!(g.aliases, vec!["count", "n"]);
        assert_eq!(g.arity, Arity::Required);
        assert_eq!(g.type_tag, Some(TypeTag::NonNegInt));
        assert_eq!(g.help.as_deref(), Some("=N Number of items"));
    }

    #[test]
    fn long_def_without_suffix_or_help() {
        let g = parse_long_def("verbose,V");
        assert_eq!(g.aliases, vec!["verbose", "V"]);
        assert_eq!(g.arity, Arity::NoArg);
        assert_eq!(g.type_tag, None);
        assert_eq!(g.help, None);
    }

    #[test]
    fn long_def_greedy_and_optional_suffixes() {
        assert_eq!(parse_long_def("input[]+ files").arity, Arity::RepeatedGreedy);
        assert_eq!(parse_long_def("color:: mode").arity, Arity::Optional);
        assert_eq!(parse_long_def("tag[] labels").arity, Arity::RepeatedSingle);
    }

    #[test]
    #[should_panic(expected = "conflicting argspec")]
    fn long_def_rejects_conflicting_arity() {
        parse_long_def("output:,o Output file");
    }

    #[test]
    #[should_panic(expected = "bad option type")]
    fn long_def_rejects_unknown_type_code() {
        parse_long_def("count: {x}=N Number");
    }

    #[test]
    #[should_panic(expected = "should take an argument")]
    fn long_def_rejects_argname_on_flag() {
        parse_long_def("quiet =LEVEL Be quiet");
    }
}
