//! Subcommand descriptors.
//!
//! A subcommand is declared as `"alias1,alias2 help text"`: comma-separated
//! aliases up to the first space, free-text help after it. Matching is exact
//! string equality only; no abbreviation or prefix matching.

/// Name of the synthetic pseudo-subcommand that the literal token `help`
/// resolves to when a help option is configured.
pub(crate) const HELP_SUBCOMMAND: &str = "{help}";

#[derive(Debug, Clone)]
pub struct Subcommand {
    aliases: Vec<String>,
    help: String,
}

impl Subcommand {
    pub(crate) fn parse(def: &str) -> Self {
        let (names, help) = match def.find(' ') {
            Some(sp) => (&def[..sp], def[sp + 1..].trim_start()),
            None => (def, ""),
        };
        Subcommand {
            aliases: names.split(',').map(str::to_string).collect(),
            help: help.to_string(),
        }
    }

    /// The first alias, used as the recorded subcommand name whichever alias
    /// matched.
    pub fn canonical(&self) -> &str {
        self.aliases.first().map_or("", |s| s.as_str())
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub(crate) fn matches(&self, token: &str) -> bool {
        self.aliases.iter().any(|a| a == token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases_and_help() {
        let sc = Subcommand::parse("build,b Compile the project");
        assert_eq!(sc.aliases(), ["build", "b"]);
        assert_eq!(sc.canonical(), "build");
        assert_eq!(sc.help(), "Compile the project");
    }

    #[test]
    fn help_defaults_to_empty() {
        let sc = Subcommand::parse("run");
        assert_eq!(sc.canonical(), "run");
        assert_eq!(sc.help(), "");
    }

    #[test]
    fn matching_is_exact_only() {
        let sc = Subcommand::parse("build,b Compile");
        assert!(sc.matches("build"));
        assert!(sc.matches("b"));
        assert!(!sc.matches("bui"));
        assert!(!sc.matches("BUILD"));
    }
}
