//! Help text rendering.
//!
//! Output order: description, `Subcommands:` block, then one row per
//! canonical option under `Options:` (or `<subtype> options:` when a
//! subtype filter is active). Help strings starting with `!` are hidden
//! unless the filter names their subtype; a lone `!` hides a row from every
//! rendering.

use indexmap::IndexMap;

use crate::getopt::Getopt;
use crate::spec::Arity;

// Option column width; rows wider than this push their help text onto a
// continuation line.
const MARGIN: usize = 26;

fn help_line(opt: &str, help: &str) -> String {
    if help.is_empty() {
        format!("{opt}\n")
    } else if opt.len() <= MARGIN - 2 {
        format!("{opt}{}{help}\n", " ".repeat(MARGIN - opt.len()))
    } else {
        format!("{opt}\n{}{help}\n", " ".repeat(MARGIN))
    }
}

struct Row {
    short: Option<String>,
    long: Option<String>,
    placeholder: String,
    help: Option<String>,
}

pub(crate) fn render(getopt: &Getopt, subtype: Option<&str>) -> String {
    let mut out = String::new();

    if let Some(desc) = &getopt.description {
        out.push_str(desc);
        if desc.ends_with('\n') {
            out.push('\n');
        } else {
            out.push_str("\n\n");
        }
    }

    if !getopt.subcommands.is_empty() {
        out.push_str("Subcommands:\n");
        for sc in &getopt.subcommands {
            out.push_str(&help_line(&format!("  {}", sc.canonical()), sc.help()));
        }
        out.push('\n');
    }

    // One row per canonical option, in alias registration order; only the
    // first short and first long alias are shown.
    let mut rows: IndexMap<&str, Row> = IndexMap::new();
    for (alias, &idx) in &getopt.aliases {
        let spec = &getopt.specs[idx];
        let row = rows.entry(spec.name.as_str()).or_insert_with(|| {
            let (placeholder, help) = placeholder_and_help(getopt, spec);
            Row {
                short: None,
                long: None,
                placeholder,
                help,
            }
        });
        if alias.chars().count() == 1 {
            if row.short.is_none() {
                row.short = Some(format!("-{alias}"));
            }
        } else if row.long.is_none() {
            row.long = Some(format!("--{alias}"));
        }
    }

    if !rows.is_empty() {
        match subtype {
            Some(st) => out.push_str(&format!("{st} options:\n")),
            None => out.push_str("Options:\n"),
        }
        for row in rows.values() {
            let mut help = row.help.clone().unwrap_or_default();
            if help == "!" {
                continue;
            }
            match subtype {
                Some(st) => {
                    let Some(tagged) = help.strip_prefix('!') else {
                        // Untagged rows belong to the unfiltered rendering.
                        continue;
                    };
                    let Some(scoped) = tagged.strip_prefix(st) else {
                        continue;
                    };
                    if !scoped.is_empty() && !scoped.starts_with(' ') {
                        continue;
                    }
                    help = scoped.trim_start().to_string();
                }
                None => {
                    if help.starts_with('!') {
                        continue;
                    }
                }
            }
            let left = match (&row.short, &row.long) {
                (Some(s), Some(l)) => format!("  {s}, {l}{}", row.placeholder),
                (short, long) => {
                    let alias = short.as_deref().or(long.as_deref()).unwrap_or("");
                    format!("  {alias}{}", row.placeholder)
                }
            };
            out.push_str(&help_line(&left, &help));
        }
        out.push('\n');
    }

    out
}

// Extract the `=ARGNAME` display prefix from the help string and build the
// arity-dependent placeholder.
fn placeholder_and_help(getopt: &Getopt, spec: &crate::spec::OptionSpec) -> (String, Option<String>) {
    let mut help = spec.help.clone();
    let mut argname = String::from("ARG");
    if let Some(h) = &help {
        if let Some(body) = h.strip_prefix('=') {
            if body.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
                let end = body.find(char::is_whitespace).unwrap_or(body.len());
                argname = body[..end].to_string();
                help = Some(body[end..].trim_start().to_string());
            }
        }
    }
    let placeholder = match spec.arity {
        Arity::Required | Arity::RepeatedSingle => format!(" {argname}"),
        Arity::RepeatedGreedy => format!(" {argname}..."),
        Arity::Optional => format!("[={argname}]"),
        Arity::NoArg => String::new(),
    };
    if help.is_none() && getopt.help_opt.as_deref() == Some(spec.name.as_str()) {
        help = Some("Print this message".into());
    }
    (placeholder, help)
}

#[cfg(test)]
mod tests {
    use crate::Getopt;

    fn sample() -> Getopt {
        Getopt::new()
            .description("Run things.\n\nUsage: prog [OPTIONS] [SUBCOMMAND]")
            .subcommands(["build,b Compile the project", "run,r Run the project"])
            .short("v")
            .long("output,o: =FILE Write output to FILE")
            .long("jobs: {n}=N Use N worker threads")
            .long("color:: =WHEN Colorize output")
            .long("input[]+ =FILE Input files")
            .long("internal-flag !")
            .long("trace: !build Trace the build")
            .long("help,h")
            .help_opt("help")
    }

    fn row(left: &str, help: &str) -> String {
        format!("{left}{}{help}\n", " ".repeat(26 - left.len()))
    }

    #[test]
    fn renders_description_subcommands_and_options() {
        let text = sample().help(None);
        assert!(text.starts_with("Run things.\n\nUsage: prog [OPTIONS] [SUBCOMMAND]\n\n"));
        assert!(text.contains("Subcommands:\n"));
        assert!(text.contains(&row("  build", "Compile the project")));
        assert!(text.contains(&row("  run", "Run the project")));
        assert!(text.contains("Options:\n"));
        assert!(text.contains(&row("  -o, --output FILE", "Write output to FILE")));
        assert!(text.contains(&row("  --jobs N", "Use N worker threads")));
        assert!(text.contains(&row("  --color[=WHEN]", "Colorize output")));
        assert!(text.contains(&row("  --input FILE...", "Input files")));
    }

    #[test]
    fn joins_short_and_long_aliases() {
        let text = sample().help(None);
        assert!(text.contains(&row("  -h, --help", "Print this message")));
        // `-v` has no long alias and no help text.
        assert!(text.contains("  -v\n"));
    }

    #[test]
    fn hides_bang_prefixed_rows_without_subtype() {
        let text = sample().help(None);
        assert!(!text.contains("internal-flag"));
        assert!(!text.contains("--trace"));
    }

    #[test]
    fn subtype_filter_shows_only_matching_rows() {
        let text = sample().help(Some("build"));
        assert!(text.contains("build options:\n"));
        assert!(text.contains(&row("  --trace ARG", "Trace the build")));
        assert!(!text.contains("--output"));
        assert!(!text.contains("internal-flag"));
    }

    #[test]
    fn subtype_filter_requires_full_tag_match() {
        // `!build` must not leak into a `bui` rendering.
        let text = sample().help(Some("bui"));
        assert!(!text.contains("--trace"));
    }

    #[test]
    fn long_option_column_overflows_to_continuation_line() {
        let getopt = Getopt::new().long("extremely-long-option-name: =VALUE Does a thing");
        let text = getopt.help(None);
        let expected = format!(
            "  --extremely-long-option-name VALUE\n{}Does a thing\n",
            " ".repeat(26)
        );
        assert!(text.contains(&expected));
    }
}
