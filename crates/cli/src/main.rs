//! Harness binary: build a parser from option-definition strings given on
//! the command line, parse the target argument vector after `--`, and print
//! the result as JSON. Useful for probing definition grammars and engine
//! behavior without writing a program around the library.
//!
//! ```text
//! argot --short 'vo:' --long 'jobs,j: {n}=N Worker count' -- -v --jobs=4 file
//! ```

use anyhow::Result;
use argot::{Getopt, OptionValue, ParseOutcome, ParseResult, UnknownPolicy, Value};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

fn driver() -> Getopt {
    Getopt::new()
        .description(
            "argot -- parse an argument vector against declarative option definitions\n\
             \n\
             Usage: argot [OPTIONS] -- ARG...\n\
             \n\
             Declares a parser from --short/--long/--subcommand definition strings,\n\
             parses ARG... with it, and prints the result as JSON.\n",
        )
        .long("short,s: =SPEC Short option definitions (e.g. `vo:n[]+`)")
        .long("long,l[] =SPEC Long option definition (repeatable)")
        .long("subcommand,c[] =SPEC Subcommand definition (repeatable)")
        .long("help-opt: =NAME Canonical option that triggers help output")
        .long("min: {n}=N Minimum number of positional arguments")
        .long("max: {n}=N Maximum number of positional arguments")
        .long("all-multi Collect every repeated option into a list")
        .long("collect-unknown Collect unrecognized options instead of failing")
        .long("stop-unknown Stop scanning at the first unrecognized option")
        .long("help,h")
        .help_opt("help")
}

fn build_target(opts: &ParseResult) -> Getopt {
    let mut getopt = Getopt::new();
    if let Some(defs) = opts.get_str("short") {
        getopt = getopt.short(defs);
    }
    for def in opts.get_all("long").unwrap_or(&[]) {
        if let Some(def) = def.as_str() {
            getopt = getopt.long(def);
        }
    }
    let subcommands: Vec<&str> = opts
        .get_all("subcommand")
        .unwrap_or(&[])
        .iter()
        .filter_map(Value::as_str)
        .collect();
    if !subcommands.is_empty() {
        getopt = getopt.subcommands(subcommands);
    }
    if let Some(name) = opts.get_str("help-opt") {
        getopt = getopt.help_opt(name);
    }
    if let Some(n) = opts.get_int("min") {
        getopt = getopt.min_args(n as usize);
    }
    if let Some(n) = opts.get_int("max") {
        getopt = getopt.max_args(n as usize);
    }
    if opts.is_present("all-multi") {
        getopt = getopt.all_multi(true);
    }
    if opts.is_present("collect-unknown") {
        getopt = getopt.unknown_policy(UnknownPolicy::Collect);
    } else if opts.is_present("stop-unknown") {
        getopt = getopt.unknown_policy(UnknownPolicy::StopParsing);
    }
    getopt
}

fn value_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Flag => serde_json::Value::Bool(true),
        Value::Str(s) => serde_json::Value::from(s.as_str()),
        Value::Int(i) => serde_json::Value::from(*i),
        Value::Float(f) => serde_json::Value::from(*f),
    }
}

fn result_json(res: &ParseResult) -> serde_json::Value {
    let mut obj = serde_json::Map::new();
    let mut options = serde_json::Map::new();
    for (name, value) in res.options() {
        let v = match value {
            OptionValue::Single(v) => value_json(v),
            OptionValue::Many(vs) => {
                serde_json::Value::Array(vs.iter().map(value_json).collect())
            }
        };
        options.insert(name.to_string(), v);
    }
    obj.insert("options".into(), serde_json::Value::Object(options));
    if let Some(sc) = res.subcommand() {
        obj.insert("subcommand".into(), serde_json::Value::from(sc));
    }
    obj.insert(
        "positionals".into(),
        serde_json::Value::Array(
            res.positionals()
                .iter()
                .map(|p| serde_json::Value::from(p.as_str()))
                .collect(),
        ),
    );
    if !res.unknown().is_empty() {
        obj.insert(
            "unknown".into(),
            serde_json::Value::Array(
                res.unknown()
                    .iter()
                    .map(|u| serde_json::Value::from(u.as_str()))
                    .collect(),
            ),
        );
    }
    serde_json::Value::Object(obj)
}

fn run(opts: &ParseResult) -> Result<i32> {
    let target = build_target(opts);

    // Rebuild an argument vector with a program-name slot at index 0.
    let mut argv: Vec<String> = vec!["argot".to_string()];
    argv.extend(opts.positionals().iter().cloned());
    debug!(tokens = argv.len() - 1, "parsing target argument vector");

    match target.parse(&argv) {
        Ok(ParseOutcome::Matches(res)) => {
            println!("{}", serde_json::to_string_pretty(&result_json(&res))?);
            Ok(0)
        }
        Ok(ParseOutcome::Help(text)) => {
            print!("{text}");
            Ok(0)
        }
        Err(err) => {
            eprintln!("{err}");
            if let Some(usage) = err.usage() {
                eprint!("{usage}");
            }
            Ok(err.exit_status())
        }
    }
}

fn main() {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let argv: Vec<String> = std::env::args().collect();
    let opts = driver().parse_or_exit(&argv);
    match run(&opts) {
        Ok(status) => std::process::exit(status),
        Err(err) => {
            eprintln!("argot: {err:#}");
            std::process::exit(1);
        }
    }
}
