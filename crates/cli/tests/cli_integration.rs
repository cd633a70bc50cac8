use std::process::Command;

fn argot() -> Command {
    Command::new(env!("CARGO_BIN_EXE_argot"))
}

#[test]
fn help_works() {
    let out = argot()
        .arg("--help")
        .output()
        .expect("failed to run argot --help");
    assert!(
        out.status.success(),
        "argot --help failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("Usage: argot") && stdout.contains("Options:"),
        "unexpected help output:\n{stdout}"
    );
}

#[test]
fn parses_target_vector_to_json() {
    let out = argot()
        .args([
            "--short",
            "vo:",
            "--long",
            "jobs,j: {n}=N Worker count",
            "--",
            "-v",
            "--jobs=007",
            "-o",
            "out.txt",
            "x",
            "y",
        ])
        .output()
        .expect("failed to run argot");
    assert!(
        out.status.success(),
        "argot failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
    let json: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("stdout is not valid JSON");
    assert_eq!(json["options"]["v"], serde_json::json!(true));
    assert_eq!(json["options"]["jobs"], serde_json::json!(7));
    assert_eq!(json["options"]["o"], serde_json::json!("out.txt"));
    assert_eq!(json["positionals"], serde_json::json!(["x", "y"]));
}

#[test]
fn subcommand_and_collected_unknowns_appear_in_json() {
    let out = argot()
        .args([
            "--subcommand",
            "build,b Compile the project",
            "--collect-unknown",
            "--",
            "b",
            "--nope",
        ])
        .output()
        .expect("failed to run argot");
    assert!(out.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("stdout is not valid JSON");
    assert_eq!(json["subcommand"], serde_json::json!("build"));
    assert_eq!(json["unknown"], serde_json::json!(["--nope"]));
}

#[test]
fn usage_error_exits_nonzero_with_message() {
    let out = argot()
        .args(["--short", "a", "--", "-z"])
        .output()
        .expect("failed to run argot");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("Unknown option `-z`"),
        "unexpected stderr:\n{stderr}"
    );
}

#[test]
fn target_help_opt_renders_help_and_exits_zero() {
    let out = argot()
        .args([
            "--long",
            "help,h Show this help",
            "--help-opt",
            "help",
            "--",
            "--help",
        ])
        .output()
        .expect("failed to run argot");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("-h, --help") && stdout.contains("Show this help"),
        "unexpected help output:\n{stdout}"
    );
}
