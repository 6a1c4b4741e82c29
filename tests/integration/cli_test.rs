use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

const ACRONYM: &str = r#"{
    "alphabet": [
        { "name": "upper", "ranges": [["A", "Z"]] },
        { "name": "lower", "ranges": [["a", "z"]] },
        { "name": "space", "ranges": [[" ", " "]] }
    ],
    "source": {
        "states": 3, "initial": 0, "finals": [1],
        "transitions": [[0, "upper", 1], [1, "lower", 1], [1, "space", 2], [2, "upper", 1]]
    },
    "target": {
        "states": 2, "finals": [1],
        "transitions": [[0, "upper", 1], [1, "upper", 1]]
    },
    "examples": [{ "input": "Principles Of Programming Languages", "output": "POPL" }]
}"#;

/// "a" into "bb": two edits, more than a budget of one allows
const OVER_BUDGET: &str = r#"{
    "alphabet": [
        { "name": "a", "ranges": [["a", "a"]] },
        { "name": "b", "ranges": [["b", "b"]] }
    ],
    "source": { "states": 2, "finals": [1], "transitions": [[0, "a", 1]] },
    "target": { "states": 3, "finals": [2], "transitions": [[0, "b", 1], [1, "b", 2]] }
}"#;

fn problem_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write problem file");
    file
}

fn run(args: &[&str], problem: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_transynth"))
        .args(args)
        .arg(problem)
        .output()
        .expect("Failed to execute transynth")
}

#[test]
fn test_validate_reports_counts() {
    let file = problem_file(ACRONYM);
    let output = run(&["validate"], file.path());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains(": ok"));
    assert!(stdout.contains("minterms: 3"));
    assert!(stdout.contains("examples: 1"));
}

#[test]
fn test_synth_applies_result() {
    let file = problem_file(ACRONYM);
    let output = run(&["synth", "--apply", "Hello World"], file.path());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Transducer found at states=1, output_bound=1"));
    assert!(stdout.contains(r#""Hello World" -> "HW""#));
    assert!(stdout.contains("Attempts: 1"));
}

#[test]
fn test_synth_not_found_exit_code() {
    let file = problem_file(OVER_BUDGET);
    let output = run(
        &["synth", "--mode", "bounded", "--budget", "1", "--max-states", "1"],
        file.path(),
    );
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout.contains("No transducer found"));
}

#[test]
fn test_malformed_problem_file() {
    let file = problem_file("{ \"alphabet\": [] ");
    let output = run(&["validate"], file.path());
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("Error: problem file error"));
}

#[test]
fn test_unknown_minterm_is_rejected() {
    let file = problem_file(&OVER_BUDGET.replace(r#"[0, "a", 1]"#, r#"[0, "c", 1]"#));
    let output = run(&["validate"], file.path());
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("unknown minterm 'c'"));
}

#[test]
fn test_synth_resource_limit_is_inconclusive() {
    let file = problem_file(ACRONYM);
    let output = run(&["synth", "--rlimit", "1"], file.path());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout.contains("Inconclusive at states=1, output_bound=1"));
}
