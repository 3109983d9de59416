use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn make_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before UNIX_EPOCH")
        .as_nanos();
    let pid = std::process::id();
    let dir = std::env::temp_dir().join(format!("flagmap-integ-{prefix}-{pid}-{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn flagmap() -> Command {
    Command::new(env!("CARGO_BIN_EXE_flagmap"))
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("failed to run flagmap")
}

fn assert_success(out: &Output, what: &str) {
    assert!(
        out.status.success(),
        "{what} failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
}

/// Temp dir holding the example schema written by `flagmap init`.
fn init_dir(prefix: &str) -> PathBuf {
    let dir = make_temp_dir(prefix);
    let out = run(flagmap().arg("init").arg(&dir));
    assert_success(&out, "flagmap init");
    dir
}

#[test]
fn help_works() {
    let out = run(flagmap().arg("--help"));
    assert_success(&out, "flagmap --help");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("flagmap") && stdout.contains("parse") && stdout.contains("usage"),
        "unexpected help output:\n{stdout}"
    );
}

#[test]
fn init_writes_schema_and_refuses_to_overwrite() {
    let dir = init_dir("init");
    let schema = dir.join("flagmap.json");
    assert!(schema.is_file(), "flagmap.json not created");
    let contents = fs::read_to_string(&schema).expect("read schema");
    assert!(contents.contains("--delay"), "unexpected schema:\n{contents}");

    let out = run(flagmap().arg("init").arg(&dir));
    assert!(!out.status.success(), "second init should fail without --force");

    let out = run(flagmap().arg("init").arg("--force").arg(&dir));
    assert_success(&out, "flagmap init --force");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn usage_lists_required_and_optional_blocks() {
    let dir = init_dir("usage");
    let out = run(flagmap().arg("usage").arg("--schema").arg(dir.join("flagmap.json")));
    assert_success(&out, "flagmap usage");
    let stdout = String::from_utf8_lossy(&out.stdout);
    let required = stdout.find("Required args:").expect("required header");
    let optional = stdout.find("Optional args:").expect("optional header");
    let delay = stdout.find("-d/--delay").expect("delay row");
    let iterations = stdout.find("-i/--iterations").expect("iterations row");
    assert!(required < delay && delay < optional && optional < iterations, "{stdout}");
    assert!(stdout.contains("-h/--help"), "{stdout}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn parse_prints_recorded_flags_as_json() {
    let dir = init_dir("parse-json");
    let out = run(flagmap()
        .arg("parse")
        .arg("--json")
        .arg("--schema")
        .arg(dir.join("flagmap.json"))
        .args(["--", "-d", "10ms", "-q"]));
    assert_success(&out, "flagmap parse --json");

    let report: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("parse output is JSON");
    let entries = report.as_array().expect("array");
    assert_eq!(entries[0]["key"], "--delay");
    assert_eq!(entries[0]["raw"], "10ms");
    assert_eq!(entries[1]["key"], "-q");
    assert_eq!(entries[1]["raw"], "");
    assert_eq!(entries[2]["key"], "--iterations");
    assert_eq!(entries[2]["source"], "default");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn parse_fails_on_missing_required_flag() {
    let dir = init_dir("parse-missing");
    let out = run(flagmap()
        .arg("parse")
        .arg("--schema")
        .arg(dir.join("flagmap.json"))
        .args(["--", "-i", "5"]));
    assert!(!out.status.success(), "parse without --delay should fail");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("missing required argument: --delay"),
        "unexpected stderr:\n{stderr}"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn parse_help_flag_prints_usage() {
    let dir = init_dir("parse-help");
    let out = run(flagmap()
        .arg("parse")
        .arg("--schema")
        .arg(dir.join("flagmap.json"))
        .args(["--", "-h"]));
    assert_success(&out, "flagmap parse -- -h");
    assert!(String::from_utf8_lossy(&out.stdout).contains("Required args:"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn get_converts_types_and_applies_defaults() {
    let dir = init_dir("get");
    let schema = dir.join("flagmap.json");

    let out = run(flagmap()
        .arg("get")
        .arg("--schema")
        .arg(&schema)
        .args(["--flag", "-i", "--type", "int", "--", "-d", "1s", "-i", "42"]));
    assert_success(&out, "flagmap get -i");
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "42");

    // registered default when the flag is absent
    let out = run(flagmap()
        .arg("get")
        .arg("--schema")
        .arg(&schema)
        .args(["--flag", "--iterations", "--type", "int", "--", "-d", "1s"]));
    assert_success(&out, "flagmap get --iterations");
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "20");

    let out = run(flagmap()
        .arg("get")
        .arg("--schema")
        .arg(&schema)
        .args(["--flag", "-d", "--type", "int", "--", "-d", "abc"]));
    assert!(!out.status.success(), "non-numeric value should fail");
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid value 'abc'"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn get_bool_accepts_one_and_zero() {
    let dir = make_temp_dir("bool");

    let out = run(flagmap()
        .current_dir(&dir)
        .arg("get")
        .args(["--flag", "-v", "--type", "bool", "--", "-v", "1", "-w", "0"]));
    assert_success(&out, "flagmap get -v");
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "true");

    let out = run(flagmap()
        .current_dir(&dir)
        .arg("get")
        .args(["--flag", "-w", "--type", "bool", "--", "-v", "1", "-w", "0"]));
    assert_success(&out, "flagmap get -w");
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "false");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn get_without_schema_uses_spellings_as_typed() {
    let dir = make_temp_dir("adhoc");
    let tokens = ["--", "-i", "10", "-o", "file.txt", "-q"];

    let out = run(flagmap()
        .current_dir(&dir)
        .arg("get")
        .args(["--flag", "--output", "--flag", "-o"])
        .args(tokens));
    assert_success(&out, "flagmap get -o");
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "file.txt");

    let out = run(flagmap()
        .current_dir(&dir)
        .arg("get")
        .args(["--flag", "--doesnotexist"])
        .args(tokens));
    assert!(!out.status.success(), "unknown flag lookup should fail");
    assert!(String::from_utf8_lossy(&out.stderr).contains("argument not found"));

    let out = run(flagmap()
        .current_dir(&dir)
        .arg("get")
        .args(["--flag", "--doesnotexist", "--lenient"])
        .args(tokens));
    assert_success(&out, "flagmap get --lenient");
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn wide_parse_matches_narrow_parse() {
    let dir = init_dir("wide");
    let schema = dir.join("flagmap.json");
    let tokens = ["--", "-d", "10ms", "--name", "Zoë", "-i", "20"];

    let narrow = run(flagmap().arg("parse").arg("--schema").arg(&schema).args(tokens));
    let wide = run(flagmap()
        .arg("parse")
        .arg("--wide")
        .arg("--schema")
        .arg(&schema)
        .args(tokens));
    assert_success(&narrow, "flagmap parse");
    assert_success(&wide, "flagmap parse --wide");
    assert_eq!(narrow.stdout, wide.stdout);
    assert!(String::from_utf8_lossy(&wide.stdout).contains("--name = Zoë"));

    let _ = fs::remove_dir_all(&dir);
}
