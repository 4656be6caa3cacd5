//! CLI integration tests
//!
//! These tests run the `formrules` binary and verify:
//! - validate: exit codes, scalar, element-wise and joint validation
//! - script: emitted blocks for element files
//! - list: output formats
//! - configuration pickup and errors
//!
//! Every test runs in its own temporary directory so a stray formrules.toml
//! cannot leak between tests.

#[macro_use]
mod common;

use assert_cmd::Command;
use common::write_file;
use predicates::prelude::*;
use tempfile::TempDir;

fn formrules(dir: &TempDir) -> Command {
    let mut cmd = assert_ok!(Command::cargo_bin("formrules"));
    cmd.current_dir(dir.path()).env_remove("FORMRULES_LOG");
    cmd
}

fn temp_dir() -> TempDir {
    assert_ok!(TempDir::new())
}

// validate

#[test]
fn test_validate_passing_value() {
    let dir = temp_dir();
    formrules(&dir)
        .args(["validate", "nonzero", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("passed: nonzero"));
}

#[test]
fn test_validate_failing_value() {
    let dir = temp_dir();
    formrules(&dir)
        .args(["validate", "nonzero", "0"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("failed: nonzero"));
}

#[test]
fn test_validate_several_values_counts() {
    let dir = temp_dir();
    formrules(&dir)
        .args(["validate", "nonzero", "0", "5", "-3"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("2 of 3 values passed"));
}

#[test]
fn test_validate_jsonl() {
    let dir = temp_dir();
    let output = formrules(&dir)
        .args(["validate", "nonzero", "0", "5", "-3", "-o", "jsonl"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let record: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(record["type"], "validation");
    assert_eq!(record["outcome"], 2);
    assert_eq!(record["passed"], false);
}

#[test]
fn test_validate_with_format() {
    let dir = temp_dir();
    formrules(&dir)
        .args(["validate", "minlength", "abc", "--format", "3"])
        .assert()
        .success();
    formrules(&dir)
        .args(["validate", "regex", "abc", "--format", "^[0-9]+$"])
        .assert()
        .code(1);
}

#[test]
fn test_validate_joint_compare() {
    let dir = temp_dir();
    formrules(&dir)
        .args(["validate", "compare", "secret", "secret", "--joint"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 values compared jointly"));
    formrules(&dir)
        .args(["validate", "compare", "10", "3", "--joint", "--format", "lt"])
        .assert()
        .code(1);
}

#[test]
fn test_validate_unknown_rule() {
    let dir = temp_dir();
    formrules(&dir)
        .args(["validate", "zipcode", "12345"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown rule: zipcode"));
}

#[test]
fn test_validate_missing_format() {
    let dir = temp_dir();
    formrules(&dir)
        .args(["validate", "regex", "abc"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error:"));
}

// script

#[test]
fn test_script_single_field() {
    let dir = temp_dir();
    write_file(dir.path(), "email.json", r#"{"name": "email", "kind": "field"}"#);

    formrules(&dir)
        .args([
            "script",
            "--element",
            "email.json",
            "--rule",
            "email",
            "--message",
            "Invalid e-mail",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "  value = frm.elements['email'].value;\n  var regex = /",
        ))
        .stdout(predicate::str::contains("!errFlag['email']"))
        .stdout(predicate::str::contains("'\\n - Invalid e-mail'"));
}

#[test]
fn test_script_repeated_elements_with_howmany() {
    let dir = temp_dir();
    write_file(
        dir.path(),
        "phones.json",
        r#"[{"name": "phone1", "kind": "field"}, {"name": "phone2", "kind": "field"}]"#,
    );

    formrules(&dir)
        .args([
            "script",
            "--element",
            "phones.json",
            "--rule",
            "required",
            "--message",
            "One phone",
            "--howmany",
            "1",
            "--name",
            "phones",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("  value[1] = frm.elements['phone2'].value;\n"))
        .stdout(predicate::str::contains("if (res < 1 && !errFlag['phones'])"));
}

#[test]
fn test_script_group_with_reset() {
    let dir = temp_dir();
    write_file(
        dir.path(),
        "group.json",
        r#"{
            "name": "address",
            "kind": "group",
            "children": [
                {"qualified_name": "address[street]", "element": {"name": "street", "kind": "field"}},
                {"qualified_name": "address[zone]", "element": {"name": "zone", "kind": "select", "multiple": true}}
            ]
        }"#,
    );

    formrules(&dir)
        .args([
            "script",
            "--element",
            "group.json",
            "--rule",
            "required",
            "--message",
            "Address",
            "--group",
            "location",
            "--reset",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "_qfGroups['address'] = {'address[street]': true, 'address[zone][]': true};",
        ))
        .stdout(predicate::str::contains("!errFlag['location']"))
        .stdout(predicate::str::contains("_element.defaultValue"));
}

#[test]
fn test_script_malformed_descriptor() {
    let dir = temp_dir();
    write_file(
        dir.path(),
        "bad.json",
        r#"{"name": "agree", "kind": "checkbox", "multiple": true}"#,
    );

    formrules(&dir)
        .args([
            "script", "--element", "bad.json", "--rule", "required", "--message", "x",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Malformed element descriptor 'agree'"));
}

#[test]
fn test_script_unreadable_element_file() {
    let dir = temp_dir();
    write_file(dir.path(), "broken.json", "{not json");

    formrules(&dir)
        .args([
            "script", "--element", "broken.json", "--rule", "required", "--message", "x",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid element description"));

    formrules(&dir)
        .args([
            "script", "--element", "missing.json", "--rule", "required", "--message", "x",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("I/O error"));
}

// list

#[test]
fn test_list_human() {
    let dir = temp_dir();
    formrules(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rules (13 bound):"))
        .stdout(predicate::str::is_match(r"(?m)^  nonzero\s+regex$").unwrap());
}

#[test]
fn test_list_jsonl() {
    let dir = temp_dir();
    let output = formrules(&dir).args(["list", "-o", "jsonl"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let records: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 14);
    assert_eq!(records[0]["name"], "alphanumeric");
    assert_eq!(records[13]["type"], "summary");
    assert_eq!(records[13]["rules"], 13);
}

// configuration

#[test]
fn test_config_in_working_directory() {
    let dir = temp_dir();
    write_file(
        dir.path(),
        "formrules.toml",
        r#"
[formrules]
version = "1"

[rules]
zipcode = { kind = "regex", pattern = "^[0-9]{5}$" }

[output]
format = "jsonl"
"#,
    );

    formrules(&dir)
        .args(["validate", "zipcode", "12345"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""type":"validation""#));

    // the command line overrides the configured output format
    formrules(&dir)
        .args(["validate", "zipcode", "1234", "-o", "human"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("failed: zipcode"));
}

#[test]
fn test_explicit_config_and_script_identifiers() {
    let dir = temp_dir();
    write_file(
        dir.path(),
        "custom.toml",
        r#"
[formrules]
version = "1"

[script]
form = "signup"

[rules]
username_free = { kind = "callback", function = "checkUsername", object = "Api" }
"#,
    );
    write_file(dir.path(), "user.json", r#"{"name": "user", "kind": "field"}"#);

    formrules(&dir)
        .args([
            "--config",
            "custom.toml",
            "script",
            "--element",
            "user.json",
            "--rule",
            "username_free",
            "--message",
            "Taken",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("signup.elements['user']"))
        .stdout(predicate::str::contains("!Api.checkUsername(value)"));
}

#[test]
fn test_invalid_config_is_an_error() {
    let dir = temp_dir();
    write_file(dir.path(), "formrules.toml", "[formrules]\nversion = \"9\"\n");

    formrules(&dir)
        .arg("list")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unsupported configuration version"));
}

#[test]
fn test_missing_explicit_config() {
    let dir = temp_dir();
    formrules(&dir)
        .args(["--config", "nope.toml", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("I/O error"));
}

#[test]
fn test_debug_logging_goes_to_stderr() {
    let dir = temp_dir();
    formrules(&dir)
        .env("FORMRULES_LOG", "debug")
        .args(["validate", "nonzero", "42", "-o", "jsonl"])
        .assert()
        .success()
        .stderr(predicate::str::contains("resolved rule"))
        .stdout(predicate::str::contains("resolved rule").not());
}
