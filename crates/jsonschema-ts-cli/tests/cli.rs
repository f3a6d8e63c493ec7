//! End-to-end tests for the `jsonschema-ts` binary.

use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

fn jsonschema_ts(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("jsonschema-ts").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

fn write_schema(dir: &Path) {
    std::fs::write(
        dir.join("person.json"),
        r#"{
            "title": "Person",
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "kind": { "enum": ["a", "b"], "tsEnumNames": ["A", "B"] }
            },
            "required": ["name"],
            "additionalProperties": false
        }"#,
    )
    .unwrap();
}

fn stdout(cmd: &mut Command) -> String {
    let output = cmd.output().expect("failed to execute jsonschema-ts");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

#[test]
fn test_compile_to_stdout() {
    let dir = TempDir::new().unwrap();
    write_schema(dir.path());

    let output = stdout(jsonschema_ts(dir.path()).arg("person.json"));
    insta::assert_snapshot!(output, @r#"
    export const enum Kind {
      A = "a",
      B = "b"
    }
    export interface Person {
      name: string;
      kind?: Kind;
    }
    "#);
}

#[test]
fn test_flags_override_config() {
    let dir = TempDir::new().unwrap();
    write_schema(dir.path());
    std::fs::write(
        dir.path().join("jsonschema-ts.toml"),
        "[settings]\nend_property_with_semicolon = false\n",
    )
    .unwrap();

    let output = stdout(
        jsonschema_ts(dir.path())
            .arg("--no-const-enums")
            .arg("person.json"),
    );
    assert!(output.contains("export enum Kind {"));
    assert!(output.contains("  name: string\n"));
}

#[test]
fn test_write_to_file() {
    let dir = TempDir::new().unwrap();
    write_schema(dir.path());

    jsonschema_ts(dir.path())
        .args(["person.json", "-o", "out/types.d.ts"])
        .assert()
        .success()
        .stdout("");

    let written = std::fs::read_to_string(dir.path().join("out/types.d.ts")).unwrap();
    assert!(written.starts_with("export const enum Kind {"));
    assert!(written.ends_with("}\n"));
}

#[test]
fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();

    let output = jsonschema_ts(dir.path())
        .arg("nope.json")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope.json"));
}

#[test]
fn test_requires_input() {
    let dir = TempDir::new().unwrap();
    jsonschema_ts(dir.path()).assert().failure();
}
