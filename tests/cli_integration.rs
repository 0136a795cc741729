//! CLI integration tests for mockforge.
//!
//! These tests run the binary end to end. None of them need a Go toolchain:
//! source mode parses files directly and program-only mode never builds.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

const SHAPES: &str = r#"package shapes

import (
	"context"
	"net/http"
)

// Drawer draws.
type Drawer interface {
	Draw(ctx context.Context, names []string) error
	Serve(req *http.Request, opts ...string) (int, error)
}

type Sizer interface {
	Size() int
}
"#;

/// Get the mockforge binary command, isolated from any user configuration.
fn mockforge(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mockforge").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("MOCKFORGE_GO");
    cmd
}

/// Create a temporary project containing `shapes.go`.
fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("shapes.go"), SHAPES).unwrap();
    tmp
}

// ============================================================================
// source mode
// ============================================================================

#[test]
fn test_source_mode_writes_mock_into_output_dir() {
    let tmp = project();

    mockforge(tmp.path())
        .args(["generate", "shapes.go", "-d", "mocks"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Generated"));

    let mock = fs::read_to_string(tmp.path().join("mocks/mock_shapes_test.go")).unwrap();
    assert!(mock.starts_with("// Code generated by mockforge. DO NOT EDIT."));
    assert!(mock.contains("// Source: shapes.go"));
    assert!(mock.contains("package mock_shapes"));
    assert!(mock.contains("type MockDrawer struct"));
    assert!(mock.contains("type MockSizer struct"));
    assert!(mock.contains("func (m *MockDrawer) Serve(_a0 *http.Request, _a1 ...string) (int, error) {"));
    assert!(!tmp.path().join("mocks/matchers").exists());
}

#[test]
fn test_output_override_and_naming_flags() {
    let tmp = project();

    mockforge(tmp.path())
        .args([
            "generate",
            "shapes.go",
            "-o",
            "deep/nested/fakes.go",
            "--package",
            "fakes",
        ])
        .current_dir(tmp.path())
        .assert()
        .success();

    let mock = fs::read_to_string(tmp.path().join("deep/nested/fakes.go")).unwrap();
    assert!(mock.contains("package fakes\n"));
}

#[test]
fn test_matchers_with_skip_list() {
    let tmp = project();

    mockforge(tmp.path())
        .args([
            "generate",
            "shapes.go",
            "-d",
            "out",
            "-m",
            "--skip-matchers",
            "String, ContextContext",
        ])
        .current_dir(tmp.path())
        .assert()
        .success();

    let matchers = tmp.path().join("out/matchers");
    assert!(matchers.join("SliceOfString.go").is_file());
    assert!(matchers.join("PtrToHttpRequest.go").is_file());
    assert!(!matchers.join("String.go").exists());
    assert!(!matchers.join("ContextContext.go").exists());

    let matcher = fs::read_to_string(matchers.join("SliceOfString.go")).unwrap();
    assert!(matcher.contains("package matchers"));
    assert!(matcher.contains("type SliceOfString func([]string) bool"));
}

#[test]
fn test_project_config_enables_matchers() {
    let tmp = project();
    fs::create_dir_all(tmp.path().join(".mockforge")).unwrap();
    fs::write(
        tmp.path().join(".mockforge/config.toml"),
        "[matchers]\ngenerate = true\ndestination = \"m\"\nskip = \"String\"\n",
    )
    .unwrap();

    mockforge(tmp.path())
        .args(["generate", "shapes.go"])
        .current_dir(tmp.path())
        .assert()
        .success();

    assert!(tmp.path().join("mock_shapes_test.go").is_file());
    assert!(tmp.path().join("m/SliceOfString.go").is_file());
    assert!(!tmp.path().join("m/String.go").exists());
}

#[test]
fn test_debug_parser_prints_model() {
    let tmp = project();

    mockforge(tmp.path())
        .args(["generate", "shapes.go", "--debug-parser"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("interface Drawer"));
}

#[test]
fn test_missing_source_file_fails() {
    let tmp = project();

    mockforge(tmp.path())
        .args(["generate", "nope.go"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: loading input failed"));
}

// ============================================================================
// package mode
// ============================================================================

#[test]
fn test_package_mode_needs_two_arguments() {
    let tmp = project();

    for args in [
        vec!["generate"],
        vec!["generate", "example.com/shapes"],
        vec!["generate", "example.com/shapes", "Drawer", "Sizer"],
    ] {
        mockforge(tmp.path())
            .args(&args)
            .current_dir(tmp.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("expected exactly two arguments"));
    }

    // Nothing was written for any of them.
    let entries: Vec<_> = fs::read_dir(tmp.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_usage_error_reported_before_config_is_read() {
    let tmp = project();
    fs::create_dir_all(tmp.path().join(".mockforge")).unwrap();
    fs::write(tmp.path().join(".mockforge/config.toml"), "[output
broken").unwrap();

    for command in ["generate", "model"] {
        mockforge(tmp.path())
            .args([command, "example.com/shapes"])
            .current_dir(tmp.path())
            .assert()
            .failure()
            .stderr(
                predicate::str::contains("expected exactly two arguments")
                    .and(predicate::str::contains("Failed to load config").not()),
            );
    }
}

#[test]
fn test_prog_only_prints_program() {
    let tmp = project();

    mockforge(tmp.path())
        .args([
            "generate",
            "example.com/shapes",
            "Drawer,Sizer",
            "--prog-only",
        ])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("package main")
                .and(predicate::str::contains("pkg_ \"example.com/shapes\""))
                .and(predicate::str::contains("(*pkg_.Sizer)(nil)")),
        );

    assert!(!tmp.path().join("mock_shapes_test.go").exists());
}

#[test]
fn test_prog_only_to_output_file() {
    let tmp = project();

    mockforge(tmp.path())
        .args([
            "generate",
            "example.com/shapes",
            "Drawer",
            "--prog-only",
            "-o",
            "gen/prog.go",
        ])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let program = fs::read_to_string(tmp.path().join("gen/prog.go")).unwrap();
    assert!(program.contains("\"Drawer\""));
}

#[test]
fn test_prog_only_rejects_invalid_symbol() {
    let tmp = project();

    mockforge(tmp.path())
        .args([
            "generate",
            "example.com/shapes",
            "Drawer)(nil)",
            "--prog-only",
        ])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid reflection request"));
}

// ============================================================================
// mockforge model
// ============================================================================

#[test]
fn test_model_prints_source_file() {
    let tmp = project();

    mockforge(tmp.path())
        .args(["model", "shapes.go"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(
            predicate::str::starts_with("package shapes\n")
                .and(predicate::str::contains("interface Sizer"))
                .and(predicate::str::contains("- method Serve")),
        );

    assert!(!tmp.path().join("mock_shapes_test.go").exists());
}
