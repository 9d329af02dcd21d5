// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Integration tests for shelldiff.
//!
//! These tests spawn real interpreters in PTYs and verify end-to-end
//! behavior. A tiny `sh`-based REPL with a fixed `fake> ` prompt stands
//! in for the shells under test, so every box the suite runs on behaves
//! the same.

use std::io::Write;
use std::time::Duration;

use shelldiff::compare::{compare, LineClass};
use shelldiff::error::SessionError;
use shelldiff::normalize::Tolerance;
use shelldiff::session::{SessionOptions, ShellSession};

/// A deterministic prompt-driven REPL built on sh.
const FAKE_REPL: &str =
    r#"printf 'fake> '; while IFS= read -r line; do eval "$line"; printf 'fake> '; done"#;

const FAKE_PROMPT: &str = "fake> ";

fn options() -> SessionOptions {
    SessionOptions {
        timeout: Duration::from_secs(10),
        ..SessionOptions::default()
    }
}

async fn open_fake_repl() -> ShellSession {
    ShellSession::open(
        "sh",
        &["-c".to_string(), FAKE_REPL.to_string()],
        FAKE_PROMPT,
        &options(),
    )
    .await
    .expect("fake repl should spawn and prompt")
}

fn tolerance_for(left: &ShellSession, right: &ShellSession) -> Tolerance {
    Tolerance::new(
        vec!["sh".to_string()],
        vec![left.temp_file(), right.temp_file()],
    )
}

// =============================================================================
// Session driving
// =============================================================================

#[tokio::test]
async fn echo_record_captures_display_body_and_status() {
    let mut session = open_fake_repl().await;
    let record = session.exec("echo hello").await.unwrap();

    assert_eq!(record.display, "echo hello");
    let text = record.text();
    let lines: Vec<&str> = text.trim().lines().collect();
    assert_eq!(
        lines,
        vec!["shelldiff>> echo hello", "hello", "shelldiff>> echo $?", "0"]
    );

    session.close().await.unwrap();
}

#[tokio::test]
async fn long_command_record_is_truncated() {
    let mut session = open_fake_repl().await;
    let command = format!("echo {}", "a".repeat(50));
    let record = session.exec(&command).await.unwrap();

    assert_eq!(record.display.chars().count(), 43);
    assert!(record.display.ends_with("..."));
    assert_eq!(record.display, format!("{}...", &command[..40]));

    session.close().await.unwrap();
}

#[tokio::test]
async fn close_reports_the_child_exit_status() {
    let session = open_fake_repl().await;
    let report = session.close().await.unwrap();

    assert!(report.contains("EXIT REPORT:"));
    assert!(report.contains("Exit status: 0"));
}

#[tokio::test]
async fn tmpfile_is_exported_and_removed_after_close() {
    let mut session = open_fake_repl().await;
    let temp_file = session.temp_file();
    assert!(std::path::Path::new(&temp_file).exists());

    let record = session.exec("echo $TMPFILE").await.unwrap();
    assert!(record.body.contains(&temp_file));

    session.close().await.unwrap();
    assert!(!std::path::Path::new(&temp_file).exists());
}

#[tokio::test]
async fn open_times_out_when_prompt_never_appears() {
    let opts = SessionOptions {
        timeout: Duration::from_secs(1),
        ..SessionOptions::default()
    };
    let err = ShellSession::open("cat", &[], "never> ", &opts)
        .await
        .err()
        .expect("cat never prompts");
    assert!(matches!(err, SessionError::SyncTimeout { .. }));
}

#[tokio::test]
async fn missing_program_is_a_spawn_error() {
    let err = ShellSession::open("no-such-shell-anywhere", &[], "$ ", &options())
        .await
        .err()
        .expect("program does not exist");
    assert!(matches!(err, SessionError::Spawn { .. }));
}

// =============================================================================
// Differential properties
// =============================================================================

#[tokio::test]
async fn same_interpreter_on_both_sides_always_matches() {
    let mut left = open_fake_repl().await;
    let mut right = open_fake_repl().await;
    let tolerance = tolerance_for(&left, &right);

    for command in ["echo hello", "echo a b c", "true", "pwd"] {
        let l = left.exec(command).await.unwrap();
        let r = right.exec(command).await.unwrap();
        let cmp = compare(&l.text(), &r.text(), &tolerance);
        assert!(cmp.success, "`{command}` should compare clean");
    }

    let l = left.close().await.unwrap();
    let r = right.close().await.unwrap();
    assert!(compare(&l, &r, &tolerance).success);
}

#[tokio::test]
async fn private_temp_paths_compare_as_tolerated() {
    let mut left = open_fake_repl().await;
    let mut right = open_fake_repl().await;
    let tolerance = tolerance_for(&left, &right);

    let l = left.exec("echo $TMPFILE").await.unwrap();
    let r = right.exec("echo $TMPFILE").await.unwrap();
    let cmp = compare(&l.text(), &r.text(), &tolerance);

    assert!(cmp.success);
    assert!(cmp.lines.iter().any(|p| p.class == LineClass::Tolerated));

    left.close().await.unwrap();
    right.close().await.unwrap();
}

#[tokio::test]
async fn genuinely_different_output_diverges() {
    let mut left = open_fake_repl().await;
    let mut right = open_fake_repl().await;
    let tolerance = tolerance_for(&left, &right);

    // $$ expands to each side's own pid
    let l = left.exec("echo $$").await.unwrap();
    let r = right.exec("echo $$").await.unwrap();
    let cmp = compare(&l.text(), &r.text(), &tolerance);

    assert!(!cmp.success);
    assert!(cmp.lines.iter().any(|p| p.class == LineClass::Divergent));

    // Teardown still works and still compares clean after a divergence.
    let l = left.close().await.unwrap();
    let r = right.close().await.unwrap();
    assert!(compare(&l, &r, &tolerance).success);
}

// =============================================================================
// Binary end-to-end
// =============================================================================

fn run_binary(fixture: &str) -> std::process::Output {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(fixture.as_bytes()).unwrap();

    std::process::Command::new(env!("CARGO_BIN_EXE_shelldiff"))
        .arg("--shell")
        .arg("sh")
        .arg("--shell-arg=-c")
        .arg(format!("--shell-arg={FAKE_REPL}"))
        .arg("--shell-prompt")
        .arg(FAKE_PROMPT)
        .arg("--reference")
        .arg("sh")
        .arg("--reference-arg=-c")
        .arg(format!("--reference-arg={FAKE_REPL}"))
        .arg("--reference-prompt")
        .arg(FAKE_PROMPT)
        .arg("--tests")
        .arg(file.path())
        .arg("--timeout")
        .arg("10")
        .arg("--no-color")
        .output()
        .expect("failed to run shelldiff")
}

#[test]
fn matching_run_renders_the_table_and_exits_zero() {
    let output = run_binary("commands:\n  - echo hello\n  - echo world\n");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Tested shell command: sh"));
    assert!(stdout.contains("|Sh"), "banner row expected");
    assert!(stdout.contains("hello"));
    assert!(stdout.contains("EXIT REPORT:"));
}

#[test]
fn divergent_run_stops_early_but_still_exits_zero() {
    let output = run_binary("commands:\n  - echo $$\n  - echo never-reached\n");

    // Divergence is observational: it stops the loop, not the process.
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("never-reached"));
    // The teardown comparison still ran.
    assert!(stdout.contains("EXIT REPORT:"));
}

#[test]
fn unparseable_fixture_is_fatal() {
    let output = run_binary("commands: []\nunexpected: field\n");
    assert_ne!(output.status.code(), Some(0));
}
