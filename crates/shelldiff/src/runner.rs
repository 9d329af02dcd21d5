// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Orchestration of one differential run.
//!
//! Owns both sessions, feeds them the fixture's commands in lockstep,
//! compares every pair of execution records, and always finishes with a
//! teardown comparison of the two close reports. A divergent verdict
//! stops the command loop but does not alter the process exit status;
//! only spawn and synchronization failures are fatal.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::compare::compare;
use crate::fixture::Fixture;
use crate::normalize::Tolerance;
use crate::report::Reporter;
use crate::session::{SessionOptions, ShellSession};

/// How to invoke one interpreter and recognize its prompt.
#[derive(Debug, Clone)]
pub struct ShellSpec {
    pub program: String,
    pub args: Vec<String>,
    pub prompt: String,
}

impl ShellSpec {
    /// The invocation as shown in the run header.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// The shell's name token, used for tolerated-equivalence substitution
    /// and as its column label.
    pub fn name(&self) -> String {
        Path::new(&self.program)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.clone())
    }
}

/// Optional memory-diagnostics wrapping for the tested shell. Opaque to
/// the core: its exit status surfaces through the close report like any
/// shell's own.
#[derive(Debug, Clone, Default)]
pub struct ValgrindConfig {
    pub suppressions: Option<PathBuf>,
}

impl ValgrindConfig {
    /// Wrap `spec` under valgrind: fd tracking, full leak checking of all
    /// leak kinds, and a distinguished exit code on the first error.
    pub fn wrap(&self, spec: &ShellSpec) -> ShellSpec {
        let mut args = vec![
            "--quiet".to_string(),
            "--tool=memcheck".to_string(),
            "--track-fds=yes".to_string(),
            "--leak-check=full".to_string(),
            "--show-leak-kinds=all".to_string(),
        ];
        if let Some(path) = &self.suppressions {
            args.push(format!("--suppressions={}", path.display()));
        }
        args.push("--error-exitcode=1".to_string());
        args.push("--exit-on-first-error=yes".to_string());
        args.push(spec.program.clone());
        args.extend(spec.args.iter().cloned());

        ShellSpec {
            program: "valgrind".to_string(),
            args,
            prompt: spec.prompt.clone(),
        }
    }
}

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// The interpreter under test (left column).
    pub tested: ShellSpec,
    /// The reference interpreter (right column).
    pub reference: ShellSpec,
    pub fixture: Fixture,
    pub valgrind: Option<ValgrindConfig>,
    pub session: SessionOptions,
}

/// Drive the full comparison. Returns `Ok` even when divergence was
/// reported; only session failures propagate.
pub async fn run(config: &RunConfig, reporter: &Reporter, out: &mut dyn Write) -> Result<()> {
    reporter.header(
        out,
        &config.tested.command_line(),
        &config.reference.command_line(),
    )?;

    let tested_spec = match &config.valgrind {
        Some(valgrind) => valgrind.wrap(&config.tested),
        None => config.tested.clone(),
    };

    let mut tested = ShellSession::open(
        &tested_spec.program,
        &tested_spec.args,
        &tested_spec.prompt,
        &config.session,
    )
    .await?;
    let mut reference = ShellSession::open(
        &config.reference.program,
        &config.reference.args,
        &config.reference.prompt,
        &config.session,
    )
    .await?;

    let tolerance = Tolerance::new(
        vec![config.tested.name(), config.reference.name()],
        vec![tested.temp_file(), reference.temp_file()],
    );

    reporter.banner(
        out,
        &title_case(&config.tested.name()),
        &title_case(&config.reference.name()),
    )?;

    for command in &config.fixture.commands {
        let left = tested.exec(command).await?;
        let right = reference.exec(command).await?;

        let comparison = compare(&left.text(), &right.text(), &tolerance);
        reporter.comparison(out, &comparison)?;
        if !comparison.success {
            break;
        }
    }

    // Teardown is compared unconditionally, even after an early stop.
    let left = tested.close().await?;
    let right = reference.close().await?;
    let comparison = compare(&left, &right, &tolerance);
    reporter.comparison(out, &comparison)?;

    Ok(())
}

fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod runner_tests;
