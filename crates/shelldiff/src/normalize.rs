// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic text transforms applied before line comparison.
//!
//! Everything here is pure: tab expansion at conventional 8-column
//! stops, the 40-character command display truncation, and the
//! identifier substitution that lets two shells differ in their
//! self-identifying tokens without registering as divergent.

/// Conventional terminal tab stops.
pub const TAB_STOP: usize = 8;

/// Commands longer than this are truncated in the recorded display text.
pub const DISPLAY_LIMIT: usize = 40;

/// Canonical stand-in for either shell's name token.
pub const NAME_PLACEHOLDER: &str = "shelldiff";

/// Canonical stand-in for either session's private temp-file path.
pub const PATH_PLACEHOLDER: &str = "/tmp/shelldiff";

/// Expand tabs to the next multiple-of-8 column. Idempotent: an
/// already-expanded line contains no tabs.
pub fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut col = 0usize;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = TAB_STOP - col % TAB_STOP;
            for _ in 0..pad {
                out.push(' ');
            }
            col += pad;
        } else {
            out.push(ch);
            col += 1;
        }
    }
    out
}

/// The command text as it enters the execution record: at most
/// [`DISPLAY_LIMIT`] characters, with an ellipsis marker when truncated.
/// The truncated form is what gets compared, not only what gets shown.
pub fn display_text(command: &str) -> String {
    if command.chars().count() > DISPLAY_LIMIT {
        let head: String = command.chars().take(DISPLAY_LIMIT).collect();
        format!("{head}...")
    } else {
        command.to_string()
    }
}

/// Split a captured text into tab-expanded lines, dropping the leading
/// and trailing blank area of the capture as a whole.
pub fn lines(text: &str) -> Vec<String> {
    text.trim().lines().map(expand_tabs).collect()
}

/// Known implementation-identifying tokens to neutralize before the
/// tolerant comparison: both shells' name tokens and both sessions'
/// private temp-file paths.
#[derive(Debug, Clone)]
pub struct Tolerance {
    names: Vec<String>,
    paths: Vec<String>,
}

impl Tolerance {
    pub fn new(names: Vec<String>, paths: Vec<String>) -> Self {
        Self { names, paths }
    }

    /// Replace every known token with its canonical placeholder.
    /// Symmetric (the same transform runs on both sides) and idempotent
    /// (the placeholders contain no replaceable token).
    pub fn substitute(&self, line: &str) -> String {
        let mut out = line.to_string();
        // Paths first: a temp path may embed a shell name token.
        for path in &self.paths {
            out = out.replace(path.as_str(), PATH_PLACEHOLDER);
        }
        for name in &self.names {
            out = out.replace(name.as_str(), NAME_PLACEHOLDER);
        }
        out
    }
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod normalize_tests;
