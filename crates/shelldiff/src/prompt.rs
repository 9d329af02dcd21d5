// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Prompt patterns for synchronizing against a live byte stream.
//!
//! A matcher wraps a literal prompt string (or the line-feed echo
//! delimiter) into a byte regex that can be re-tested against the
//! session's accumulated output buffer after every read.

use regex::bytes::Regex;

/// A compiled pattern plus a human-readable description for errors.
#[derive(Debug, Clone)]
pub struct PromptMatcher {
    pattern: Regex,
    display: String,
}

impl PromptMatcher {
    /// Match a prompt string literally, whatever characters it contains.
    pub fn literal(prompt: &str) -> Self {
        let pattern = Regex::new(&regex::escape(prompt)).expect("escaped literal always compiles");
        Self {
            pattern,
            display: format!("prompt `{prompt}`"),
        }
    }

    /// Match the echoed line terminator that confirms the child consumed
    /// an input line.
    pub fn line_feed() -> Self {
        Self {
            pattern: Regex::new("\n").expect("static pattern always compiles"),
            display: "echoed line terminator".to_string(),
        }
    }

    /// First match in `haystack`, as a `(start, end)` byte range.
    pub fn find(&self, haystack: &[u8]) -> Option<(usize, usize)> {
        self.pattern.find(haystack).map(|m| (m.start(), m.end()))
    }

    /// Description used in timeout/EOF error messages.
    pub fn describe(&self) -> &str {
        &self.display
    }
}
