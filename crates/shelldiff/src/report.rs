// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Side-by-side comparison table rendering.
//!
//! The reporter is an explicit value handed to the orchestrator rather
//! than process-wide terminal state, so the comparison core stays pure
//! and the table can be rendered into any writer in tests.

use std::io::{self, Write};

use colored::Colorize;

use crate::compare::{Comparison, LineClass};

/// Renders comparison rows, one `|left|right|` row per line pair.
#[derive(Debug, Clone)]
pub struct Reporter {
    use_color: bool,
    width: usize,
}

impl Reporter {
    pub fn new(use_color: bool, width: usize) -> Self {
        Self { use_color, width }
    }

    /// Run header echoing both interpreter invocations.
    pub fn header(&self, w: &mut dyn Write, tested: &str, reference: &str) -> io::Result<()> {
        writeln!(w, "Tested shell command: {tested}")?;
        writeln!(w, "Reference shell command: {reference}")
    }

    /// Column banner with the two session labels.
    pub fn banner(&self, w: &mut dyn Write, left: &str, right: &str) -> io::Result<()> {
        writeln!(w)?;
        let row = self.row(left, right);
        writeln!(w, "{}", self.paint(row, LineClass::Exact))
    }

    /// One table row per aligned line pair, colored by classification.
    pub fn comparison(&self, w: &mut dyn Write, comparison: &Comparison) -> io::Result<()> {
        for pair in &comparison.lines {
            let row = self.row(&pair.left, &pair.right);
            writeln!(w, "{}", self.paint(row, pair.class))?;
        }
        Ok(())
    }

    fn row(&self, left: &str, right: &str) -> String {
        format!(
            "|{left:<width$}|{right:<width$}|",
            width = self.width
        )
    }

    fn paint(&self, row: String, class: LineClass) -> String {
        if !self.use_color {
            return row;
        }
        match class {
            LineClass::Exact => row.green(),
            LineClass::Tolerated => row.magenta(),
            LineClass::Divergent => row.red(),
        }
        .to_string()
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod report_tests;
