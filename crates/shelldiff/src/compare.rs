// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Line-wise equivalence checking of two captured outputs.
//!
//! Both captures are normalized, split into lines, and padded to the
//! same length; a shorter response is not automatically a failure,
//! trailing absent lines simply compare against emptiness. Each aligned
//! pair is classified three ways and only divergence fails the verdict.

use crate::normalize::{self, Tolerance};

/// Classification of one aligned line pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Byte-identical.
    Exact,
    /// Identical after identifier substitution on both sides.
    Tolerated,
    /// A genuine behavioral difference.
    Divergent,
}

/// One aligned line pair with its classification.
#[derive(Debug, Clone)]
pub struct LinePair {
    pub left: String,
    pub right: String,
    pub class: LineClass,
}

/// Full result of comparing two captures.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub lines: Vec<LinePair>,
    pub success: bool,
}

/// Compare two captured texts line by line.
pub fn compare(left: &str, right: &str, tolerance: &Tolerance) -> Comparison {
    let mut left_lines = normalize::lines(left);
    let mut right_lines = normalize::lines(right);

    let len = left_lines.len().max(right_lines.len());
    left_lines.resize(len, String::new());
    right_lines.resize(len, String::new());

    let mut lines = Vec::with_capacity(len);
    let mut success = true;

    for (l, r) in left_lines.into_iter().zip(right_lines) {
        let class = classify(&l, &r, tolerance);
        if class == LineClass::Divergent {
            success = false;
        }
        lines.push(LinePair {
            left: l,
            right: r,
            class,
        });
    }

    Comparison { lines, success }
}

fn classify(left: &str, right: &str, tolerance: &Tolerance) -> LineClass {
    if left == right {
        LineClass::Exact
    } else if tolerance.substitute(left) == tolerance.substitute(right) {
        LineClass::Tolerated
    } else {
        LineClass::Divergent
    }
}

#[cfg(test)]
#[path = "compare_tests.rs"]
mod compare_tests;
