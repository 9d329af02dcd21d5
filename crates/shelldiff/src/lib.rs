// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Differential tester for interactive shells.
//!
//! Drives two command interpreters side by side inside pseudo-terminals,
//! feeds them an identical sequence of commands, and checks that their
//! echoed output and exit statuses are equivalent line by line, with a
//! fixed tolerance for implementation-identifying tokens (shell name,
//! private temp-file path).

pub mod compare;
pub mod error;
pub mod fixture;
pub mod normalize;
pub mod prompt;
pub mod pty;
pub mod report;
pub mod runner;
pub mod session;
