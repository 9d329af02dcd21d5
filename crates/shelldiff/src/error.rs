// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for PTY sessions and fixture loading.
//!
//! Spawn and synchronization failures are fatal to the whole run; a
//! content divergence between the two shells is data, not an error,
//! and never surfaces here.

use std::time::Duration;

use thiserror::Error;

/// Fatal session failures.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The child process could not be started at all.
    #[error("failed to spawn `{program}`: {reason}")]
    Spawn { program: String, reason: String },

    /// An expected pattern never showed up in the output stream.
    #[error("timed out after {timeout:?} waiting for {pattern}")]
    SyncTimeout { pattern: String, timeout: Duration },

    /// The stream ended while a pattern was still expected.
    #[error("session ended before {pattern} appeared")]
    Eof { pattern: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failures loading the command fixture.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture `{path}`: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid fixture `{path}`: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
}
