// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test fixture loading.
//!
//! A fixture is a YAML document with a single recognized field: the
//! ordered list of command strings to feed both shells.

use std::path::Path;

use serde::Deserialize;

use crate::error::FixtureError;

/// The ordered command list for one run. Order is execution order.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    pub commands: Vec<String>,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path).map_err(|source| FixtureError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| FixtureError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "fixture_tests.rs"]
mod fixture_tests;
