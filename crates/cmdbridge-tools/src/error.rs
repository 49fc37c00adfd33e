// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::path::PathBuf;

use thiserror::Error;

/// Failures of the process runner.  Tools turn these into
/// [`ToolOutput::err`](crate::ToolOutput::err) text.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("working directory '{}' does not exist", .0.display())]
    WorkdirMissing(PathBuf),

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("timed out after {0} seconds")]
    Timeout(u64),

    #[error("failed to prepare script file: {0}")]
    Script(#[from] std::io::Error),
}
