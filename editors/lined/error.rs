//
// Copyright (c) 2024 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Error types for the lined editor.

use std::io;

/// Errors reported by commands. None of them are fatal to the session.
#[derive(thiserror::Error, Debug)]
pub enum EdError {
    /// Malformed command line
    #[error("invalid command: {0}")]
    Parse(String),
    /// Address resolves outside the buffer
    #[error("address out of range")]
    AddressOutOfRange,
    /// Verb with no registered handler
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    /// No filename given and no default filename set
    #[error("no filename specified")]
    NoFilename,
    /// Search with no pattern given and none remembered
    #[error("no expression specified")]
    NoPattern,
    #[error("invalid expression: {0}")]
    InvalidPattern(String),
    #[error("no match")]
    NoMatch,
    /// `!` with nothing to run
    #[error("no command specified")]
    NoCommand,
    /// Shell command exited with a nonzero status
    #[error("command exited with status {0}")]
    ShellStatus(i32),
    #[error("highlighting failed: {0}")]
    Highlight(String),
    #[error("{0}")]
    Io(#[from] io::Error),
}

impl From<regex::Error> for EdError {
    fn from(e: regex::Error) -> Self {
        EdError::InvalidPattern(e.to_string())
    }
}

/// Result type for editor operations.
pub type EdResult<T> = Result<T, EdError>;
