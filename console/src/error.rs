// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io;

use thiserror::Error;

/// Errors surfaced by the console's public API. Line editing edge cases are never
/// errors, and faults in optional side effects (like the persistent log) are logged
/// and swallowed, so what remains here is terminal I/O and task lifecycle.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// An internal I/O error occurred while talking to the terminal.
    #[error(transparent)]
    IO(#[from] io::Error),

    /// The keyboard event stream ended, so no further keys can be read.
    #[error("terminal input stream closed")]
    InputClosed,

    /// One of the console loops panicked or was cancelled before it could finish.
    #[error("console task did not complete: {0}")]
    TaskJoin(String),
}

impl From<tokio::task::JoinError> for ConsoleError {
    fn from(error: tokio::task::JoinError) -> Self { ConsoleError::TaskJoin(error.to_string()) }
}
