// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fs::OpenOptions,
          io::{self, Write},
          path::{Path, PathBuf},
          sync::atomic::{AtomicBool, Ordering}};

use crate::OutputRecord;

/// Appends every rendered record to a plain text file when enabled. The file is opened
/// per write, so it can be rotated or deleted while the console runs.
#[derive(Debug)]
pub struct PersistentLog {
    path: PathBuf,
    enabled: AtomicBool,
}

impl PersistentLog {
    pub fn new(path: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            path: path.into(),
            enabled: AtomicBool::new(enabled),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path { &self.path }

    #[must_use]
    pub fn is_enabled(&self) -> bool { self.enabled.load(Ordering::Acquire) }

    pub fn set_enabled(&self, enabled: bool) { self.enabled.store(enabled, Ordering::Release); }

    /// # Errors
    ///
    /// Returns an error if the file can't be opened or written.
    pub fn try_append(&self, record: &OutputRecord) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", record.to_log_line())
    }

    /// Append `record` if logging is enabled. Failures are reported through `tracing` and
    /// otherwise ignored, the console keeps running.
    pub fn append(&self, record: &OutputRecord) {
        if !self.is_enabled() {
            return;
        }
        if let Err(error) = self.try_append(record) {
            tracing::warn!(
                message = "Failed to append to console log file",
                path = %self.path.display(),
                error = %error
            );
        }
    }
}
