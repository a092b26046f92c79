// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::PathBuf;

use strum_macros::{Display, EnumString};
use tracing_core::LevelFilter;

use crate::ConsoleWriter;

pub const DEFAULT_TRACING_LOG_FILE_NAME: &str = "console_tracing.log";

/// Fields:
/// - `writers`: Zero or more [`WriterArg`]s. Empty (or only [`WriterArg::None`])
///   disables tracing output.
/// - `level`: The most verbose [`tracing::Level`] that is emitted.
/// - `tracing_log_file_path`: Where [`WriterArg::File`] writes to.
/// - `preferred_display`: Where [`WriterArg::Console`] writes to.
#[derive(Clone, Debug)]
pub struct TracingConfig {
    pub writers: Vec<WriterArg>,
    pub level: tracing::Level,
    pub tracing_log_file_path: PathBuf,
    pub preferred_display: DisplayPreference,
}

impl TracingConfig {
    /// Debug level output to `preferred_display` only.
    #[must_use]
    pub fn new(preferred_display: DisplayPreference) -> Self {
        Self {
            writers: vec![WriterArg::Console],
            level: tracing::Level::DEBUG,
            tracing_log_file_path: PathBuf::from(DEFAULT_TRACING_LOG_FILE_NAME),
            preferred_display,
        }
    }

    #[must_use]
    pub fn with_writers(mut self, writers: Vec<WriterArg>) -> Self {
        self.writers = writers;
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_log_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.tracing_log_file_path = path.into();
        self
    }

    #[must_use]
    pub fn get_level_filter(&self) -> LevelFilter { LevelFilter::from_level(self.level) }
}

/// Used to parse command line arguments (via `clap`), eg: `--tracing console`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum WriterArg {
    /// The [`DisplayPreference`] in the [`TracingConfig`].
    Console,
    File,
    None,
}

/// Where display output goes. Writing to stdout while the console is running will
/// corrupt the screen, use [`DisplayPreference::ConsoleWriter`] instead.
#[derive(Clone, Debug)]
pub enum DisplayPreference {
    Stdout,
    Stderr,
    ConsoleWriter(ConsoleWriter),
}
