// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::Path;

use tracing_core::LevelFilter;
use tracing_subscriber::{Layer, registry::LookupSpan};

use crate::{DisplayPreference, WriterArg, rolling_file_appender_impl};

pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

/// Avoid gnarly type annotations by using a macro to create the `fmt` layer. Color is
/// left to the console renderer, so no ANSI escapes are emitted here.
macro_rules! create_fmt {
    () => {
        tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(false)
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriterConfig {
    Display,
    File,
    DisplayAndFile,
}

impl WriterConfig {
    /// `None` means no writer was asked for, so there is nothing to set up.
    #[must_use]
    pub fn from_writer_args(writers: &[WriterArg]) -> Option<Self> {
        let contains_file_writer = writers.contains(&WriterArg::File);
        let contains_display_writer = writers.contains(&WriterArg::Console);
        match (contains_display_writer, contains_file_writer) {
            (true, true) => Some(WriterConfig::DisplayAndFile),
            (true, false) => Some(WriterConfig::Display),
            (false, true) => Some(WriterConfig::File),
            (false, false) => None,
        }
    }

    /// Type erased display layer, or `None` if this config has no display writer.
    #[must_use]
    pub fn create_display_layer<S>(
        self,
        level_filter: LevelFilter,
        preferred_display: DisplayPreference,
    ) -> Option<Box<DynLayer<S>>>
    where
        S: tracing_core::Subscriber,
        for<'a> S: LookupSpan<'a>,
    {
        if self == WriterConfig::File {
            return None;
        }

        let fmt_layer = create_fmt!();

        let layer: Box<DynLayer<S>> = match preferred_display {
            DisplayPreference::Stdout => Box::new(
                fmt_layer
                    .with_writer(std::io::stdout)
                    .with_filter(level_filter),
            ),
            DisplayPreference::Stderr => Box::new(
                fmt_layer
                    .with_writer(std::io::stderr)
                    .with_filter(level_filter),
            ),
            DisplayPreference::ConsoleWriter(console_writer) => Box::new(
                fmt_layer
                    .with_writer(move || console_writer.clone())
                    .with_filter(level_filter),
            ),
        };
        Some(layer)
    }

    /// Type erased file layer, or `None` if this config has no file writer.
    ///
    /// # Errors
    ///
    /// Returns an error if `tracing_log_file_path` has no file name.
    pub fn try_create_file_layer<S>(
        self,
        level_filter: LevelFilter,
        tracing_log_file_path: &Path,
    ) -> miette::Result<Option<Box<DynLayer<S>>>>
    where
        S: tracing_core::Subscriber,
        for<'a> S: LookupSpan<'a>,
    {
        if self == WriterConfig::Display {
            return Ok(None);
        }

        let file = rolling_file_appender_impl::try_create(tracing_log_file_path)?;
        Ok(Some(Box::new(
            create_fmt!().with_writer(file).with_filter(level_filter),
        )))
    }
}
