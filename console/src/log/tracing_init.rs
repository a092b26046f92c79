// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::IntoDiagnostic;
use tracing_subscriber::{Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{DynLayer, TracingConfig, WriterConfig};

/// Install a global subscriber built from `tracing_config`. Does nothing if no writer
/// was asked for.
///
/// # Errors
///
/// Returns an error if the file layer can't be created, or a global subscriber has
/// already been installed.
pub fn init(tracing_config: TracingConfig) -> miette::Result<()> {
    let Some(layers) = try_create_layers(&tracing_config)? else {
        return Ok(());
    };
    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .into_diagnostic()
}

/// Build the layers without installing them, so callers can add their own. Returns
/// `None` if no writer was asked for.
///
/// # Errors
///
/// Returns an error if the file layer can't be created.
pub fn try_create_layers(
    tracing_config: &TracingConfig,
) -> miette::Result<Option<Vec<Box<DynLayer<Registry>>>>> {
    let Some(writer_config) = WriterConfig::from_writer_args(&tracing_config.writers)
    else {
        return Ok(None);
    };

    let level_filter = tracing_config.get_level_filter();

    let mut layers: Vec<Box<DynLayer<Registry>>> = vec![];

    // Applies to every layer, including ones the caller adds later.
    layers.push(Box::new(level_filter));

    if let Some(layer) = writer_config
        .create_display_layer(level_filter, tracing_config.preferred_display.clone())
    {
        layers.push(layer);
    }

    if let Some(layer) = writer_config
        .try_create_file_layer(level_filter, &tracing_config.tracing_log_file_path)?
    {
        layers.push(layer);
    }

    Ok(Some(layers))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tracing_subscriber::layer::SubscriberExt;

    use super::*;
    use crate::{ConsoleWriter, DisplayPreference, MessageQueue, WriterArg};

    #[test]
    fn test_no_writers_no_layers() {
        let config = TracingConfig::new(DisplayPreference::Stderr)
            .with_writers(vec![WriterArg::None]);
        assert!(try_create_layers(&config).unwrap().is_none());
    }

    #[test]
    fn test_display_and_file_layers() {
        let dir = tempfile::tempdir().unwrap();
        let config = TracingConfig::new(DisplayPreference::Stderr)
            .with_writers(vec![WriterArg::Console, WriterArg::File])
            .with_log_file_path(dir.path().join("tracing.log"));

        let layers = try_create_layers(&config).unwrap().unwrap();

        // Level filter, display, file.
        assert_eq!(layers.len(), 3);
    }

    #[test]
    fn test_console_writer_receives_events() {
        let queue = MessageQueue::new();
        let config = TracingConfig::new(DisplayPreference::ConsoleWriter(
            ConsoleWriter::new(queue.clone()),
        ));
        let layers = try_create_layers(&config).unwrap().unwrap();
        let subscriber = tracing_subscriber::registry().with(layers);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("hello from tracing");
            tracing::trace!("too verbose");
        });

        let records = queue.drain_all();
        assert_eq!(records.len(), 1);
        assert!(records[0].body().contains("hello from tracing"));
    }
}
