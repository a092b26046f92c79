// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{path::PathBuf, time::Duration};

use crate::{DEFAULT_LOG_FILE_NAME, DEFAULT_PROMPT, OUTPUT_POLL_INTERVAL};

pub const DEFAULT_WINDOW_TITLE: &str = "Console";
pub const DEFAULT_EXIT_MESSAGE: &str = "Console finished.";

/// Settings for a [`crate::Coordinator`]. Start from [`ConsoleConfig::default`] and
/// override with the `with_*` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Terminal window title, set on start.
    pub title: String,
    pub prompt: String,
    pub poll_interval: Duration,
    pub log_file_path: PathBuf,
    /// Whether rendered records are appended to `log_file_path`. Can be toggled later
    /// through [`crate::ConsoleHandle::set_logging`].
    pub log_enabled: bool,
    /// Printed on its own line during shutdown. Empty prints nothing.
    pub exit_message: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_WINDOW_TITLE.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            poll_interval: OUTPUT_POLL_INTERVAL,
            log_file_path: PathBuf::from(DEFAULT_LOG_FILE_NAME),
            log_enabled: false,
            exit_message: DEFAULT_EXIT_MESSAGE.to_string(),
        }
    }
}

impl ConsoleConfig {
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    #[must_use]
    pub fn with_log_file(mut self, path: impl Into<PathBuf>, enabled: bool) -> Self {
        self.log_file_path = path.into();
        self.log_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_exit_message(mut self, exit_message: impl Into<String>) -> Self {
        self.exit_message = exit_message.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.prompt, " > ");
        assert_eq!(config.poll_interval, Duration::from_millis(5));
        assert_eq!(config.log_file_path, PathBuf::from("LogFile.txt"));
        assert!(!config.log_enabled);
    }

    #[test]
    fn test_builder() {
        let config = ConsoleConfig::default()
            .with_title("Bot")
            .with_log_file("/tmp/bot.log", true)
            .with_exit_message("");
        assert_eq!(config.title, "Bot");
        assert_eq!(config.log_file_path, PathBuf::from("/tmp/bot.log"));
        assert!(config.log_enabled);
        assert!(config.exit_message.is_empty());
    }
}
