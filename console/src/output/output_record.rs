// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::{self, Write};

use chrono::{DateTime, Local};
use crossterm::{QueueableCommand,
                cursor::MoveToColumn,
                style::{Color, Print, ResetColor, SetForegroundColor},
                terminal::{Clear, ClearType}};

use crate::{TIME_FORMAT, ok};

pub const DEFAULT_BODY_COLOR: Color = Color::Grey;
pub const DEFAULT_TITLE_COLOR: Color = Color::White;
pub const ERROR_BODY_COLOR: Color = Color::Red;
pub const NOTIFICATION_BODY_COLOR: Color = Color::DarkCyan;
pub const TIMESTAMP_COLOR: Color = Color::DarkGrey;

/// One pending line of output. The timestamp is captured when the record is created, not
/// when it is rendered, so a record that waited in the queue during a long edit still
/// shows when it actually happened.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    timestamp: DateTime<Local>,
    title: String,
    body: String,
    body_color: Color,
    title_color: Color,
}

impl OutputRecord {
    pub fn new(body: impl Into<String>, title: impl Into<String>) -> Self {
        Self::with_colors(body, title, DEFAULT_BODY_COLOR, DEFAULT_TITLE_COLOR)
    }

    pub fn with_colors(
        body: impl Into<String>,
        title: impl Into<String>,
        body_color: Color,
        title_color: Color,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            title: title.into(),
            body: body.into(),
            body_color,
            title_color,
        }
    }

    pub fn error(body: impl Into<String>) -> Self {
        Self::with_colors(body, "", ERROR_BODY_COLOR, DEFAULT_TITLE_COLOR)
    }

    pub fn notification(body: impl Into<String>) -> Self {
        Self::with_colors(body, "", NOTIFICATION_BODY_COLOR, DEFAULT_TITLE_COLOR)
    }

    /// Replace the capture time, mostly useful for replaying history and in tests.
    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Local> { self.timestamp }

    #[must_use]
    pub fn title(&self) -> &str { &self.title }

    #[must_use]
    pub fn body(&self) -> &str { &self.body }

    #[must_use]
    pub fn body_color(&self) -> Color { self.body_color }

    #[must_use]
    pub fn title_color(&self) -> Color { self.title_color }

    #[must_use]
    pub fn formatted_time(&self) -> String {
        self.timestamp.format(TIME_FORMAT).to_string()
    }

    /// The plain text form written to the persistent log: `[HH:MM:SS]: title body`.
    #[must_use]
    pub fn to_log_line(&self) -> String {
        format!("[{}]: {} {}", self.formatted_time(), self.title, self.body)
    }

    /// Paint this record over the current line (which usually holds the clock) and move
    /// to the start of the next one. Embedded newlines in the body are emitted as
    /// `\r\n` since the terminal is in raw mode.
    ///
    /// The caller must hold the [`crate::OutputDevice`] lock.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn render(&self, term: &mut dyn Write) -> io::Result<()> {
        render_clock(term, &self.timestamp)?;
        if !self.title.is_empty() {
            term.queue(SetForegroundColor(self.title_color))?
                .queue(Print(&self.title))?
                .queue(Print(' '))?;
        }
        term.queue(SetForegroundColor(self.body_color))?
            .queue(Print(self.body.replace('\n', "\r\n")))?
            .queue(ResetColor)?
            .queue(Print("\r\n"))?;
        term.flush()
    }
}

/// Clear the current line and draw the `[HH:MM:SS] ` prefix at the left margin. Nothing
/// is flushed, so callers can batch more output after it.
///
/// # Errors
///
/// Returns an error if writing to the terminal fails.
pub fn render_clock(term: &mut dyn Write, now: &DateTime<Local>) -> io::Result<()> {
    term.queue(MoveToColumn(0))?
        .queue(Clear(ClearType::CurrentLine))?
        .queue(SetForegroundColor(TIMESTAMP_COLOR))?
        .queue(Print(format!("[{}] ", now.format(TIME_FORMAT))))?
        .queue(ResetColor)?;
    ok!()
}
