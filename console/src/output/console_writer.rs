// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::{self, Write};

use crossterm::style::Color;

use crate::{DEFAULT_TITLE_COLOR, MessageQueue, OutputRecord};

pub const CONSOLE_WRITER_TITLE: &str = "LOG";
pub const CONSOLE_WRITER_BODY_COLOR: Color = Color::DarkYellow;

/// An [`io::Write`] that turns every complete line written to it into an
/// [`OutputRecord`] on the [`MessageQueue`]. Use it anywhere something wants to print
/// (like a `tracing` fmt layer) without clobbering the line being edited.
///
/// - Text is buffered until a `\n` arrives. Empty lines are skipped.
/// - Cloning shares the queue but starts with an empty buffer, so two clones never
///   interleave half lines.
/// - Whatever is left without a trailing `\n` is submitted on [`Write::flush`] or drop.
#[derive(Debug)]
pub struct ConsoleWriter {
    queue: MessageQueue,
    buffer: Vec<u8>,
    title: String,
}

impl Clone for ConsoleWriter {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
            buffer: Vec::new(),
            title: self.title.clone(),
        }
    }
}

impl ConsoleWriter {
    #[must_use]
    pub fn new(queue: MessageQueue) -> Self {
        Self {
            queue,
            buffer: Vec::new(),
            title: CONSOLE_WRITER_TITLE.to_string(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    fn submit(&self, line: &[u8]) {
        let line = String::from_utf8_lossy(line);
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return;
        }
        self.queue.enqueue(OutputRecord::with_colors(
            line,
            self.title.as_str(),
            CONSOLE_WRITER_BODY_COLOR,
            DEFAULT_TITLE_COLOR,
        ));
    }
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        while let Some(newline_index) = self.buffer.iter().position(|it| *it == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline_index).collect();
            self.submit(&line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let rest = std::mem::take(&mut self.buffer);
        self.submit(&rest);
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            self.submit(&rest);
        }
    }
}
