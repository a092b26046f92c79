// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::{self, Write};

use crossterm::{QueueableCommand,
                cursor::MoveToColumn,
                event::{KeyCode, KeyEvent},
                style::{Color, Print, ResetColor, SetForegroundColor},
                terminal::{Clear, ClearType}};
use unicode_width::UnicodeWidthStr;

use crate::{EditOutcome, EditorState, RenderHint, is_printable};

pub const PROMPT_COLOR: Color = Color::DarkGrey;

/// One editing session: a prompt, the [`EditorState`] behind it, and the code that keeps
/// the terminal line in sync with that state.
///
/// Every method that takes `term` expects the caller to hold the
/// [`crate::OutputDevice`] lock.
#[derive(Debug, Clone)]
pub struct LineEditor {
    prompt: String,
    state: EditorState,
}

impl LineEditor {
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        let prompt_width = u16::try_from(prompt.width()).unwrap_or(u16::MAX);
        Self {
            prompt,
            state: EditorState::new(prompt_width),
        }
    }

    /// Open a session with the key that woke up the input loop. A printable key seeds
    /// the buffer. Any other key opens an empty session and is then applied as a normal
    /// edit, so `Enter` as the first key submits an empty line and `Escape` cancels.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn start(
        prompt: impl Into<String>,
        first_key: &KeyEvent,
        term: &mut dyn Write,
    ) -> io::Result<(Self, EditOutcome)> {
        let mut editor = Self::new(prompt);
        match first_key.code {
            KeyCode::Char(seed) if is_printable(first_key) => {
                editor.state = EditorState::seeded(seed, editor.state.prompt_width());
                editor.redraw(term)?;
                term.flush()?;
                Ok((editor, EditOutcome::Continue))
            }
            _ => {
                editor.redraw(term)?;
                let outcome = editor.handle_key(first_key, term)?;
                Ok((editor, outcome))
            }
        }
    }

    #[must_use]
    pub fn state(&self) -> &EditorState { &self.state }

    #[must_use]
    pub fn prompt(&self) -> &str { &self.prompt }

    /// Apply `key` and paint the result.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn handle_key(
        &mut self,
        key: &KeyEvent,
        term: &mut dyn Write,
    ) -> io::Result<EditOutcome> {
        let step = self.state.apply(key);
        self.render(step.render, term)?;
        Ok(step.outcome)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn render(&self, hint: RenderHint, term: &mut dyn Write) -> io::Result<()> {
        match hint {
            RenderHint::None => return Ok(()),
            RenderHint::Redraw => self.redraw(term)?,
            RenderHint::Append(ch) => {
                term.queue(Print(ch))?;
            }
            RenderHint::MoveCursor => {
                term.queue(MoveToColumn(self.state.cursor_column()))?;
            }
            RenderHint::ClearLine => {
                term.queue(MoveToColumn(0))?
                    .queue(Clear(ClearType::CurrentLine))?;
            }
            RenderHint::NewLine => {
                term.queue(Print("\r\n"))?;
            }
        }
        term.flush()
    }

    /// Repaint prompt and buffer from column 0 and put the cursor back. Not flushed.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn redraw(&self, term: &mut dyn Write) -> io::Result<()> {
        term.queue(MoveToColumn(0))?
            .queue(Clear(ClearType::CurrentLine))?
            .queue(SetForegroundColor(PROMPT_COLOR))?
            .queue(Print(&self.prompt))?
            .queue(ResetColor)?
            .queue(Print(self.state.line()))?
            .queue(MoveToColumn(self.state.cursor_column()))?;
        Ok(())
    }
}
