// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthChar;

/// What happened to the line after one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Keep editing.
    Continue,
    /// `Enter` was pressed. Holds the buffer as it was.
    Submit(String),
    /// The session ended with nothing to submit.
    Cancel,
}

/// The smallest terminal update that makes the screen match the state again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderHint {
    /// Nothing visible changed.
    None,
    /// Repaint prompt and buffer, then place the cursor.
    Redraw,
    /// The char was added at the end, where the cursor already is.
    Append(char),
    /// Only the cursor column changed.
    MoveCursor,
    /// Wipe the whole line, prompt included.
    ClearLine,
    /// Leave the line as is and go to the start of the next one.
    NewLine,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditStep {
    pub outcome: EditOutcome,
    pub render: RenderHint,
}

impl EditStep {
    fn continue_with(render: RenderHint) -> Self {
        Self {
            outcome: EditOutcome::Continue,
            render,
        }
    }

    fn unchanged() -> Self { Self::continue_with(RenderHint::None) }

    fn cancel() -> Self {
        Self {
            outcome: EditOutcome::Cancel,
            render: RenderHint::ClearLine,
        }
    }
}

/// The buffer being edited and a cursor into it, counted in chars.
///
/// `0 <= cursor <= buffer.len()` holds after every [`EditorState::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    buffer: Vec<char>,
    cursor: usize,
    prompt_width: u16,
}

impl EditorState {
    #[must_use]
    pub fn new(prompt_width: u16) -> Self {
        Self {
            buffer: Vec::new(),
            cursor: 0,
            prompt_width,
        }
    }

    /// The key that woke up the input loop becomes the first char of the buffer.
    #[must_use]
    pub fn seeded(seed: char, prompt_width: u16) -> Self {
        Self {
            buffer: vec![seed],
            cursor: 1,
            prompt_width,
        }
    }

    #[must_use]
    pub fn buffer(&self) -> &[char] { &self.buffer }

    #[must_use]
    pub fn line(&self) -> String { self.buffer.iter().collect() }

    #[must_use]
    pub fn cursor(&self) -> usize { self.cursor }

    #[must_use]
    pub fn len(&self) -> usize { self.buffer.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.buffer.is_empty() }

    #[must_use]
    pub fn prompt_width(&self) -> u16 { self.prompt_width }

    /// Terminal column of the cursor: the prompt plus the display width of everything
    /// left of the cursor.
    #[must_use]
    pub fn cursor_column(&self) -> u16 {
        let end = self.cursor.min(self.buffer.len());
        let text_width: usize = self.buffer[..end]
            .iter()
            .map(|ch| ch.width().unwrap_or(0))
            .sum();
        let text_width = u16::try_from(text_width).unwrap_or(u16::MAX);
        self.prompt_width.saturating_add(text_width)
    }

    pub fn apply(&mut self, key: &KeyEvent) -> EditStep {
        // The cursor may only ever point inside the buffer or one past its end.
        self.cursor = self.cursor.min(self.buffer.len());

        match key.code {
            KeyCode::Enter => EditStep {
                outcome: EditOutcome::Submit(self.line()),
                render: RenderHint::NewLine,
            },
            KeyCode::Esc => {
                self.clear();
                EditStep::cancel()
            }
            KeyCode::Backspace => self.delete_backward(),
            KeyCode::Delete => self.delete_forward(),
            KeyCode::Left => self.move_to(self.cursor.saturating_sub(1)),
            KeyCode::Right => self.move_to(self.cursor + 1),
            KeyCode::Home => self.move_to(0),
            KeyCode::End => self.move_to(self.buffer.len()),
            KeyCode::Char(ch) if is_printable(key) => self.insert(ch),
            _ => EditStep::unchanged(),
        }
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    fn move_to(&mut self, target: usize) -> EditStep {
        let target = target.min(self.buffer.len());
        if target == self.cursor {
            return EditStep::unchanged();
        }
        self.cursor = target;
        EditStep::continue_with(RenderHint::MoveCursor)
    }

    fn insert(&mut self, ch: char) -> EditStep {
        if self.cursor == self.buffer.len() {
            self.buffer.push(ch);
            self.cursor += 1;
            EditStep::continue_with(RenderHint::Append(ch))
        } else {
            self.buffer.insert(self.cursor, ch);
            self.cursor += 1;
            EditStep::continue_with(RenderHint::Redraw)
        }
    }

    fn delete_backward(&mut self) -> EditStep {
        if self.cursor == 0 {
            return EditStep::unchanged();
        }
        // Erasing the last remaining char ends the session.
        if self.buffer.len() <= 1 {
            self.clear();
            return EditStep::cancel();
        }
        self.cursor -= 1;
        self.buffer.remove(self.cursor);
        EditStep::continue_with(RenderHint::Redraw)
    }

    fn delete_forward(&mut self) -> EditStep {
        if self.cursor >= self.buffer.len() {
            return EditStep::unchanged();
        }
        if self.buffer.len() <= 1 {
            self.clear();
            return EditStep::cancel();
        }
        self.buffer.remove(self.cursor);
        EditStep::continue_with(RenderHint::Redraw)
    }
}

/// A plain char with no `Ctrl` or `Alt` held, and not itself a control char. `Shift` is
/// fine, it's already folded into the char.
#[must_use]
pub fn is_printable(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(ch) => {
            !ch.is_control()
                && !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use test_case::test_case;

    use super::*;
    use crate::{char_keys, key, key_with};

    fn type_keys(state: &mut EditorState, keys: &[KeyEvent]) -> Vec<EditStep> {
        keys.iter()
            .map(|it| {
                let step = state.apply(it);
                assert!(state.cursor() <= state.len());
                step
            })
            .collect()
    }

    #[test]
    fn test_insert_in_middle() {
        let mut state = EditorState::new(3);
        let mut keys = char_keys("hello");
        keys.push(key(KeyCode::Left));
        keys.push(key(KeyCode::Left));
        keys.push(key(KeyCode::Char('X')));

        let steps = type_keys(&mut state, &keys);

        assert_eq!(state.line(), "helXlo");
        assert_eq!(state.cursor(), 4);
        assert_eq!(steps[0].render, RenderHint::Append('h'));
        assert_eq!(steps[5].render, RenderHint::MoveCursor);
        assert_eq!(steps[7].render, RenderHint::Redraw);
    }

    #[test]
    fn test_enter_submits_buffer() {
        let mut state = EditorState::seeded('h', 3);
        type_keys(&mut state, &char_keys("i"));

        let step = state.apply(&key(KeyCode::Enter));

        assert_eq!(step.outcome, EditOutcome::Submit("hi".into()));
        assert_eq!(step.render, RenderHint::NewLine);
    }

    #[test]
    fn test_enter_on_empty_buffer_submits_empty_line() {
        let mut state = EditorState::new(3);
        let step = state.apply(&key(KeyCode::Enter));
        assert_eq!(step.outcome, EditOutcome::Submit(String::new()));
    }

    #[test]
    fn test_escape_cancels_and_clears() {
        let mut state = EditorState::seeded('a', 3);
        type_keys(&mut state, &char_keys("bc"));

        let step = state.apply(&key(KeyCode::Esc));

        assert_eq!(step.outcome, EditOutcome::Cancel);
        assert_eq!(step.render, RenderHint::ClearLine);
        assert!(state.is_empty());
        assert_eq!(state.cursor(), 0);
    }

    #[test_case(KeyCode::Backspace, 1 ; "backspace with cursor after the char")]
    #[test_case(KeyCode::Delete, 0 ; "delete with cursor before the char")]
    fn test_removing_only_char_cancels(code: KeyCode, cursor: usize) {
        let mut state = EditorState::seeded('a', 3);
        if cursor == 0 {
            state.apply(&key(KeyCode::Home));
        }

        let step = state.apply(&key(code));

        assert_eq!(step.outcome, EditOutcome::Cancel);
        assert!(state.is_empty());
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut state = EditorState::seeded('a', 3);
        type_keys(&mut state, &char_keys("b"));
        state.apply(&key(KeyCode::Home));

        let step = state.apply(&key(KeyCode::Backspace));

        assert_eq!(step, EditStep::unchanged());
        assert_eq!(state.line(), "ab");
    }

    #[test]
    fn test_delete_at_end_is_noop() {
        let mut state = EditorState::seeded('a', 3);
        type_keys(&mut state, &char_keys("b"));

        let step = state.apply(&key(KeyCode::Delete));

        assert_eq!(step, EditStep::unchanged());
        assert_eq!(state.line(), "ab");
    }

    #[test]
    fn test_backspace_and_delete_in_middle() {
        let mut state = EditorState::new(3);
        type_keys(&mut state, &char_keys("abcd"));
        state.apply(&key(KeyCode::Left));
        state.apply(&key(KeyCode::Left));

        let step = state.apply(&key(KeyCode::Backspace));
        assert_eq!(step.render, RenderHint::Redraw);
        assert_eq!(state.line(), "acd");
        assert_eq!(state.cursor(), 1);

        let step = state.apply(&key(KeyCode::Delete));
        assert_eq!(step.render, RenderHint::Redraw);
        assert_eq!(state.line(), "ad");
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn test_cursor_movement_is_clamped() {
        let mut state = EditorState::new(3);
        type_keys(&mut state, &char_keys("ab"));

        assert_eq!(state.apply(&key(KeyCode::Right)), EditStep::unchanged());
        assert_eq!(state.cursor(), 2);

        state.apply(&key(KeyCode::Home));
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.apply(&key(KeyCode::Left)), EditStep::unchanged());

        state.apply(&key(KeyCode::End));
        assert_eq!(state.cursor(), 2);
    }

    #[test]
    fn test_control_keys_are_ignored() {
        let mut state = EditorState::seeded('a', 3);
        let steps = type_keys(
            &mut state,
            &[
                key_with(KeyCode::Char('c'), KeyModifiers::CONTROL),
                key_with(KeyCode::Char('x'), KeyModifiers::ALT),
                key(KeyCode::Char('\u{7}')),
                key(KeyCode::Tab),
                key(KeyCode::Up),
                key(KeyCode::F(1)),
            ],
        );

        assert!(steps.iter().all(|it| *it == EditStep::unchanged()));
        assert_eq!(state.line(), "a");
    }

    #[test]
    fn test_shifted_chars_are_printable() {
        let mut state = EditorState::new(3);
        state.apply(&key_with(KeyCode::Char('A'), KeyModifiers::SHIFT));
        assert_eq!(state.line(), "A");
    }

    #[test]
    fn test_cursor_column_counts_display_width() {
        let mut state = EditorState::new(3);
        type_keys(&mut state, &char_keys("a😀b"));
        assert_eq!(state.cursor_column(), 3 + 1 + 2 + 1);

        state.apply(&key(KeyCode::Left));
        assert_eq!(state.cursor_column(), 3 + 1 + 2);
    }

    /// Any key that edits or moves, but never `Enter` or `Escape`.
    fn edit_key() -> impl Strategy<Value = KeyEvent> {
        prop_oneof![
            Just(KeyCode::Left),
            Just(KeyCode::Right),
            Just(KeyCode::Home),
            Just(KeyCode::End),
            Just(KeyCode::Backspace),
            Just(KeyCode::Delete),
            any::<char>().prop_map(KeyCode::Char),
            prop::char::range('a', 'z').prop_map(KeyCode::Char),
        ]
        .prop_map(key)
    }

    proptest! {
        #[test]
        fn test_cursor_stays_within_buffer(
            seed in prop::char::range('a', 'z'),
            keys in prop::collection::vec(edit_key(), 0..64)
        ) {
            let mut state = EditorState::seeded(seed, 3);
            for it in &keys {
                let step = state.apply(it);
                prop_assert!(state.cursor() <= state.len());
                prop_assert_eq!(state.line().chars().count(), state.len());
                if step.outcome == EditOutcome::Cancel {
                    prop_assert!(state.is_empty());
                    prop_assert_eq!(state.cursor(), 0);
                }
            }
        }
    }
}
