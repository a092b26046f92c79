// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use crate::CrosstermEventResult;

/// A key press with no modifiers.
#[must_use]
pub fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

/// A key press with `modifiers` held down.
#[must_use]
pub fn key_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

/// One key press per `char` in `text`.
#[must_use]
pub fn char_keys(text: &str) -> Vec<KeyEvent> {
    text.chars().map(|ch| key(KeyCode::Char(ch))).collect()
}

/// Wrap key presses as the events an [`crate::InputDevice`] stream yields.
#[must_use]
pub fn key_events(keys: impl IntoIterator<Item = KeyEvent>) -> Vec<CrosstermEventResult> {
    keys.into_iter().map(|it| Ok(Event::Key(it))).collect()
}

/// Key presses that type `text` and then press `Enter`.
#[must_use]
pub fn typed_line(text: &str) -> Vec<CrosstermEventResult> {
    let mut keys = char_keys(text);
    keys.push(key(KeyCode::Enter));
    key_events(keys)
}
