// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Single line editing. [`EditorState`] is a pure state machine (keys in, outcome and a
//! render hint out) so it can be tested without a terminal. [`LineEditor`] pairs it with
//! a prompt and turns the hints into terminal writes.

// Private modules (hide internal structure).
mod editor_state;
mod line_editor_impl;

// Re-exports for flat public API.
pub use editor_state::*;
pub use line_editor_impl::*;
