// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Test doubles for the terminal. They are compiled into the library (not just
//! `#[cfg(test)]`) so that integration tests in `tests/` and downstream crates can drive
//! a [`crate::Coordinator`] without a real TTY.

// Private modules (hide internal structure).
mod device_ext;
mod input_stream_mock;
mod key_fixtures;
mod stdout_mock;

// Re-exports for flat public API.
pub use device_ext::*;
pub use input_stream_mock::*;
pub use key_fixtures::*;
pub use stdout_mock::*;
