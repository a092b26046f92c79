// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Optional `tracing` subscriber setup for programs that embed the console. Diagnostics
//! can go to a file, or into the console itself through a [`crate::ConsoleWriter`] so
//! they never tear through the line being edited.

// Private modules (hide internal structure).
pub mod rolling_file_appender_impl;
mod tracing_config;
pub mod tracing_init;
mod writer_config;

// Re-exports for flat public API.
pub use tracing_config::*;
pub use writer_config::*;
