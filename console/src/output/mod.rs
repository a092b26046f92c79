// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Private modules (hide internal structure).
mod console_writer;
mod message_queue;
mod output_loop;
mod output_record;
mod persistent_log;

// Re-exports for flat public API.
pub use console_writer::*;
pub use message_queue::*;
pub use output_loop::*;
pub use output_record::*;
pub use persistent_log::*;
