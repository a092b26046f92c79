// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Private modules (hide internal structure).
mod command_router;
mod custom_commands;
mod input_loop;

// Re-exports for flat public API.
pub use command_router::*;
pub use custom_commands::*;
pub use input_loop::*;
