// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Private modules (hide internal structure).
mod config;
mod console_handle;
mod coordinator_impl;
mod shared_flags;

// Re-exports for flat public API.
pub use config::*;
pub use console_handle::*;
pub use coordinator_impl::*;
pub use shared_flags::*;
