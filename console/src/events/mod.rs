// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Private modules (hide internal structure).
mod domain_event;
mod message_filter;

// Re-exports for flat public API.
pub use domain_event::*;
pub use message_filter::*;
