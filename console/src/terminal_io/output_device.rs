// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::{Arc, MutexGuard, PoisonError};

use crate::{SafeRawTerminal, SendRawTerminal, StdMutex};

/// The terminal that both console loops write to.
/// - It is safe to clone, all clones share the same underlying writer and lock.
/// - Holding the lock is what gives one loop exclusive ownership of the cursor and color
///   state. See [`crate::lock_output_device_as_mut`].
#[derive(Clone)]
#[allow(missing_debug_implementations)]
pub struct OutputDevice {
    pub resource: SafeRawTerminal,
    /// Mock devices never toggle raw mode on the real terminal.
    pub is_mock: bool,
}

impl Default for OutputDevice {
    fn default() -> Self { Self::new_stdout() }
}

impl OutputDevice {
    #[must_use]
    pub fn new_stdout() -> Self {
        Self {
            resource: Arc::new(StdMutex::new(std::io::stdout())),
            is_mock: false,
        }
    }

    /// Locks the output device for writing. A poisoned lock is recovered, since a panic
    /// in one writer leaves the terminal no worse than a half written line.
    pub fn lock(&self) -> MutexGuard<'_, SendRawTerminal> {
        self.resource.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
