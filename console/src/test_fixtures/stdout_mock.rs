// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::{Result, Write},
          sync::{Arc, MutexGuard, PoisonError}};

use strip_ansi_escapes::strip;

use crate::StdMutex;

/// An in-memory stand in for stdout. Cloning only clones the [Arc], so every clone sees
/// the bytes written by every other clone.
///
/// The main constructors are:
/// - [`StdoutMock::default`]
/// - [`super::OutputDeviceExt::new_mock()`]
#[derive(Clone, Default, Debug)]
pub struct StdoutMock {
    pub buffer: Arc<StdMutex<Vec<u8>>>,
}

impl StdoutMock {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn get_copy_of_buffer(&self) -> Vec<u8> { self.lock().clone() }

    #[must_use]
    pub fn get_copy_of_buffer_as_string(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// Everything written so far, with colors, cursor moves and window titles removed.
    /// Carriage returns are removed too, `\r\n` comes back as `\n`.
    #[must_use]
    pub fn get_copy_of_buffer_as_string_strip_ansi(&self) -> String {
        String::from_utf8_lossy(&strip(&*self.lock())).into_owned()
    }

    /// Same as [`Self::get_copy_of_buffer_as_string_strip_ansi`], but also empties the
    /// buffer, so a test can assert on what one step wrote.
    #[must_use]
    pub fn take_buffer_as_string_strip_ansi(&self) -> String {
        let bytes = std::mem::take(&mut *self.lock());
        String::from_utf8_lossy(&strip(bytes)).into_owned()
    }
}

impl Write for StdoutMock {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> { Ok(()) }
}
