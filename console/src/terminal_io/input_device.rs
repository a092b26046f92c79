// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures_util::StreamExt;

use crate::{ConsoleError, CrosstermEventResult, PinnedInputStream};

/// This struct represents the keyboard. Reading from it is async, which is what makes the
/// input loop cancellable on shutdown. See [`crate::InputDeviceExt`] for test doubles.
#[allow(missing_debug_implementations)]
pub struct InputDevice {
    pub resource: PinnedInputStream<CrosstermEventResult>,
}

impl InputDevice {
    #[must_use]
    pub fn new_event_stream() -> InputDevice {
        InputDevice {
            resource: Box::pin(EventStream::new()),
        }
    }

    /// Wait for the next key press. Key release and repeat events, mouse, paste, focus
    /// and resize events are skipped.
    ///
    /// This is cancel safe: if the future is dropped while waiting, no key is lost.
    ///
    /// # Errors
    ///
    /// - [`ConsoleError::InputClosed`] if the underlying stream ended.
    /// - [`ConsoleError::IO`] if reading from the terminal failed.
    pub async fn next_key(&mut self) -> Result<KeyEvent, ConsoleError> {
        loop {
            match self.resource.next().await {
                Some(Ok(Event::Key(key_event))) if key_event.kind == KeyEventKind::Press => {
                    return Ok(key_event);
                }
                Some(Ok(_)) => {}
                Some(Err(error)) => return Err(error.into()),
                None => return Err(ConsoleError::InputClosed),
            }
        }
    }
}
