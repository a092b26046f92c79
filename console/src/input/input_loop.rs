// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::Write, sync::Arc};

use crossterm::{QueueableCommand, cursor, event::KeyEvent};
use tokio::sync::broadcast;

use crate::{CommandRouter, ConsoleError, EditOutcome, InputDevice, LineEditor,
            OutputDevice, SharedFlags, lock_output_device_as_mut};

/// Waits for keys, runs one [`LineEditor`] session per line, and hands each submitted
/// line to the [`CommandRouter`].
///
/// A session begins on the first key after idle. From then until the line is submitted
/// or cancelled, `paused` is set so the output loop leaves the screen alone. Every key
/// read is raced against the shutdown signal, so a pending read never holds up
/// shutdown.
#[allow(missing_debug_implementations)]
pub struct InputLoop {
    input_device: InputDevice,
    output_device: OutputDevice,
    flags: Arc<SharedFlags>,
    router: CommandRouter,
    prompt: String,
}

impl InputLoop {
    #[must_use]
    pub fn new(
        input_device: InputDevice,
        output_device: OutputDevice,
        flags: Arc<SharedFlags>,
        router: CommandRouter,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            input_device,
            output_device,
            flags,
            router,
            prompt: prompt.into(),
        }
    }

    pub async fn run(mut self, mut shutdown_receiver: broadcast::Receiver<()>) {
        tracing::debug!(message = "Input loop started");
        loop {
            if self.flags.is_finished() {
                break;
            }

            let first_key = match self.next_key(&mut shutdown_receiver).await {
                Ok(Some(key)) => key,
                Ok(None) => break,
                Err(error) => {
                    if report_input_error(&error) {
                        continue;
                    }
                    break;
                }
            };

            // The console was asked to finish while we were waiting for this key.
            if self.flags.is_finished() {
                tracing::debug!(message = "Discarding key read after shutdown request");
                break;
            }

            let result = self.edit_line(first_key, &mut shutdown_receiver).await;
            let keep_going = match result {
                Ok(Some(line)) => {
                    let outcome = self.router.route(&line);
                    tracing::debug!(message = "Routed submitted line", outcome = ?outcome);
                    true
                }
                Ok(None) => !self.flags.is_finished(),
                Err(error) => report_input_error(&error) && !self.flags.is_finished(),
            };
            self.end_session();

            if !keep_going {
                break;
            }
        }
        tracing::debug!(message = "Input loop stopped");
    }

    /// `Ok(None)` means a shutdown signal arrived first.
    async fn next_key(
        &mut self,
        shutdown_receiver: &mut broadcast::Receiver<()>,
    ) -> Result<Option<KeyEvent>, ConsoleError> {
        tokio::select! {
            _ = shutdown_receiver.recv() => Ok(None),
            result = self.input_device.next_key() => result.map(Some),
        }
    }

    /// Run one editing session. `Ok(None)` means it was cancelled, or interrupted by a
    /// shutdown signal, in which case the partial line is thrown away.
    async fn edit_line(
        &mut self,
        first_key: KeyEvent,
        shutdown_receiver: &mut broadcast::Receiver<()>,
    ) -> Result<Option<String>, ConsoleError> {
        self.flags.set_paused(true);

        let (mut editor, mut outcome) = {
            let term = lock_output_device_as_mut!(self.output_device);
            term.queue(cursor::Show)?;
            LineEditor::start(self.prompt.as_str(), &first_key, term)?
        };

        loop {
            match outcome {
                EditOutcome::Submit(line) => return Ok(Some(line)),
                EditOutcome::Cancel => return Ok(None),
                EditOutcome::Continue => {}
            }

            let Some(key) = self.next_key(shutdown_receiver).await? else {
                return Ok(None);
            };

            let term = lock_output_device_as_mut!(self.output_device);
            outcome = editor.handle_key(&key, term)?;
        }
    }

    /// Hide the cursor and let the output loop back on the screen.
    fn end_session(&self) {
        {
            let term = lock_output_device_as_mut!(self.output_device);
            if let Err(error) = term.queue(cursor::Hide).and_then(|it| it.flush()) {
                tracing::warn!(message = "Failed to hide cursor", error = %error);
            }
        }
        self.flags.set_paused(false);
    }
}

/// Log `error` and return whether the loop can keep reading keys.
fn report_input_error(error: &ConsoleError) -> bool {
    match error {
        ConsoleError::InputClosed => {
            tracing::debug!(message = "Terminal input closed, input loop exiting");
            false
        }
        _ => {
            tracing::warn!(message = "Input loop error", error = %error);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{CommandDispatcher, EchoSink, InputDeviceExt, MessageQueue,
                OutputDeviceExt, StdMutex, char_keys, key, key_events, typed_line};

    #[derive(Default)]
    struct RecordingDispatcher {
        lines: StdMutex<Vec<String>>,
    }

    impl CommandDispatcher for RecordingDispatcher {
        fn dispatch(&self, command_line: &str, _echo: EchoSink) {
            self.lines.lock().unwrap().push(command_line.to_string());
        }
    }

    fn input_loop(
        input_device: InputDevice,
    ) -> (InputLoop, Arc<RecordingDispatcher>, Arc<SharedFlags>) {
        let (output_device, _stdout_mock) = OutputDevice::new_mock();
        let flags = Arc::new(SharedFlags::new());
        let router = CommandRouter::new(MessageQueue::new());
        let dispatcher = Arc::new(RecordingDispatcher::default());
        router.bind(dispatcher.clone());
        let it = InputLoop::new(input_device, output_device, flags.clone(), router, " > ");
        (it, dispatcher, flags)
    }

    #[tokio::test]
    async fn test_submitted_lines_are_routed() {
        let mut events = typed_line("hello");
        events.extend(typed_line("/kick bob"));
        events.extend(typed_line("   "));
        let (it, dispatcher, flags) = input_loop(InputDevice::new_mock(events));
        let (_shutdown_sender, shutdown_receiver) = broadcast::channel::<()>(1);

        // The mock stream ends after the last key, which ends the loop.
        it.run(shutdown_receiver).await;

        assert_eq!(
            *dispatcher.lines.lock().unwrap(),
            vec!["say hello", "kick bob"]
        );
        assert!(!flags.is_paused());
    }

    #[tokio::test]
    async fn test_escape_discards_the_line() {
        let mut keys = char_keys("oops");
        keys.push(key(KeyCode::Esc));
        let mut events = key_events(keys);
        events.extend(typed_line("ok"));
        let (it, dispatcher, _flags) = input_loop(InputDevice::new_mock(events));
        let (_shutdown_sender, shutdown_receiver) = broadcast::channel::<()>(1);

        it.run(shutdown_receiver).await;

        assert_eq!(*dispatcher.lines.lock().unwrap(), vec!["say ok"]);
    }

    #[tokio::test]
    async fn test_paused_while_editing_and_shutdown_discards_partial_line() {
        let (it, dispatcher, flags) =
            input_loop(InputDevice::new_mock_then_idle(key_events(char_keys("half"))));
        let (shutdown_sender, shutdown_receiver) = broadcast::channel::<()>(1);
        let join_handle = tokio::spawn(it.run(shutdown_receiver));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(flags.is_paused());

        flags.finish();
        shutdown_sender.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(1), join_handle)
            .await
            .unwrap()
            .unwrap();

        assert!(dispatcher.lines.lock().unwrap().is_empty());
        assert!(!flags.is_paused());
    }

    #[tokio::test]
    async fn test_idle_read_is_cancelled_by_shutdown() {
        let (it, _dispatcher, flags) = input_loop(InputDevice::new_mock_then_idle(vec![]));
        let (shutdown_sender, shutdown_receiver) = broadcast::channel::<()>(1);
        let join_handle = tokio::spawn(it.run(shutdown_receiver));

        tokio::time::sleep(Duration::from_millis(10)).await;
        flags.finish();
        shutdown_sender.send(()).unwrap();

        tokio::time::timeout(Duration::from_secs(1), join_handle)
            .await
            .unwrap()
            .unwrap();
    }
}
