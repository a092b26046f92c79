// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::{self, Write},
          sync::Arc};

use crossterm::{QueueableCommand,
                cursor::{self, MoveToColumn},
                style::Print,
                terminal::{self, Clear, ClearType, SetTitle}};
use strum_macros::Display;
use tokio::{sync::broadcast, task::JoinHandle};

use crate::{CommandDispatcher, CommandRouter, ConsoleConfig, ConsoleError, ConsoleHandle,
            InputDevice, InputLoop, MessageQueue, OutputDevice, OutputLoop,
            PersistentLog, SharedFlags, lock_output_device_as_mut, ok};

/// Where a [`Coordinator`] is in its life. It only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LifecycleState {
    Unstarted,
    Running,
    /// A shutdown was requested, the loops are winding down.
    Finishing,
    Stopped,
}

/// Owns the console: both loops, the terminal mode, and everything they share.
///
/// 1. [`Coordinator::new`] builds the shared state. Nothing touches the terminal yet.
/// 2. [`Coordinator::start`] enables raw mode and spawns the output and input loops.
/// 3. Anyone holding a [`ConsoleHandle`] can write records or request a shutdown.
/// 4. [`Coordinator::shutdown`] stops both loops, renders whatever is still queued,
///    prints the exit message, and restores the terminal.
///
/// If the coordinator is dropped without calling `shutdown`, the loops are signalled to
/// stop and raw mode is turned off, but queued records are not rendered.
#[allow(missing_debug_implementations)]
pub struct Coordinator {
    config: ConsoleConfig,
    output_device: OutputDevice,
    /// Taken by [`Coordinator::start`], so the input loop can only ever be spawned once.
    input_device: Option<InputDevice>,
    handle: ConsoleHandle,
    shutdown_sender: broadcast::Sender<()>,
    join_handles: Vec<JoinHandle<()>>,
    /// Never holds [`LifecycleState::Finishing`], that is derived from the flags.
    state: LifecycleState,
    raw_mode_enabled: bool,
}

impl Coordinator {
    #[must_use]
    pub fn new(
        config: ConsoleConfig,
        output_device: OutputDevice,
        input_device: InputDevice,
    ) -> Self {
        let queue = MessageQueue::new();
        let flags = Arc::new(SharedFlags::new());
        let log = Arc::new(PersistentLog::new(
            config.log_file_path.clone(),
            config.log_enabled,
        ));
        let router = CommandRouter::new(queue.clone());
        let handle = ConsoleHandle::new(queue, flags, log, router);
        let (shutdown_sender, _) = broadcast::channel::<()>(1);

        Self {
            config,
            output_device,
            input_device: Some(input_device),
            handle,
            shutdown_sender,
            join_handles: Vec::new(),
            state: LifecycleState::Unstarted,
            raw_mode_enabled: false,
        }
    }

    #[must_use]
    pub fn handle(&self) -> ConsoleHandle { self.handle.clone() }

    #[must_use]
    pub fn config(&self) -> &ConsoleConfig { &self.config }

    #[must_use]
    pub fn state(&self) -> LifecycleState {
        match self.state {
            LifecycleState::Running if self.handle.is_finished() => {
                LifecycleState::Finishing
            }
            state => state,
        }
    }

    /// Attach the command dispatcher. The first call wins, later calls return `false`
    /// and change nothing.
    pub fn bind(&self, dispatcher: Arc<dyn CommandDispatcher>) -> bool {
        self.handle.bind(dispatcher)
    }

    /// Put the terminal in raw mode, hide the cursor, set the window title, and spawn
    /// both loops. Calling it again does nothing.
    ///
    /// # Panics
    ///
    /// This will panic if called outside of a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal can't be put into raw mode or written to.
    pub fn start(&mut self) -> Result<(), ConsoleError> {
        if self.state != LifecycleState::Unstarted {
            tracing::debug!(message = "Console already started", state = %self.state());
            return ok!();
        }
        let Some(input_device) = self.input_device.take() else {
            return ok!();
        };

        if !self.output_device.is_mock {
            terminal::enable_raw_mode()?;
            self.raw_mode_enabled = true;
        }

        {
            let term = lock_output_device_as_mut!(self.output_device);
            term.queue(SetTitle(&self.config.title))?
                .queue(cursor::Hide)?;
            term.flush()?;
        }

        let flags = self.handle.flags().clone();

        let output_loop = OutputLoop::new(
            self.output_device.clone(),
            self.handle.queue().clone(),
            flags.clone(),
            self.handle.log().clone(),
            self.config.poll_interval,
        );
        let input_loop = InputLoop::new(
            input_device,
            self.output_device.clone(),
            flags,
            self.handle.router().clone(),
            self.config.prompt.as_str(),
        );

        self.join_handles
            .push(tokio::spawn(output_loop.run(self.shutdown_sender.subscribe())));
        self.join_handles
            .push(tokio::spawn(input_loop.run(self.shutdown_sender.subscribe())));

        self.state = LifecycleState::Running;
        tracing::debug!(message = "Console started", title = %self.config.title);
        ok!()
    }

    /// Same as [`ConsoleHandle::request_shutdown`].
    pub fn request_shutdown(&self) { self.handle.request_shutdown(); }

    /// Resolves once someone has requested a shutdown.
    pub async fn wait_for_shutdown_request(&self) {
        self.handle.flags().wait_until_finished().await;
    }

    /// Stop both loops and restore the terminal. A pending key read is cancelled, it
    /// does not wait for another key press. Records still queued are rendered before
    /// the exit message, so nothing submitted before this call is lost. Calling it
    /// again does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if a loop task panicked, or the terminal couldn't be written to
    /// or taken out of raw mode. Teardown runs to the end either way.
    pub async fn shutdown(&mut self) -> Result<(), ConsoleError> {
        if self.state == LifecycleState::Stopped {
            return ok!();
        }

        self.handle.request_shutdown();
        // No receivers only means the loops were never started.
        let _ = self.shutdown_sender.send(());

        let mut join_result: Result<(), ConsoleError> = ok!();
        for join_handle in self.join_handles.drain(..) {
            if let Err(error) = join_handle.await {
                tracing::warn!(message = "Console task failed", error = %error);
                if join_result.is_ok() {
                    join_result = Err(error.into());
                }
            }
        }
        self.handle.flags().set_paused(false);

        let render_result = if self.state == LifecycleState::Running {
            self.render_remaining()
        } else {
            ok!()
        };
        let restore_result = self.restore_terminal_mode();

        self.state = LifecycleState::Stopped;
        tracing::debug!(message = "Console stopped");

        join_result?;
        render_result?;
        restore_result?;
        ok!()
    }

    /// Flush the queue, print the exit message, and show the cursor again.
    fn render_remaining(&self) -> io::Result<()> {
        let term = lock_output_device_as_mut!(self.output_device);
        term.queue(MoveToColumn(0))?
            .queue(Clear(ClearType::CurrentLine))?;
        for record in self.handle.queue().drain_all() {
            record.render(term)?;
            self.handle.log().append(&record);
        }
        if !self.config.exit_message.is_empty() {
            term.queue(Print(&self.config.exit_message))?
                .queue(Print("\r\n"))?;
        }
        term.queue(cursor::Show)?;
        term.flush()
    }

    fn restore_terminal_mode(&mut self) -> io::Result<()> {
        if self.raw_mode_enabled {
            terminal::disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        ok!()
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        if self.state == LifecycleState::Running {
            self.handle.request_shutdown();
            let _ = self.shutdown_sender.send(());
            let term = lock_output_device_as_mut!(self.output_device);
            let _ = term.queue(cursor::Show).and_then(|it| it.flush());
        }
        if let Err(error) = self.restore_terminal_mode() {
            tracing::warn!(message = "Failed to disable raw mode", error = %error);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{ConsoleEvents, InputDeviceExt, OutputDeviceExt, StdoutMock};

    fn idle_coordinator(config: ConsoleConfig) -> (Coordinator, StdoutMock) {
        let (output_device, stdout_mock) = OutputDevice::new_mock();
        let input_device = InputDevice::new_mock_then_idle(vec![]);
        (
            Coordinator::new(config, output_device, input_device),
            stdout_mock,
        )
    }

    #[tokio::test]
    async fn test_lifecycle_states() {
        let (mut coordinator, _stdout_mock) = idle_coordinator(ConsoleConfig::default());
        assert_eq!(coordinator.state(), LifecycleState::Unstarted);

        coordinator.start().unwrap();
        assert_eq!(coordinator.state(), LifecycleState::Running);

        coordinator.handle().on_disposing();
        assert_eq!(coordinator.state(), LifecycleState::Finishing);

        coordinator.shutdown().await.unwrap();
        assert_eq!(coordinator.state(), LifecycleState::Stopped);
        assert_eq!(coordinator.state().to_string(), "Stopped");
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let (mut coordinator, _stdout_mock) = idle_coordinator(ConsoleConfig::default());
        coordinator.start().unwrap();
        coordinator.start().unwrap();
        assert_eq!(coordinator.join_handles.len(), 2);
        coordinator.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_with_blocked_input_renders_everything() {
        let (mut coordinator, stdout_mock) =
            idle_coordinator(ConsoleConfig::default().with_exit_message("bye"));
        coordinator.start().unwrap();

        // Pretend a line is being edited, so nothing reaches the screen before shutdown.
        coordinator.handle().flags().set_paused(true);
        let handle = coordinator.handle();
        handle.write("first", "");
        handle.write("second", "");

        tokio::time::timeout(Duration::from_secs(1), coordinator.shutdown())
            .await
            .unwrap()
            .unwrap();

        let output = stdout_mock.get_copy_of_buffer_as_string_strip_ansi();
        let first = output.find("first\n").unwrap();
        let second = output.find("second\n").unwrap();
        let bye = output.find("bye\n").unwrap();
        assert!(first < second && second < bye);
        assert!(handle.queue().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_before_start() {
        let (mut coordinator, stdout_mock) = idle_coordinator(ConsoleConfig::default());
        coordinator.shutdown().await.unwrap();
        coordinator.shutdown().await.unwrap();

        assert_eq!(coordinator.state(), LifecycleState::Stopped);
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "");
        coordinator.start().unwrap();
        assert_eq!(coordinator.state(), LifecycleState::Stopped);
    }

    #[tokio::test]
    async fn test_wait_for_shutdown_request() {
        let (mut coordinator, _stdout_mock) = idle_coordinator(ConsoleConfig::default());
        coordinator.start().unwrap();
        let handle = coordinator.handle();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            handle.request_shutdown();
        });

        tokio::time::timeout(
            Duration::from_secs(1),
            coordinator.wait_for_shutdown_request(),
        )
        .await
        .unwrap();
        coordinator.shutdown().await.unwrap();
    }
}
