// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::{self, Write},
          sync::Arc,
          time::Duration};

use chrono::{DateTime, Local};
use tokio::sync::broadcast;

use crate::{MessageQueue, OutputDevice, PersistentLog, SharedFlags, TIME_FORMAT,
            lock_output_device_as_mut, render_clock};

/// What one [`OutputLoop::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A line is being edited, nothing was written.
    Paused,
    /// This many records were rendered.
    Drained(usize),
    /// The queue was empty and the second changed, so the clock was repainted.
    ClockRedrawn,
    /// Nothing to do.
    Idle,
}

/// Drains the [`MessageQueue`] to the terminal and keeps a clock ticking at the left
/// margin of the current line while nothing else is happening.
///
/// Each record is popped and rendered while holding the [`OutputDevice`] lock, and
/// `paused` is checked again under that same lock. So once the input loop has set
/// `paused` and taken the lock, no further record or clock can reach the screen.
#[allow(missing_debug_implementations)]
pub struct OutputLoop {
    output_device: OutputDevice,
    queue: MessageQueue,
    flags: Arc<SharedFlags>,
    log: Arc<PersistentLog>,
    poll_interval: Duration,
    /// Text of the last clock drawn. `None` forces a repaint on the next idle tick.
    last_clock: Option<String>,
    was_paused: bool,
}

impl OutputLoop {
    #[must_use]
    pub fn new(
        output_device: OutputDevice,
        queue: MessageQueue,
        flags: Arc<SharedFlags>,
        log: Arc<PersistentLog>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            output_device,
            queue,
            flags,
            log,
            poll_interval,
            last_clock: None,
            was_paused: false,
        }
    }

    /// One pass of the loop, with `now` as the wall clock time.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails. The loop logs it and carries
    /// on with the next tick.
    pub fn tick(&mut self, now: DateTime<Local>) -> io::Result<TickOutcome> {
        if self.flags.is_paused() {
            self.was_paused = true;
            return Ok(TickOutcome::Paused);
        }

        // The editor used the current line, so the clock has to be painted again.
        if self.was_paused {
            self.was_paused = false;
            self.last_clock = None;
        }

        if !self.queue.is_empty() {
            let count = self.drain()?;
            return Ok(if count == 0 {
                self.was_paused = true;
                TickOutcome::Paused
            } else {
                self.last_clock = None;
                TickOutcome::Drained(count)
            });
        }

        let clock = now.format(TIME_FORMAT).to_string();
        if self.last_clock.as_deref() == Some(clock.as_str()) {
            return Ok(TickOutcome::Idle);
        }

        {
            let term = lock_output_device_as_mut!(self.output_device);
            if self.flags.is_paused() {
                self.was_paused = true;
                return Ok(TickOutcome::Paused);
            }
            render_clock(term, &now)?;
            term.flush()?;
        }
        self.last_clock = Some(clock);
        Ok(TickOutcome::ClockRedrawn)
    }

    /// Render records until the queue is empty or the input loop pauses output. A record
    /// that fails to render goes back to the head of the queue.
    fn drain(&mut self) -> io::Result<usize> {
        let mut rendered = 0;
        loop {
            let record = {
                let term = lock_output_device_as_mut!(self.output_device);
                if self.flags.is_paused() {
                    self.was_paused = true;
                    break;
                }
                let Some(record) = self.queue.pop_front() else {
                    break;
                };
                if let Err(error) = record.render(term) {
                    self.queue.push_front(record);
                    return Err(error);
                }
                record
            };
            // The file is written with the terminal lock released.
            self.log.append(&record);
            rendered += 1;
        }
        Ok(rendered)
    }

    /// Tick every `poll_interval` until `finished` is set or a shutdown signal arrives.
    pub async fn run(mut self, mut shutdown_receiver: broadcast::Receiver<()>) {
        tracing::debug!(message = "Output loop started");
        loop {
            if self.flags.is_finished() {
                break;
            }

            if let Err(error) = self.tick(Local::now()) {
                tracing::warn!(message = "Failed to render console output", error = %error);
            }

            tokio::select! {
                _ = shutdown_receiver.recv() => break,
                () = tokio::time::sleep(self.poll_interval) => {}
            }
        }
        tracing::debug!(message = "Output loop stopped");
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{OutputDeviceExt, OutputRecord, StdoutMock};

    struct Fixture {
        output_loop: OutputLoop,
        queue: MessageQueue,
        flags: Arc<SharedFlags>,
        stdout_mock: StdoutMock,
    }

    fn fixture() -> Fixture {
        let (output_device, stdout_mock) = OutputDevice::new_mock();
        let queue = MessageQueue::new();
        let flags = Arc::new(SharedFlags::new());
        let log = Arc::new(PersistentLog::new("unused.log", false));
        let output_loop = OutputLoop::new(
            output_device,
            queue.clone(),
            flags.clone(),
            log,
            Duration::from_millis(5),
        );
        Fixture {
            output_loop,
            queue,
            flags,
            stdout_mock,
        }
    }

    fn at(hour: u32, min: u32, sec: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 1, 2, hour, min, sec).unwrap()
    }

    #[test]
    fn test_clock_redraws_only_when_second_changes() {
        let mut it = fixture();

        assert_eq!(it.output_loop.tick(at(9, 0, 0)).unwrap(), TickOutcome::ClockRedrawn);
        assert_eq!(it.output_loop.tick(at(9, 0, 0)).unwrap(), TickOutcome::Idle);
        assert_eq!(it.output_loop.tick(at(9, 0, 1)).unwrap(), TickOutcome::ClockRedrawn);

        assert_eq!(
            it.stdout_mock.get_copy_of_buffer_as_string_strip_ansi(),
            "[09:00:00] [09:00:01] "
        );
    }

    #[test]
    fn test_nothing_renders_while_paused_then_all_in_order() {
        let mut it = fixture();
        it.flags.set_paused(true);
        for body in ["one", "two", "three"] {
            it.queue
                .enqueue(OutputRecord::new(body, "").at(at(9, 0, 0)));
        }

        assert_eq!(it.output_loop.tick(at(9, 0, 0)).unwrap(), TickOutcome::Paused);
        assert_eq!(it.output_loop.tick(at(9, 0, 1)).unwrap(), TickOutcome::Paused);
        assert_eq!(it.stdout_mock.get_copy_of_buffer_as_string(), "");
        assert_eq!(it.queue.len(), 3);

        it.flags.set_paused(false);
        assert_eq!(it.output_loop.tick(at(9, 0, 2)).unwrap(), TickOutcome::Drained(3));
        assert_eq!(it.output_loop.tick(at(9, 0, 2)).unwrap(), TickOutcome::ClockRedrawn);

        assert_eq!(
            it.stdout_mock.get_copy_of_buffer_as_string_strip_ansi(),
            "[09:00:00] one\n[09:00:00] two\n[09:00:00] three\n[09:00:02] "
        );
    }

    #[test]
    fn test_clock_is_forced_after_resume() {
        let mut it = fixture();
        assert_eq!(it.output_loop.tick(at(9, 0, 0)).unwrap(), TickOutcome::ClockRedrawn);

        it.flags.set_paused(true);
        assert_eq!(it.output_loop.tick(at(9, 0, 0)).unwrap(), TickOutcome::Paused);
        it.flags.set_paused(false);

        // Same second as before the pause, but the editor wrote over the clock.
        assert_eq!(it.output_loop.tick(at(9, 0, 0)).unwrap(), TickOutcome::ClockRedrawn);
    }

    #[test]
    fn test_rendered_records_are_logged() {
        let dir = tempfile::tempdir().unwrap();
        let (output_device, _stdout_mock) = OutputDevice::new_mock();
        let queue = MessageQueue::new();
        let log = Arc::new(PersistentLog::new(dir.path().join("LogFile.txt"), true));
        let mut output_loop = OutputLoop::new(
            output_device,
            queue.clone(),
            Arc::new(SharedFlags::new()),
            log.clone(),
            Duration::from_millis(5),
        );
        queue.enqueue(OutputRecord::new("hello", "title").at(at(9, 0, 0)));

        output_loop.tick(at(9, 0, 0)).unwrap();

        assert_eq!(
            std::fs::read_to_string(log.path()).unwrap(),
            "[09:00:00]: title hello\n"
        );
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown_signal() {
        let it = fixture();
        let (shutdown_sender, shutdown_receiver) = broadcast::channel::<()>(1);
        let join_handle = tokio::spawn(it.output_loop.run(shutdown_receiver));

        it.queue.enqueue(OutputRecord::new("queued", ""));
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_sender.send(()).unwrap();

        tokio::time::timeout(Duration::from_secs(1), join_handle)
            .await
            .unwrap()
            .unwrap();
        assert!(
            it.stdout_mock
                .get_copy_of_buffer_as_string_strip_ansi()
                .contains("queued\n")
        );
    }

    /// A terminal whose first write fails, like one being resized mid render.
    struct FailsOnce {
        failed: bool,
        stdout_mock: StdoutMock,
    }

    impl Write for FailsOnce {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if !self.failed {
                self.failed = true;
                return Err(io::Error::other("terminal resized"));
            }
            self.stdout_mock.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> { self.stdout_mock.flush() }
    }

    #[test]
    fn test_record_that_fails_to_render_stays_queued() {
        let stdout_mock = StdoutMock::default();
        let output_device = OutputDevice {
            resource: Arc::new(crate::StdMutex::new(FailsOnce {
                failed: false,
                stdout_mock: stdout_mock.clone(),
            })),
            is_mock: true,
        };
        let queue = MessageQueue::new();
        let mut output_loop = OutputLoop::new(
            output_device,
            queue.clone(),
            Arc::new(SharedFlags::new()),
            Arc::new(PersistentLog::new("unused.log", false)),
            Duration::from_millis(5),
        );
        queue.enqueue(OutputRecord::new("first", "").at(at(9, 0, 0)));
        queue.enqueue(OutputRecord::new("second", "").at(at(9, 0, 0)));

        assert!(output_loop.tick(at(9, 0, 0)).is_err());
        assert_eq!(queue.len(), 2);

        assert_eq!(output_loop.tick(at(9, 0, 0)).unwrap(), TickOutcome::Drained(2));
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string_strip_ansi(),
            "[09:00:00] first\n[09:00:00] second\n"
        );
    }

    #[test]
    fn test_clock_is_forced_after_drain_sees_pause() {
        let mut it = fixture();
        assert_eq!(it.output_loop.tick(at(9, 0, 0)).unwrap(), TickOutcome::ClockRedrawn);

        // The input loop paused after the tick checked the flag, so the drain is the first
        // to see it.
        it.queue.enqueue(OutputRecord::new("held", "").at(at(9, 0, 0)));
        it.flags.set_paused(true);
        assert_eq!(it.output_loop.drain().unwrap(), 0);
        it.flags.set_paused(false);
        let _ = it.queue.drain_all();
        let _ = it.stdout_mock.take_buffer_as_string_strip_ansi();

        assert_eq!(it.output_loop.tick(at(9, 0, 0)).unwrap(), TickOutcome::ClockRedrawn);
        assert_eq!(it.stdout_mock.take_buffer_as_string_strip_ansi(), "[09:00:00] ");
    }
}
