// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The `r3bl_console` library renders an ongoing, timestamped log of events that arrive
//! asynchronously from some external source, while a human types and submits a command
//! line on the same screen. Neither activity clobbers the other's output.
//!
//! # Mental model
//!
//! ```text
//! external events ──► ConsoleHandle ──► MessageQueue ──► OutputLoop ──► terminal
//!                                            ▲
//! keyboard ──► InputLoop ──► LineEditor ──► CommandRouter ──► CommandDispatcher
//!                                            │                      │
//!                                            └──── EchoSink ◄───────┘
//! ```
//!
//! 1. The [`OutputLoop`] runs on a short fixed polling interval
//!    ([`OUTPUT_POLL_INTERVAL`]). When nothing is queued it redraws a ticking clock at
//!    the left margin. When records are queued it drains and renders them in order.
//! 2. The [`InputLoop`] waits for a key. The first key pauses the output loop, then the
//!    [`LineEditor`] takes over the line until the user presses `Enter` or `Escape`.
//!    The submitted line goes to the [`CommandRouter`], and output resumes.
//! 3. The [`Coordinator`] owns both loops and their lifecycle: `start`, a shutdown
//!    request, and the final teardown.
//!
//! # Pause is advisory, the terminal lock is not
//!
//! The `paused` flag in [`SharedFlags`] tells the output loop to stay off the screen.
//! On its own that leaves a window where a render starts just before the flag flips.
//! To close it, every terminal write goes through [`OutputDevice::lock()`], and the
//! output loop re-checks `paused` while it holds that lock, before it pops a record.
//!
//! # Shutdown without killing tasks
//!
//! A blocking key read can't be cancelled. So the [`InputDevice`] is an async stream,
//! and every read is raced against a shutdown broadcast in a `tokio::select!`. Calling
//! [`Coordinator::shutdown()`] stops both loops even if no key is ever pressed again.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use r3bl_console::{CommandDispatcher, ConsoleConfig, ConsoleEvents, Coordinator,
//!                    EchoSink, InputDevice, OutputDevice};
//!
//! struct Echo;
//!
//! impl CommandDispatcher for Echo {
//!     fn dispatch(&self, command_line: &str, echo: EchoSink) {
//!         echo.print(format!("ran: {command_line}"));
//!     }
//! }
//!
//! async fn run() -> Result<(), r3bl_console::ConsoleError> {
//!     let mut coordinator = Coordinator::new(
//!         ConsoleConfig::default(),
//!         OutputDevice::new_stdout(),
//!         InputDevice::new_event_stream(),
//!     );
//!     coordinator.bind(Arc::new(Echo));
//!     coordinator.start()?;
//!
//!     let handle = coordinator.handle();
//!     handle.on_join("alice");
//!
//!     coordinator.wait_for_shutdown_request().await;
//!     coordinator.shutdown().await
//! }
//! ```

// https://github.com/rust-lang/rust-clippy
// https://rust-lang.github.io/rust-clippy/master/index.html
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
pub mod coordinator;
pub mod decl_macros;
pub mod error;
pub mod events;
pub mod input;
pub mod line_editor;
pub mod log;
pub mod output;
pub mod terminal_io;
pub mod test_fixtures;

// Re-export the public API.
pub use coordinator::*;
pub use error::*;
pub use events::*;
pub use input::*;
pub use line_editor::*;
pub use log::*;
pub use output::*;
pub use terminal_io::*;
pub use test_fixtures::*;

// Constants.
use std::time::Duration;

/// How often the output loop wakes up to drain the queue or redraw the clock.
pub const OUTPUT_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Fixed prompt marker printed in front of the editable region.
pub const DEFAULT_PROMPT: &str = " > ";

/// Default file that rendered records are appended to when file logging is on.
pub const DEFAULT_LOG_FILE_NAME: &str = "LogFile.txt";

/// `chrono` format string for the timestamp prefix and the clock.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Title of records that a [`CommandDispatcher`] prints through its [`EchoSink`].
pub const ECHO_TITLE: &str = "CONSOLE";
