// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::{Arc, PoisonError};

use crossterm::style::Color;

use crate::{CommandDispatcher, CommandRouter, ConsoleEvents, ConsoleWriter,
            DEFAULT_BODY_COLOR, DEFAULT_TITLE_COLOR, FRIEND_TITLE_COLOR, JOIN_TITLE,
            JOIN_TITLE_COLOR, LEAVE_TITLE, LEAVE_TITLE_COLOR, MessageFilter,
            MessageQueue, OutputRecord, PersistentLog, SharedFlags, StdMutex};

/// What the outside world holds on to. It is cheap to clone, `Send + Sync`, and can be
/// used from any thread or task, before or after the console starts.
#[derive(Clone)]
#[allow(missing_debug_implementations)]
pub struct ConsoleHandle {
    queue: MessageQueue,
    flags: Arc<SharedFlags>,
    log: Arc<PersistentLog>,
    router: CommandRouter,
    message_filter: Arc<StdMutex<Option<MessageFilter>>>,
}

impl ConsoleHandle {
    pub(crate) fn new(
        queue: MessageQueue,
        flags: Arc<SharedFlags>,
        log: Arc<PersistentLog>,
        router: CommandRouter,
    ) -> Self {
        Self {
            queue,
            flags,
            log,
            router,
            message_filter: Arc::default(),
        }
    }

    /// Queue `body` for display with the default colors.
    pub fn write(&self, body: impl Into<String>, title: impl Into<String>) {
        self.write_record(OutputRecord::new(body, title));
    }

    pub fn write_with_colors(
        &self,
        body: impl Into<String>,
        title: impl Into<String>,
        body_color: Color,
        title_color: Color,
    ) {
        self.write_record(OutputRecord::with_colors(body, title, body_color, title_color));
    }

    pub fn write_record(&self, record: OutputRecord) { self.queue.enqueue(record); }

    pub fn write_error(&self, body: impl Into<String>) {
        self.write_record(OutputRecord::error(body));
    }

    pub fn write_notification(&self, body: impl Into<String>) {
        self.write_record(OutputRecord::notification(body));
    }

    pub fn set_logging(&self, enabled: bool) {
        tracing::debug!(message = "Console file logging toggled", enabled = enabled);
        self.log.set_enabled(enabled);
    }

    #[must_use]
    pub fn is_logging(&self) -> bool { self.log.is_enabled() }

    /// Ask the console to finish. Both loops stop at their next poll, and
    /// [`crate::Coordinator::wait_for_shutdown_request`] resolves.
    pub fn request_shutdown(&self) {
        if !self.flags.is_finished() {
            tracing::debug!(message = "Console shutdown requested");
        }
        self.flags.finish();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool { self.flags.is_finished() }

    /// Bind the command dispatcher, see [`CommandRouter::bind`].
    pub fn bind(&self, dispatcher: Arc<dyn CommandDispatcher>) -> bool {
        self.router.bind(dispatcher)
    }

    /// See [`crate::CustomCommands::register`].
    pub fn register_custom_command(
        &self,
        token: &str,
        handler: impl Fn(&str) + Send + Sync + 'static,
    ) -> bool {
        self.router.register_custom_command(token, Arc::new(handler))
    }

    /// Replace the filter applied to [`ConsoleEvents::on_system`]. `None` shows
    /// everything.
    pub fn set_message_filter(&self, message_filter: Option<MessageFilter>) {
        *self
            .message_filter
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = message_filter;
    }

    /// An [`std::io::Write`] that prints into this console.
    #[must_use]
    pub fn console_writer(&self) -> ConsoleWriter { ConsoleWriter::new(self.queue.clone()) }

    #[must_use]
    pub fn queue(&self) -> &MessageQueue { &self.queue }

    #[must_use]
    pub fn flags(&self) -> &Arc<SharedFlags> { &self.flags }

    pub(crate) fn log(&self) -> &Arc<PersistentLog> { &self.log }

    pub(crate) fn router(&self) -> &CommandRouter { &self.router }

    fn is_filtered(&self, title: &str, text: &str) -> bool {
        let message_filter = self
            .message_filter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        message_filter.is_some_and(|filter| filter(title, text))
    }
}

impl ConsoleEvents for ConsoleHandle {
    fn on_join(&self, username: &str) {
        self.write_with_colors(username, JOIN_TITLE, DEFAULT_BODY_COLOR, JOIN_TITLE_COLOR);
    }

    fn on_leave(&self, username: &str) {
        self.write_with_colors(
            username,
            LEAVE_TITLE,
            DEFAULT_BODY_COLOR,
            LEAVE_TITLE_COLOR,
        );
    }

    fn on_chat(&self, chat_name: &str, text: &str, is_friend: bool) {
        let title_color = if is_friend {
            FRIEND_TITLE_COLOR
        } else {
            DEFAULT_TITLE_COLOR
        };
        self.write_with_colors(
            text,
            format!("{chat_name}:"),
            DEFAULT_BODY_COLOR,
            title_color,
        );
    }

    fn on_system(&self, title: &str, text: &str) -> bool {
        if self.is_filtered(title, text) {
            tracing::trace!(message = "Suppressed system message", title = %title);
            return false;
        }
        self.write(text, format!("{title}:"));
        true
    }

    fn on_info(&self, title: &str, text: &str) { self.write(text, format!("{title}:")); }

    fn on_disposing(&self) { self.request_shutdown(); }
}
