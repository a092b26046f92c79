// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::{Arc, MutexGuard, OnceLock, PoisonError};

use crate::{CustomCommandHandler, CustomCommands, ECHO_TITLE, MessageQueue,
            OutputRecord, StdMutex};

/// The external component that executes submitted command lines.
pub trait CommandDispatcher: Send + Sync {
    /// Execute `command_line`, which is already normalized (see
    /// [`normalize_command_line`]). Anything the command wants to show the user goes
    /// through `echo`.
    fn dispatch(&self, command_line: &str, echo: EchoSink);
}

/// Where a [`CommandDispatcher`] prints its replies. Each call queues one
/// [`OutputRecord`] titled [`ECHO_TITLE`].
#[derive(Debug, Clone)]
pub struct EchoSink {
    queue: MessageQueue,
}

impl EchoSink {
    #[must_use]
    pub fn new(queue: MessageQueue) -> Self { Self { queue } }

    pub fn print(&self, message: impl Into<String>) {
        self.queue.enqueue(OutputRecord::new(message, ECHO_TITLE));
    }
}

/// Turn a submitted line into the form the dispatcher expects.
///
/// - Surrounding whitespace is trimmed, and a blank line yields `None`.
/// - A leading `/` or `!` marks an explicit command and is stripped.
/// - Anything else is chat, so it is prefixed with `say `.
///
/// Returns `None` if nothing is left to dispatch, e.g. for a lone `/`.
#[must_use]
pub fn normalize_command_line(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = match trimmed.strip_prefix(['/', '!']) {
        Some(command) => command.to_string(),
        None => format!("say {trimmed}"),
    };
    (!normalized.is_empty()).then_some(normalized)
}

/// What happened to a submitted line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Blank, or nothing left after normalizing.
    Ignored,
    /// A custom command handler ran. Holds the matched token.
    CustomCommand(String),
    /// Handed to the bound dispatcher. Holds the normalized line.
    Dispatched(String),
    /// No dispatcher has been bound yet, so the normalized line was dropped.
    NoDispatcher(String),
}

/// Decides where each submitted line goes. Cloning is cheap and all clones share the
/// custom commands and the bound dispatcher.
#[derive(Clone, Default)]
#[allow(missing_debug_implementations)]
pub struct CommandRouter {
    custom_commands: Arc<StdMutex<CustomCommands>>,
    dispatcher: Arc<OnceLock<Arc<dyn CommandDispatcher>>>,
    queue: MessageQueue,
}

impl CommandRouter {
    #[must_use]
    pub fn new(queue: MessageQueue) -> Self {
        Self {
            custom_commands: Arc::default(),
            dispatcher: Arc::default(),
            queue,
        }
    }

    fn lock_custom_commands(&self) -> MutexGuard<'_, CustomCommands> {
        self.custom_commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Attach the dispatcher. Only the first call has any effect, later ones return
    /// `false`.
    pub fn bind(&self, dispatcher: Arc<dyn CommandDispatcher>) -> bool {
        let bound = self.dispatcher.set(dispatcher).is_ok();
        if !bound {
            tracing::debug!(message = "Command dispatcher already bound, ignoring");
        }
        bound
    }

    #[must_use]
    pub fn is_bound(&self) -> bool { self.dispatcher.get().is_some() }

    /// See [`CustomCommands::register`].
    pub fn register_custom_command(
        &self,
        token: &str,
        handler: CustomCommandHandler,
    ) -> bool {
        self.lock_custom_commands().register(token, handler)
    }

    /// Route one submitted line. Custom commands win over the dispatcher, and get the
    /// line exactly as it was typed.
    pub fn route(&self, line: &str) -> RouteOutcome {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return RouteOutcome::Ignored;
        }

        // The handler runs after the lock is released, so it may register more commands.
        let custom_command = self.lock_custom_commands().find(trimmed);
        if let Some((token, handler)) = custom_command {
            handler(line);
            return RouteOutcome::CustomCommand(token);
        }

        let Some(command_line) = normalize_command_line(trimmed) else {
            return RouteOutcome::Ignored;
        };

        match self.dispatcher.get() {
            Some(dispatcher) => {
                dispatcher.dispatch(&command_line, EchoSink::new(self.queue.clone()));
                RouteOutcome::Dispatched(command_line)
            }
            None => {
                tracing::debug!(
                    message = "No command dispatcher bound, dropping line",
                    command_line = %command_line
                );
                RouteOutcome::NoDispatcher(command_line)
            }
        }
    }
}
