// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::HashMap, fmt, sync::Arc};

/// Called with the raw submitted line when its first word matches a registered token.
pub type CustomCommandHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Commands handled by the console's owner instead of the [`crate::CommandDispatcher`].
/// Tokens are stored lowercase and matched against the lowercased first word of a line.
#[derive(Clone, Default)]
pub struct CustomCommands {
    handlers: HashMap<String, CustomCommandHandler>,
}

impl fmt::Debug for CustomCommands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tokens: Vec<_> = self.handlers.keys().collect();
        tokens.sort();
        f.debug_struct("CustomCommands")
            .field("tokens", &tokens)
            .finish()
    }
}

impl CustomCommands {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Register `handler` under `token`.
    ///
    /// A single word token that is already registered keeps its first handler and this
    /// returns `false`. A token with a space in it can never match a line's first word,
    /// so it is simply replaced.
    pub fn register(&mut self, token: &str, handler: CustomCommandHandler) -> bool {
        let token = token.to_lowercase();
        if !token.contains(' ') && self.handlers.contains_key(&token) {
            tracing::debug!(message = "Ignoring duplicate custom command", token = %token);
            return false;
        }
        self.handlers.insert(token, handler);
        true
    }

    /// Look up the handler for the first whitespace separated word of `line`.
    #[must_use]
    pub fn find(&self, line: &str) -> Option<(String, CustomCommandHandler)> {
        let token = line.split_whitespace().next()?.to_lowercase();
        let handler = self.handlers.get(&token)?.clone();
        Some((token, handler))
    }

    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.handlers.contains_key(&token.to_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize { self.handlers.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.handlers.is_empty() }
}
