// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::style::Color;

/// Everything the external event source can tell the console about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    Join { username: String },
    Leave { username: String },
    Chat {
        chat_name: String,
        text: String,
        is_friend: bool,
    },
    /// Server generated text. Subject to the console's [`crate::MessageFilter`].
    System { title: String, text: String },
    Info { title: String, text: String },
    /// The event source is going away, the console should finish.
    Disposing,
}

pub const JOIN_TITLE: &str = "[+]";
pub const JOIN_TITLE_COLOR: Color = Color::Green;
pub const LEAVE_TITLE: &str = "[-]";
pub const LEAVE_TITLE_COLOR: Color = Color::Red;
pub const FRIEND_TITLE_COLOR: Color = Color::Green;

/// One typed entry point per [`DomainEvent`] variant. [`crate::ConsoleHandle`] is the
/// implementation that renders them.
pub trait ConsoleEvents {
    fn on_join(&self, username: &str);

    fn on_leave(&self, username: &str);

    fn on_chat(&self, chat_name: &str, text: &str, is_friend: bool);

    /// Returns `false` if the message was suppressed by the filter.
    fn on_system(&self, title: &str, text: &str) -> bool;

    fn on_info(&self, title: &str, text: &str);

    fn on_disposing(&self);

    /// Route a [`DomainEvent`] value to the matching typed method.
    fn on_event(&self, event: &DomainEvent) {
        match event {
            DomainEvent::Join { username } => self.on_join(username),
            DomainEvent::Leave { username } => self.on_leave(username),
            DomainEvent::Chat {
                chat_name,
                text,
                is_friend,
            } => self.on_chat(chat_name, text, *is_friend),
            DomainEvent::System { title, text } => {
                self.on_system(title, text);
            }
            DomainEvent::Info { title, text } => self.on_info(title, text),
            DomainEvent::Disposing => self.on_disposing(),
        }
    }
}
