// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::HashSet, sync::Arc};

use strum_macros::{Display, EnumString};

/// Decides whether a system message should be hidden. Called with the message's title
/// and text, returns `true` to suppress it.
pub type MessageFilter = Arc<dyn Fn(&str, &str) -> bool + Send + Sync>;

/// Families of noisy server messages that [`IgnoreRules`] knows how to recognize. These
/// are plain text heuristics, so they only fit servers that phrase things the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum IgnoredMessage {
    /// Title starts with `* system`.
    SystemMessage,
    ChangeTeamMessage,
    EditMessage,
    GodModeMessage,
    /// A system message about an effect, unless someone was kicked.
    ChangeEffectMessage,
    /// A system message saying that you kicked someone. Needs the own username.
    KickMessage,
    MuteMessage,
    /// Private messages, whose titles look like `you > bob` or `bob < you`.
    PmMessage,
    WorldMessage,
    MagicMessage,
}

impl IgnoredMessage {
    /// `title` and `text` must already be lowercase.
    fn matches(self, title: &str, text: &str, own_username: Option<&str>) -> bool {
        match self {
            IgnoredMessage::SystemMessage => title.starts_with("* system"),
            IgnoredMessage::ChangeTeamMessage => {
                text.contains("team of") || text.ends_with("already has the specified team.")
            }
            IgnoredMessage::EditMessage => text.ends_with("edit this world."),
            IgnoredMessage::GodModeMessage => text.ends_with("use god mode."),
            IgnoredMessage::ChangeEffectMessage => {
                title.contains("system") && text.contains("effect") && !text.contains("kicked")
            }
            IgnoredMessage::KickMessage => {
                title.contains("system")
                    && own_username.is_some_and(|username| {
                        text.starts_with(&format!("{} kicked", username.to_lowercase()))
                    })
            }
            IgnoredMessage::MuteMessage => {
                title.contains("system") && text.contains("is now") && text.ends_with("muted.")
            }
            IgnoredMessage::PmMessage => {
                title.contains("you") && (title.contains('<') || title.contains('>'))
            }
            IgnoredMessage::WorldMessage => title.starts_with("* world"),
            IgnoredMessage::MagicMessage => title.starts_with("* magic"),
        }
    }
}

/// A [`MessageFilter`] built from a set of [`IgnoredMessage`] kinds. A message is
/// suppressed if any selected kind matches, compared case insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreRules {
    kinds: HashSet<IgnoredMessage>,
    own_username: Option<String>,
}

impl IgnoreRules {
    pub fn new(kinds: impl IntoIterator<Item = IgnoredMessage>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
            own_username: None,
        }
    }

    /// The name this client plays under, used by [`IgnoredMessage::KickMessage`].
    #[must_use]
    pub fn with_own_username(mut self, username: impl Into<String>) -> Self {
        self.own_username = Some(username.into());
        self
    }

    #[must_use]
    pub fn should_ignore(&self, title: &str, text: &str) -> bool {
        let title = title.to_lowercase();
        let text = text.to_lowercase();
        self.kinds
            .iter()
            .any(|kind| kind.matches(&title, &text, self.own_username.as_deref()))
    }

    #[must_use]
    pub fn into_filter(self) -> MessageFilter {
        Arc::new(move |title: &str, text: &str| self.should_ignore(title, text))
    }
}
