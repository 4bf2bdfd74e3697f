use crate::models::{Message, MessageRole};

/// Colour scheme of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Class applied to the application root.
    pub fn root_class(&self) -> &'static str {
        match self {
            Theme::Dark => "theme-dark",
            Theme::Light => "theme-light",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Start,
    End,
}

/// Everything needed to draw one message bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub row_class: &'static str,
    pub bubble_class: &'static str,
    pub avatar: &'static str,
    pub align: Alignment,
    pub text: String,
}

impl MessageView {
    pub fn render(message: &Message, theme: Theme) -> Self {
        let (row_class, avatar, align) = match message.role {
            MessageRole::User => ("message user", "U", Alignment::End),
            MessageRole::Bot => ("message bot", "A", Alignment::Start),
        };
        let bubble_class = match (message.role, theme) {
            (MessageRole::User, Theme::Dark) => "bubble bubble-user bubble-dark",
            (MessageRole::User, Theme::Light) => "bubble bubble-user bubble-light",
            (MessageRole::Bot, Theme::Dark) => "bubble bubble-bot bubble-dark",
            (MessageRole::Bot, Theme::Light) => "bubble bubble-bot bubble-light",
        };

        Self {
            row_class,
            bubble_class,
            avatar,
            align,
            text: message.text.clone(),
        }
    }
}
