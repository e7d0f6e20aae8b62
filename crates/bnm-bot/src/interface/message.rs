//! Message types exchanged with the chat platform

use crate::interface::session::UserId;
use serde::{Deserialize, Serialize};

/// Platform chat identifier
pub type ChatId = i64;

/// Message received from a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub user_id: UserId,
    pub chat_id: ChatId,
    /// `None` for stickers, photos and other non-text payloads
    pub text: Option<String>,
}

impl InboundMessage {
    pub fn text(user_id: UserId, chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            user_id,
            chat_id,
            text: Some(text.into()),
        }
    }

    pub fn non_text(user_id: UserId, chat_id: ChatId) -> Self {
        Self {
            user_id,
            chat_id,
            text: None,
        }
    }
}

/// Reply keyboard: rows of literal button labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    pub rows: Vec<Vec<String>>,
}

impl Keyboard {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Every label, row by row
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(String::as_str)
    }
}

/// Message to deliver to a chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl OutboundMessage {
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_builder() {
        let keyboard = Keyboard::new(vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string()]]);
        let msg = OutboundMessage::text(10, "hi").with_keyboard(keyboard);

        assert_eq!(msg.chat_id, 10);
        let labels: Vec<&str> = msg.keyboard.as_ref().unwrap().labels().collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_inbound_constructors() {
        assert_eq!(InboundMessage::text(1, 2, "/start").text.as_deref(), Some("/start"));
        assert_eq!(InboundMessage::non_text(1, 2).text, None);
    }
}
