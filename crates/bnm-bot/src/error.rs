//! Error types for the rates bot

use thiserror::Error;

/// Rates bot specific errors
#[derive(Debug, Error)]
pub enum BotError {
    /// Rate document could not be retrieved
    #[error("Upstream fetch failed for {date}: {reason}")]
    UpstreamFetch { date: String, reason: String },

    /// Rate document could not be parsed
    #[error("Upstream document for {date} is malformed: {reason}")]
    UpstreamParse { date: String, reason: String },

    /// Message template failed to render
    #[error("Template error for '{key}': {detail}")]
    Template { key: String, detail: String },

    /// Chat platform API failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The platform refused delivery to one chat (blocked bot, bad chat id)
    #[error("Delivery rejected: {0}")]
    Rejected(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unexpected failure while handling one inbound message
    #[error("Handler error: {0}")]
    Handler(String),
}

impl BotError {
    /// Whether the error comes from the chat platform and requires a listener restart
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Network(_) | Self::Json(_))
    }
}

impl From<bnm_utils::EnvError> for BotError {
    fn from(err: bnm_utils::EnvError) -> Self {
        BotError::Config(err.to_string())
    }
}

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BotError::UpstreamFetch {
            date: "18.10.2026".to_string(),
            reason: "HTTP 503".to_string(),
        };
        assert_eq!(err.to_string(), "Upstream fetch failed for 18.10.2026: HTTP 503");

        let err = BotError::Config("TELEGRAM_BOT_TOKEN not set".to_string());
        assert_eq!(err.to_string(), "Configuration error: TELEGRAM_BOT_TOKEN not set");
    }

    #[test]
    fn test_error_conversion() {
        let env_err = bnm_utils::EnvError::Missing("TELEGRAM_BOT_TOKEN".to_string());
        let err: BotError = env_err.into();

        match err {
            BotError::Config(msg) => assert!(msg.contains("TELEGRAM_BOT_TOKEN")),
            _ => panic!("Expected Config variant"),
        }
    }

    #[test]
    fn test_transport_classification() {
        assert!(BotError::Transport("409 Conflict".to_string()).is_transport());
        assert!(!BotError::Handler("boom".to_string()).is_transport());
        assert!(!BotError::Rejected("sendMessage: Forbidden".to_string()).is_transport());
    }
}
