//! Telegram Bot API transport
//!
//! Long-polls `getUpdates` and answers with `sendMessage`. Only the handful
//! of fields the bot needs are deserialized.
//!
//! The update offset lives in an [`UpdateCursor`] shared by every client the
//! supervisor builds, so a restarted listener never sees an update twice.

use crate::error::{BotError, Result};
use crate::interface::{InboundMessage, Keyboard, OutboundMessage};
use crate::platforms::ChatTransport;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Telegram bot configuration
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot token from BotFather
    pub token: String,

    /// API root, overridable for local Bot API servers
    pub api_url: String,

    /// Long-poll timeout
    pub poll_timeout: Duration,
}

impl TelegramConfig {
    pub fn new(token: impl Into<String>, poll_timeout: Duration) -> Self {
        Self {
            token: token.into(),
            api_url: TELEGRAM_API_URL.to_string(),
            poll_timeout,
        }
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("api_url", &self.api_url)
            .field("poll_timeout", &self.poll_timeout)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<TgMessage>,
}

#[derive(Debug, Deserialize)]
struct TgMessage {
    chat: TgChat,
    from: Option<TgUser>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TgChat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct TgUser {
    id: i64,
}

#[derive(Debug, Serialize)]
struct BotCommand<'a> {
    command: &'a str,
    description: &'a str,
}

/// Next `getUpdates` offset, shared across client restarts
#[derive(Debug, Clone, Default)]
pub struct UpdateCursor(Arc<AtomicI64>);

impl UpdateCursor {
    /// Offset to request next
    pub fn get(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }

    /// Move forward to `next`; never moves back
    pub fn advance_to(&self, next: i64) {
        self.0.fetch_max(next, Ordering::SeqCst);
    }
}

/// Map a failed API call to an error
///
/// 400 and 403 concern a single chat (blocked bot, unknown chat) and are
/// reported as [`BotError::Rejected`]; everything else is a transport fault.
fn api_error(method: &str, status: StatusCode, description: Option<String>) -> BotError {
    let detail = format!(
        "{method}: {}",
        description.unwrap_or_else(|| format!("HTTP {status}"))
    );
    match status {
        StatusCode::BAD_REQUEST | StatusCode::FORBIDDEN => BotError::Rejected(detail),
        _ => BotError::Transport(detail),
    }
}

/// Reply keyboard markup for `sendMessage`
pub fn keyboard_markup(keyboard: &Keyboard) -> Value {
    let rows: Vec<Vec<Value>> = keyboard
        .rows
        .iter()
        .map(|row| row.iter().map(|label| json!({ "text": label })).collect())
        .collect();

    json!({
        "keyboard": rows,
        "resize_keyboard": true,
    })
}

/// Body of a `sendMessage` call
pub fn send_message_body(message: &OutboundMessage) -> Value {
    let mut body = json!({
        "chat_id": message.chat_id,
        "text": message.text,
    });
    if let Some(keyboard) = &message.keyboard {
        body["reply_markup"] = keyboard_markup(keyboard);
    }
    body
}

/// Convert updates to inbound messages; returns the next offset to request
fn convert_updates(updates: Vec<Update>, offset: i64) -> (Vec<InboundMessage>, i64) {
    let mut next = offset;
    let mut messages = Vec::with_capacity(updates.len());

    for update in updates {
        next = next.max(update.update_id + 1);
        let Some(message) = update.message else {
            continue;
        };
        let user_id = message.from.map_or(message.chat.id, |u| u.id);
        messages.push(InboundMessage {
            user_id,
            chat_id: message.chat.id,
            text: message.text,
        });
    }

    (messages, next)
}

/// Telegram Bot API client
pub struct TelegramClient {
    client: Client,
    config: TelegramConfig,
    cursor: UpdateCursor,
}

impl TelegramClient {
    /// Create a new Telegram client with its own cursor
    pub fn new(config: TelegramConfig) -> Result<Self> {
        Self::with_cursor(config, UpdateCursor::default())
    }

    /// Create a client continuing from an existing cursor
    pub fn with_cursor(config: TelegramConfig, cursor: UpdateCursor) -> Result<Self> {
        // Leave headroom over the long-poll timeout
        let client = Client::builder()
            .timeout(config.poll_timeout + Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            config,
            cursor,
        })
    }

    /// Offset the next `getUpdates` will request
    pub fn offset(&self) -> i64 {
        self.cursor.get()
    }

    /// Acknowledge a batch before it is handled and convert it
    fn accept(&self, updates: Vec<Update>) -> Vec<InboundMessage> {
        let (messages, next) = convert_updates(updates, self.cursor.get());
        self.cursor.advance_to(next);
        messages
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.config.api_url, self.config.token, method)
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: &Value) -> Result<T> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| BotError::Transport(format!("{method}: {}", e.without_url())))?;

        let status = response.status();
        let parsed: ApiResponse<T> = response.json().await.map_err(|e| {
            BotError::Transport(format!("{method}: HTTP {status}: {}", e.without_url()))
        })?;

        if !parsed.ok {
            return Err(api_error(method, status, parsed.description));
        }

        parsed
            .result
            .ok_or_else(|| BotError::Transport(format!("{method}: empty result")))
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn receive(&mut self) -> Result<Vec<InboundMessage>> {
        let body = json!({
            "offset": self.cursor.get(),
            "timeout": self.config.poll_timeout.as_secs(),
            "allowed_updates": ["message"],
        });

        let updates: Vec<Update> = self.call("getUpdates", &body).await?;
        Ok(self.accept(updates))
    }

    async fn send(&self, message: &OutboundMessage) -> Result<()> {
        let _: Value = self.call("sendMessage", &send_message_body(message)).await?;
        Ok(())
    }

    async fn register_commands(&self, commands: &[(&str, &str)]) -> Result<()> {
        let commands: Vec<BotCommand<'_>> = commands
            .iter()
            .map(|&(command, description)| BotCommand {
                command,
                description,
            })
            .collect();

        let _: bool = self
            .call("setMyCommands", &json!({ "commands": commands }))
            .await?;
        Ok(())
    }
}
