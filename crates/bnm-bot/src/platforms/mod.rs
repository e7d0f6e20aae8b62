//! Chat platform adapters

pub mod telegram;

use crate::error::Result;
use crate::interface::{InboundMessage, OutboundMessage};
use async_trait::async_trait;

pub use telegram::{TelegramClient, TelegramConfig, UpdateCursor};

/// Delivery channel between the bot and its users
///
/// Errors returned here are transport faults: the listener is torn down and
/// restarted. The exception is [`BotError::Rejected`] from `send`, which
/// concerns one chat only and is skipped.
///
/// [`BotError::Rejected`]: crate::error::BotError::Rejected
#[async_trait]
pub trait ChatTransport: Send {
    /// Wait for the next batch of inbound messages, in arrival order
    async fn receive(&mut self) -> Result<Vec<InboundMessage>>;

    /// Deliver one message
    async fn send(&self, message: &OutboundMessage) -> Result<()>;

    /// Advertise slash commands in the platform's menu (optional)
    async fn register_commands(&self, _commands: &[(&str, &str)]) -> Result<()> {
        Ok(())
    }
}
