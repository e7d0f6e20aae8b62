//! Telegram bot for the official exchange rates of the National Bank of Moldova
//!
//! The bot fetches the daily BNM XML rates document, extracts a fixed set of
//! currencies and replies in Romanian, Russian or English. It provides:
//!
//! - Today's and the previous business day's rates
//! - A day-over-day comparison with trend markers
//! - Per-user language selection kept in memory
//!
//! # Architecture
//!
//! - [`api::bnm`]: upstream rates source behind the [`RateSource`] trait
//! - [`calendar`]: business-date resolution (weekends roll back to Friday)
//! - [`i18n`]: languages and the localized string catalog
//! - [`interface`]: messages, sessions and the rate formatter
//! - [`bot`]: routing of inbound text to actions, plus the restart supervisor
//! - [`platforms`]: chat transports, currently Telegram
//! - [`health`]: counters and the periodic health logger
//!
//! # Example
//!
//! ```rust,ignore
//! use bnm_bot::{BnmClient, BotConfig, Catalog, HealthCounters, RatesBot, SystemClock};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BotConfig::from_env()?;
//!     let source = Arc::new(BnmClient::new(&config.bnm_base_url, config.request_timeout)?);
//!     let mut bot = RatesBot::new(
//!         source,
//!         Arc::new(SystemClock),
//!         Arc::new(Catalog::builtin()?),
//!         Arc::new(HealthCounters::new()),
//!     )?;
//!
//!     let reply = bot.handle(&bnm_bot::InboundMessage::text(1, 1, "/compare")).await;
//!     println!("{reply:?}");
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod bot;
pub mod calendar;
pub mod config;
pub mod error;
pub mod health;
pub mod i18n;
pub mod interface;
pub mod platforms;
pub mod rates;

// Re-export main types for convenience
pub use api::{BnmClient, RateSource};
pub use bot::{Action, CommandTable, Listener, RatesBot, run_forever};
pub use calendar::{Clock, FixedClock, SystemClock};
pub use config::BotConfig;
pub use error::{BotError, Result};
pub use health::{HealthCounters, HealthMonitor, HealthSnapshot};
pub use i18n::{Catalog, Language, MessageKey};
pub use interface::{InboundMessage, Keyboard, MessageFormatter, OutboundMessage, SessionStore};
pub use platforms::{ChatTransport, TelegramClient, TelegramConfig, UpdateCursor};
pub use rates::{CurrencyCode, RatesLookup, RatesSnapshot};
