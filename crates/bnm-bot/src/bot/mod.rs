//! Conversation routing for the rates bot
//!
//! [`RatesBot`] turns one inbound message into at most one reply. It owns the
//! session store and is driven by a single task, one message at a time.
//!
//! # Example
//!
//! ```rust,ignore
//! use bnm_bot::{BnmClient, Catalog, HealthCounters, RatesBot, SystemClock};
//! use std::sync::Arc;
//!
//! let source = Arc::new(BnmClient::new(bnm_bot::api::bnm::BNM_BASE_URL, timeout)?);
//! let mut bot = RatesBot::new(
//!     source,
//!     Arc::new(SystemClock),
//!     Arc::new(Catalog::builtin()?),
//!     Arc::new(HealthCounters::new()),
//! )?;
//!
//! if let Some(reply) = bot.handle(&InboundMessage::text(1, 1, "/get_rates")).await {
//!     println!("{}", reply.text);
//! }
//! ```

pub mod commands;
pub mod runner;

use crate::api::RateSource;
use crate::calendar::{self, Clock};
use crate::error::{BotError, Result};
use crate::health::HealthCounters;
use crate::i18n::{Catalog, Language, MessageKey};
use crate::interface::{
    ChatId, InboundMessage, Keyboard, MessageFormatter, OutboundMessage, SessionStore, UserId,
};
use crate::rates::RatesLookup;
use chrono::NaiveDate;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

pub use commands::{Action, CommandTable, MENU_COMMANDS};
pub use runner::{Listener, run_forever};

/// Rates bot: routing, sessions and rendering
pub struct RatesBot {
    source: Arc<dyn RateSource>,
    clock: Arc<dyn Clock>,
    formatter: MessageFormatter,
    commands: CommandTable,
    sessions: SessionStore,
    counters: Arc<HealthCounters>,
}

impl RatesBot {
    /// Create a bot; builds the combined label table from `catalog`
    pub fn new(
        source: Arc<dyn RateSource>,
        clock: Arc<dyn Clock>,
        catalog: Arc<Catalog>,
        counters: Arc<HealthCounters>,
    ) -> Result<Self> {
        let commands = CommandTable::build(&catalog)?;
        Ok(Self {
            source,
            clock,
            formatter: MessageFormatter::new(catalog),
            commands,
            sessions: SessionStore::new(),
            counters,
        })
    }

    /// Session store, read-only
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Counters shared with the health monitor
    pub fn counters(&self) -> &HealthCounters {
        &self.counters
    }

    fn catalog(&self) -> &Catalog {
        self.formatter.catalog()
    }

    /// Handle one inbound message
    ///
    /// Never fails: an error or panic while handling is logged and answered
    /// with the localized generic error.
    pub async fn handle(&mut self, message: &InboundMessage) -> Option<OutboundMessage> {
        self.counters.record_message();
        self.sessions.get_or_create(message.user_id);

        let outcome = AssertUnwindSafe(self.dispatch(message))
            .catch_unwind()
            .await;

        let fault = match outcome {
            Ok(Ok(reply)) => return reply,
            Ok(Err(e)) => e,
            Err(panic) => BotError::Handler(panic_message(&*panic)),
        };

        self.counters.record_handler_error();
        tracing::error!(
            user_id = message.user_id,
            chat_id = message.chat_id,
            error = %fault,
            "Failed to handle message"
        );

        let lang = self.sessions.language(message.user_id).unwrap_or_default();
        Some(OutboundMessage::text(
            message.chat_id,
            self.catalog().get(lang, MessageKey::GenericError),
        ))
    }

    async fn dispatch(&mut self, message: &InboundMessage) -> Result<Option<OutboundMessage>> {
        let Some(text) = message.text.as_deref() else {
            tracing::debug!(user_id = message.user_id, "Ignoring non-text message");
            return Ok(None);
        };

        let Some(action) = self.commands.resolve(text) else {
            tracing::debug!(user_id = message.user_id, "Ignoring unrecognized text");
            return Ok(None);
        };

        self.execute(message.user_id, message.chat_id, action)
            .await
            .map(Some)
    }

    /// Perform an action for a user and build the reply
    pub async fn execute(
        &mut self,
        user_id: UserId,
        chat_id: ChatId,
        action: Action,
    ) -> Result<OutboundMessage> {
        let lang = self.sessions.get_or_create(user_id).language;
        tracing::info!(user_id, action = action.name(), lang = %lang, "Handling action");

        match action {
            Action::Start => Ok(OutboundMessage::text(
                chat_id,
                self.catalog().get(lang, MessageKey::Welcome),
            )
            .with_keyboard(language_keyboard())),
            Action::ChangeLanguage => Ok(OutboundMessage::text(
                chat_id,
                self.catalog().get(lang, MessageKey::ChooseLanguage),
            )
            .with_keyboard(language_keyboard())),
            Action::SelectLanguage(selected) => {
                self.sessions.set_language(user_id, selected);
                Ok(OutboundMessage::text(
                    chat_id,
                    self.catalog().get(selected, MessageKey::LanguageSet),
                )
                .with_keyboard(self.main_menu(selected)))
            }
            Action::TodayRates => {
                let date = calendar::resolve(self.clock.today());
                let text = self.single_day(date, lang).await?;
                Ok(OutboundMessage::text(chat_id, text))
            }
            Action::YesterdayRates => {
                let date = calendar::previous(self.clock.today());
                let text = self.single_day(date, lang).await?;
                Ok(OutboundMessage::text(chat_id, text))
            }
            Action::Compare => {
                let today = self.clock.today();
                let (current, previous) = (calendar::resolve(today), calendar::previous(today));

                // Each side is fetched on its own, one after the other
                let current_rates = self.lookup(current).await;
                let previous_rates = self.lookup(previous).await;

                let text = self.formatter.format_comparison(
                    &current_rates,
                    &previous_rates,
                    &calendar::format_date(current),
                    &calendar::format_date(previous),
                    lang,
                )?;
                Ok(OutboundMessage::text(chat_id, text))
            }
        }
    }

    async fn single_day(&self, date: NaiveDate, lang: Language) -> Result<String> {
        let rates = self.lookup(date).await;
        self.formatter
            .format_single(&rates, &calendar::format_date(date), lang)
    }

    /// Fetch rates, degrading any upstream failure to `Unavailable`
    async fn lookup(&self, date: NaiveDate) -> RatesLookup {
        match self.source.fetch(date).await {
            Ok(snapshot) => RatesLookup::Available(snapshot),
            Err(e) => {
                tracing::warn!(date = %date, error = %e, "Rates unavailable");
                RatesLookup::Unavailable
            }
        }
    }

    /// Main menu keyboard in `lang`: two rows of two buttons
    pub fn main_menu(&self, lang: Language) -> Keyboard {
        let label = |key| self.catalog().get(lang, key).to_string();
        Keyboard::new(vec![
            vec![label(MessageKey::MenuToday), label(MessageKey::MenuYesterday)],
            vec![
                label(MessageKey::MenuCompare),
                label(MessageKey::MenuChangeLanguage),
            ],
        ])
    }
}

/// Language selector keyboard: one language per row
pub fn language_keyboard() -> Keyboard {
    Keyboard::new(
        Language::ALL
            .iter()
            .map(|lang| vec![lang.choice_label()])
            .collect(),
    )
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panic: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panic: {s}")
    } else {
        "panic".to_string()
    }
}
