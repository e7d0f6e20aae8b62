//! Mapping of inbound text to bot actions
//!
//! Slash commands are language independent. Button labels are matched
//! against every language at once, so a user whose keyboard is stale
//! (e.g. the English menu while the session is Russian) is still served.

use crate::error::{BotError, Result};
use crate::i18n::{Catalog, Language, MessageKey};
use std::collections::HashMap;

/// Something the bot can do in response to a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Greet and show the language selector
    Start,
    /// Store a language and show the main menu
    SelectLanguage(Language),
    /// Show the language selector
    ChangeLanguage,
    /// Rates for today's business date
    TodayRates,
    /// Rates for the previous business date
    YesterdayRates,
    /// Today versus the previous business date
    Compare,
}

impl Action {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::SelectLanguage(_) => "select_language",
            Action::ChangeLanguage => "change_language",
            Action::TodayRates => "today_rates",
            Action::YesterdayRates => "yesterday_rates",
            Action::Compare => "compare",
        }
    }
}

/// Slash commands and their actions
pub const SLASH_COMMANDS: &[(&str, Action)] = &[
    ("start", Action::Start),
    ("language", Action::ChangeLanguage),
    ("get_rates", Action::TodayRates),
    ("today", Action::TodayRates),
    ("yesterday", Action::YesterdayRates),
    ("compare", Action::Compare),
];

/// Commands advertised in the platform's command menu
pub const MENU_COMMANDS: &[(&str, &str)] = &[
    ("start", "Alege limba / Выбрать язык / Choose language"),
    ("get_rates", "Cursul de azi / Курс на сегодня / Today's rates"),
    ("yesterday", "Cursul de ieri / Курс на вчера / Yesterday's rates"),
    ("compare", "Comparație / Сравнение / Comparison"),
    ("language", "Schimbă limba / Сменить язык / Change language"),
];

const MENU_ACTIONS: [(MessageKey, Action); 4] = [
    (MessageKey::MenuToday, Action::TodayRates),
    (MessageKey::MenuYesterday, Action::YesterdayRates),
    (MessageKey::MenuCompare, Action::Compare),
    (MessageKey::MenuChangeLanguage, Action::ChangeLanguage),
];

/// Combined lookup from literal text to action, built once at startup
#[derive(Debug, Clone)]
pub struct CommandTable {
    labels: HashMap<String, Action>,
    commands: HashMap<&'static str, Action>,
}

impl CommandTable {
    /// Collect every label of every language
    ///
    /// Fails if two labels with different actions share the same text.
    pub fn build(catalog: &Catalog) -> Result<Self> {
        let mut labels = HashMap::new();

        let language_choices = Language::ALL
            .iter()
            .map(|&lang| (lang.choice_label(), Action::SelectLanguage(lang)));
        let menu_labels = Language::ALL.iter().flat_map(|&lang| {
            MENU_ACTIONS
                .iter()
                .map(move |&(key, action)| (catalog.get(lang, key).to_string(), action))
        });

        for (label, action) in language_choices.chain(menu_labels) {
            if let Some(existing) = labels.insert(label.clone(), action) {
                if existing != action {
                    return Err(BotError::Config(format!(
                        "label '{label}' maps to both {} and {}",
                        existing.name(),
                        action.name()
                    )));
                }
            }
        }

        let commands = SLASH_COMMANDS.iter().copied().collect();
        Ok(Self { labels, commands })
    }

    /// Action for an inbound text, if any
    pub fn resolve(&self, text: &str) -> Option<Action> {
        let text = text.trim();
        if let Some(command) = text.strip_prefix('/') {
            let name = command.split_whitespace().next().unwrap_or_default();
            let name = name.split('@').next().unwrap_or_default().to_lowercase();
            return self.commands.get(name.as_str()).copied();
        }
        self.labels.get(text).copied()
    }

    /// Number of distinct label texts
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }
}
