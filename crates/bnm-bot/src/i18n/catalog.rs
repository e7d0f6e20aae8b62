//! Localized UI strings and message templates
//!
//! The catalog is plain data: one bundle per [`Language`] mapping every
//! [`MessageKey`] to its text. Template keys use MiniJinja syntax
//! (`{{ date }}`).

use super::Language;
use crate::error::{BotError, Result};
use minijinja::Environment;
use std::collections::HashMap;

/// Named strings every bundle must define
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// Greeting sent with the language selector on `/start`
    Welcome,
    /// Prompt sent with the language selector
    ChooseLanguage,
    /// Confirmation sent with the main menu after a language is picked
    LanguageSet,
    MenuToday,
    MenuYesterday,
    MenuCompare,
    MenuChangeLanguage,
    /// Template: `date`
    RatesHeader,
    /// Template: `today`, `yesterday`
    ComparisonHeader,
    /// Closing sentence of the single-day table
    Closing,
    DataUnavailable,
    /// Placeholder for a single missing value
    ValueUnavailable,
    GenericError,
}

impl MessageKey {
    pub const ALL: [MessageKey; 13] = [
        MessageKey::Welcome,
        MessageKey::ChooseLanguage,
        MessageKey::LanguageSet,
        MessageKey::MenuToday,
        MessageKey::MenuYesterday,
        MessageKey::MenuCompare,
        MessageKey::MenuChangeLanguage,
        MessageKey::RatesHeader,
        MessageKey::ComparisonHeader,
        MessageKey::Closing,
        MessageKey::DataUnavailable,
        MessageKey::ValueUnavailable,
        MessageKey::GenericError,
    ];

    /// Stable key name
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKey::Welcome => "welcome",
            MessageKey::ChooseLanguage => "choose_language",
            MessageKey::LanguageSet => "language_set",
            MessageKey::MenuToday => "menu_today",
            MessageKey::MenuYesterday => "menu_yesterday",
            MessageKey::MenuCompare => "menu_compare",
            MessageKey::MenuChangeLanguage => "menu_change_language",
            MessageKey::RatesHeader => "rates_header",
            MessageKey::ComparisonHeader => "comparison_header",
            MessageKey::Closing => "closing",
            MessageKey::DataUnavailable => "data_unavailable",
            MessageKey::ValueUnavailable => "value_unavailable",
            MessageKey::GenericError => "generic_error",
        }
    }
}

type Bundle = &'static [(MessageKey, &'static str)];

const RO: Bundle = &[
    (MessageKey::Welcome, "Salut! Alegeți limba:"),
    (MessageKey::ChooseLanguage, "Alegeți limba:"),
    (
        MessageKey::LanguageSet,
        "Limba a fost setată: Română. Alegeți o opțiune din meniu.",
    ),
    (MessageKey::MenuToday, "📊 Cursul de azi"),
    (MessageKey::MenuYesterday, "📅 Cursul de ieri"),
    (MessageKey::MenuCompare, "📈 Comparație"),
    (MessageKey::MenuChangeLanguage, "🌐 Schimbă limba"),
    (MessageKey::RatesHeader, "Curs valutar BNM, {{ date }}:"),
    (
        MessageKey::ComparisonHeader,
        "Curs valutar BNM, {{ today }} față de {{ yesterday }}:",
    ),
    (MessageKey::Closing, "Să aveți o zi productivă în continuare!"),
    (
        MessageKey::DataUnavailable,
        "Datele nu sunt disponibile momentan. Încercați mai târziu.",
    ),
    (MessageKey::ValueUnavailable, "n/d"),
    (MessageKey::GenericError, "A apărut o eroare. Încercați din nou."),
];

const RU: Bundle = &[
    (MessageKey::Welcome, "Привет! Выберите язык:"),
    (MessageKey::ChooseLanguage, "Выберите язык:"),
    (
        MessageKey::LanguageSet,
        "Язык установлен: Русский. Выберите пункт меню.",
    ),
    (MessageKey::MenuToday, "📊 Курс на сегодня"),
    (MessageKey::MenuYesterday, "📅 Курс на вчера"),
    (MessageKey::MenuCompare, "📈 Сравнение"),
    (MessageKey::MenuChangeLanguage, "🌐 Сменить язык"),
    (MessageKey::RatesHeader, "Официальный курс НБМ, {{ date }}:"),
    (
        MessageKey::ComparisonHeader,
        "Курс НБМ, {{ today }} по сравнению с {{ yesterday }}:",
    ),
    (MessageKey::Closing, "Хорошего и продуктивного дня!"),
    (
        MessageKey::DataUnavailable,
        "Данные сейчас недоступны. Попробуйте позже.",
    ),
    (MessageKey::ValueUnavailable, "н/д"),
    (MessageKey::GenericError, "Произошла ошибка. Попробуйте ещё раз."),
];

const EN: Bundle = &[
    (MessageKey::Welcome, "Hello! Choose your language:"),
    (MessageKey::ChooseLanguage, "Choose your language:"),
    (
        MessageKey::LanguageSet,
        "Language set: English. Choose an option from the menu.",
    ),
    (MessageKey::MenuToday, "📊 Today's rates"),
    (MessageKey::MenuYesterday, "📅 Yesterday's rates"),
    (MessageKey::MenuCompare, "📈 Comparison"),
    (MessageKey::MenuChangeLanguage, "🌐 Change language"),
    (MessageKey::RatesHeader, "BNM exchange rates, {{ date }}:"),
    (
        MessageKey::ComparisonHeader,
        "BNM exchange rates, {{ today }} vs {{ yesterday }}:",
    ),
    (MessageKey::Closing, "Have a productive day!"),
    (
        MessageKey::DataUnavailable,
        "Data is currently unavailable. Please try again later.",
    ),
    (MessageKey::ValueUnavailable, "n/a"),
    (MessageKey::GenericError, "Something went wrong. Please try again."),
];

fn builtin_bundle(lang: Language) -> Bundle {
    match lang {
        Language::Ro => RO,
        Language::Ru => RU,
        Language::En => EN,
    }
}

/// Immutable store of every localized string
pub struct Catalog {
    entries: HashMap<(Language, MessageKey), String>,
    env: Environment<'static>,
}

impl Catalog {
    /// Catalog with the bundled Romanian, Russian and English texts
    pub fn builtin() -> Result<Self> {
        Self::from_bundles(Language::ALL.iter().map(|&lang| (lang, builtin_bundle(lang))))
    }

    /// Build and validate a catalog
    ///
    /// Fails when a language lacks a key or a template does not parse.
    pub fn from_bundles<'a, I>(bundles: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Language, &'a [(MessageKey, &'a str)])>,
    {
        let env = Environment::new();
        let mut entries = HashMap::new();

        for (lang, bundle) in bundles {
            for (key, text) in bundle {
                env.render_str(text, ()).map_err(|e| BotError::Template {
                    key: format!("{lang}.{}", key.as_str()),
                    detail: e.to_string(),
                })?;
                entries.insert((lang, *key), (*text).to_string());
            }
        }

        for lang in Language::ALL {
            for key in MessageKey::ALL {
                if !entries.contains_key(&(lang, key)) {
                    return Err(BotError::Config(format!(
                        "missing translation {lang}.{}",
                        key.as_str()
                    )));
                }
            }
        }

        Ok(Self { entries, env })
    }

    /// Raw text of a key
    ///
    /// Construction rejects incomplete bundles, so every pair is present.
    pub fn get(&self, lang: Language, key: MessageKey) -> &str {
        match self.entries.get(&(lang, key)) {
            Some(text) => text,
            None => unreachable!(
                "translation {lang}.{} missing from a validated catalog",
                key.as_str()
            ),
        }
    }

    /// Render a template key with the given variables
    pub fn render(
        &self,
        lang: Language,
        key: MessageKey,
        vars: &serde_json::Value,
    ) -> Result<String> {
        let value = minijinja::Value::from_serialize(vars);
        self.env
            .render_str(self.get(lang, key), value)
            .map_err(|e| BotError::Template {
                key: format!("{lang}.{}", key.as_str()),
                detail: e.to_string(),
            })
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("entries", &self.entries.len())
            .finish()
    }
}
