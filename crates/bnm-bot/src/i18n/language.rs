//! Supported chat languages

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language a user has selected
///
/// The set is closed: adding a language means adding a variant here and a
/// bundle in the catalog.
///
/// # Examples
///
/// ```
/// use bnm_bot::Language;
///
/// assert_eq!(Language::default(), Language::Ro);
/// assert_eq!(Language::from_code("RU"), Some(Language::Ru));
/// assert_eq!(Language::from_code("de"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Romanian
    #[default]
    Ro,
    /// Russian
    Ru,
    /// English
    En,
}

impl Language {
    /// Every supported language, in the order shown on the selector keyboard
    pub const ALL: [Language; 3] = [Language::Ro, Language::Ru, Language::En];

    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Language::Ro => "ro",
            Language::Ru => "ru",
            Language::En => "en",
        }
    }

    /// Native language name
    pub fn name(&self) -> &'static str {
        match self {
            Language::Ro => "Română",
            Language::Ru => "Русский",
            Language::En => "English",
        }
    }

    /// Button label on the language selector
    pub fn choice_label(&self) -> String {
        let flag = match self {
            Language::Ro => "🇲🇩",
            Language::Ru => "🇷🇺",
            Language::En => "🇬🇧",
        };
        format!("{flag} {}", self.name())
    }

    /// Parse from ISO 639-1 code or English name
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ro" | "romanian" => Some(Language::Ro),
            "ru" | "russian" => Some(Language::Ru),
            "en" | "english" => Some(Language::En),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
