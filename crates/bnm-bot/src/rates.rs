//! Currency table and rate snapshots

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies relayed by the bot, in display order
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CurrencyCode {
    EUR,
    USD,
    UAH,
    RON,
    RUB,
}

impl CurrencyCode {
    /// Every configured currency in table order
    pub const ALL: [CurrencyCode; 5] = [
        CurrencyCode::EUR,
        CurrencyCode::USD,
        CurrencyCode::UAH,
        CurrencyCode::RON,
        CurrencyCode::RUB,
    ];

    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Self::EUR => "EUR",
            Self::USD => "USD",
            Self::UAH => "UAH",
            Self::RON => "RON",
            Self::RUB => "RUB",
        }
    }

    /// `Valute/@ID` of this currency in the BNM document
    pub fn upstream_id(&self) -> &'static str {
        match self {
            Self::EUR => "47",
            Self::USD => "44",
            Self::UAH => "53",
            Self::RON => "49",
            Self::RUB => "51",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Rates published for one business date
///
/// Every configured currency has an entry; `None` marks a value missing
/// from the upstream document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatesSnapshot {
    date: NaiveDate,
    values: Vec<(CurrencyCode, Option<String>)>,
}

impl RatesSnapshot {
    /// Build a snapshot by asking `lookup` for each configured currency
    pub fn collect<F>(date: NaiveDate, mut lookup: F) -> Self
    where
        F: FnMut(CurrencyCode) -> Option<String>,
    {
        let values = CurrencyCode::ALL
            .iter()
            .map(|&code| {
                let value = lookup(code)
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty());
                (code, value)
            })
            .collect();
        Self { date, values }
    }

    /// Business date the snapshot represents
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Value text for a currency
    pub fn get(&self, code: CurrencyCode) -> Option<&str> {
        self.values
            .iter()
            .find(|(c, _)| *c == code)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Entries in table order
    pub fn iter(&self) -> impl Iterator<Item = (CurrencyCode, Option<&str>)> {
        self.values.iter().map(|(c, v)| (*c, v.as_deref()))
    }

    /// Currencies with no value
    pub fn missing(&self) -> Vec<CurrencyCode> {
        self.values
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(c, _)| *c)
            .collect()
    }
}

/// Outcome of a rate lookup as seen by the formatter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatesLookup {
    Available(RatesSnapshot),
    Unavailable,
}

impl RatesLookup {
    pub fn snapshot(&self) -> Option<&RatesSnapshot> {
        match self {
            Self::Available(snapshot) => Some(snapshot),
            Self::Unavailable => None,
        }
    }
}

impl From<RatesSnapshot> for RatesLookup {
    fn from(snapshot: RatesSnapshot) -> Self {
        Self::Available(snapshot)
    }
}
