//! Rate message rendering

use crate::error::Result;
use crate::i18n::{Catalog, Language, MessageKey};
use crate::rates::RatesLookup;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;

/// Currency every rate is quoted against
pub const QUOTE_CURRENCY: &str = "MDL";

/// Decimal places kept in a day-over-day difference
pub const DIFFERENCE_SCALE: u32 = 4;

/// Direction of a rate between two business days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Equal,
}

impl Trend {
    pub fn of(difference: Decimal) -> Self {
        if difference.is_zero() {
            Self::Equal
        } else if difference.is_sign_positive() {
            Self::Up
        } else {
            Self::Down
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Self::Up => "⬆️",
            Self::Down => "⬇️",
            Self::Equal => "➡️",
        }
    }
}

/// Numeric value of a rate text; missing or unparsable text counts as zero
pub fn parse_rate(text: Option<&str>) -> Decimal {
    text.map(|t| t.trim().replace(',', "."))
        .and_then(|t| Decimal::from_str(&t).ok())
        .unwrap_or(Decimal::ZERO)
}

/// `today - yesterday` rounded to four places, midpoint away from zero
pub fn difference(today: Decimal, yesterday: Decimal) -> Decimal {
    let rounded = (today - yesterday)
        .round_dp_with_strategy(DIFFERENCE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

/// Difference text with exactly four decimal places
pub fn format_difference(difference: Decimal) -> String {
    format!("{difference:.4}")
}

/// Turns rate lookups into localized chat text
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    catalog: Arc<Catalog>,
}

impl MessageFormatter {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Single-day rates table
    pub fn format_single(
        &self,
        lookup: &RatesLookup,
        date_text: &str,
        lang: Language,
    ) -> Result<String> {
        let Some(snapshot) = lookup.snapshot() else {
            return Ok(self.unavailable(lang));
        };

        let mut lines = vec![self.catalog.render(
            lang,
            MessageKey::RatesHeader,
            &json!({ "date": date_text }),
        )?];

        for (code, value) in snapshot.iter() {
            let value = value.unwrap_or_else(|| self.placeholder(lang));
            lines.push(format!("{code}: {value} {QUOTE_CURRENCY}"));
        }

        lines.push(self.catalog.get(lang, MessageKey::Closing).to_string());
        Ok(lines.join("\n"))
    }

    /// Two-day comparison with trend markers
    ///
    /// Either side being unavailable yields the unavailable text alone.
    pub fn format_comparison(
        &self,
        today: &RatesLookup,
        yesterday: &RatesLookup,
        today_text: &str,
        yesterday_text: &str,
        lang: Language,
    ) -> Result<String> {
        let (Some(today), Some(yesterday)) = (today.snapshot(), yesterday.snapshot()) else {
            return Ok(self.unavailable(lang));
        };

        let mut lines = vec![self.catalog.render(
            lang,
            MessageKey::ComparisonHeader,
            &json!({ "today": today_text, "yesterday": yesterday_text }),
        )?];

        for (code, today_value) in today.iter() {
            let diff = difference(parse_rate(today_value), parse_rate(yesterday.get(code)));
            let shown = today_value.unwrap_or_else(|| self.placeholder(lang));
            lines.push(format!(
                "{code}: {shown} {QUOTE_CURRENCY} {} ({})",
                Trend::of(diff).marker(),
                format_difference(diff)
            ));
        }

        Ok(lines.join("\n"))
    }

    fn unavailable(&self, lang: Language) -> String {
        self.catalog.get(lang, MessageKey::DataUnavailable).to_string()
    }

    fn placeholder(&self, lang: Language) -> &str {
        self.catalog.get(lang, MessageKey::ValueUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::{CurrencyCode, RatesSnapshot};
    use chrono::NaiveDate;

    fn formatter() -> MessageFormatter {
        MessageFormatter::new(Arc::new(Catalog::builtin().unwrap()))
    }

    fn snapshot(values: &[(CurrencyCode, &str)]) -> RatesLookup {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        RatesSnapshot::collect(date, |code| {
            values
                .iter()
                .find(|(c, _)| *c == code)
                .map(|(_, v)| (*v).to_string())
        })
        .into()
    }

    fn full() -> RatesLookup {
        snapshot(&[
            (CurrencyCode::EUR, "19.6470"),
            (CurrencyCode::USD, "16.8934"),
            (CurrencyCode::UAH, "0.4071"),
            (CurrencyCode::RON, "3.8651"),
            (CurrencyCode::RUB, "0.2087"),
        ])
    }

    fn uniform(value: &str) -> RatesLookup {
        let values: Vec<(CurrencyCode, &str)> =
            CurrencyCode::ALL.iter().map(|&c| (c, value)).collect();
        snapshot(&values)
    }

    #[test]
    fn test_format_single() {
        let text = formatter()
            .format_single(&full(), "16.10.2026", Language::Ro)
            .unwrap();

        assert_eq!(
            text,
            "Curs valutar BNM, 16.10.2026:\n\
             EUR: 19.6470 MDL\n\
             USD: 16.8934 MDL\n\
             UAH: 0.4071 MDL\n\
             RON: 3.8651 MDL\n\
             RUB: 0.2087 MDL\n\
             Să aveți o zi productivă în continuare!"
        );
    }

    #[test]
    fn test_format_single_lists_every_currency_in_order() {
        let f = formatter();
        for lang in Language::ALL {
            let text = f.format_single(&full(), "16.10.2026", lang).unwrap();
            let rate_lines: Vec<&str> = text.lines().filter(|l| l.ends_with(" MDL")).collect();
            let codes: Vec<&str> = rate_lines.iter().map(|l| &l[..3]).collect();
            assert_eq!(codes, vec!["EUR", "USD", "UAH", "RON", "RUB"]);
        }
    }

    #[test]
    fn test_format_single_missing_value_uses_placeholder() {
        let lookup = snapshot(&[(CurrencyCode::EUR, "19.6470")]);
        let text = formatter()
            .format_single(&lookup, "16.10.2026", Language::En)
            .unwrap();
        assert!(text.contains("EUR: 19.6470 MDL"));
        assert!(text.contains("USD: n/a MDL"));
    }

    #[test]
    fn test_format_single_unavailable() {
        let f = formatter();
        for lang in Language::ALL {
            let text = f
                .format_single(&RatesLookup::Unavailable, "16.10.2026", lang)
                .unwrap();
            assert_eq!(text, f.catalog().get(lang, MessageKey::DataUnavailable));
        }
    }

    #[test]
    fn test_trend_up() {
        let text = formatter()
            .format_comparison(&uniform("10.5"), &uniform("10.2"), "19.10.2026", "16.10.2026", Language::En)
            .unwrap();
        assert!(text.starts_with("BNM exchange rates, 19.10.2026 vs 16.10.2026:"));
        assert!(text.contains("EUR: 10.5 MDL ⬆️ (0.3000)"));
    }

    #[test]
    fn test_trend_down() {
        let text = formatter()
            .format_comparison(&uniform("10.0"), &uniform("10.5"), "a", "b", Language::En)
            .unwrap();
        assert!(text.contains("USD: 10.0 MDL ⬇️ (-0.5000)"));
    }

    #[test]
    fn test_trend_equal() {
        let text = formatter()
            .format_comparison(&uniform("10.0"), &uniform("10.0"), "a", "b", Language::Ru)
            .unwrap();
        assert!(text.contains("RUB: 10.0 MDL ➡️ (0.0000)"));
    }

    #[test]
    fn test_comparison_line_count() {
        let text = formatter()
            .format_comparison(&full(), &full(), "a", "b", Language::Ro)
            .unwrap();
        assert_eq!(text.lines().count(), 1 + CurrencyCode::ALL.len());
    }

    #[test]
    fn test_comparison_missing_value_counts_as_zero() {
        let today = snapshot(&[(CurrencyCode::EUR, "19.5")]);
        let text = formatter()
            .format_comparison(&today, &uniform("1.25"), "a", "b", Language::En)
            .unwrap();
        assert!(text.contains("EUR: 19.5 MDL ⬆️ (18.2500)"));
        assert!(text.contains("USD: n/a MDL ⬇️ (-1.2500)"));
    }

    #[test]
    fn test_comparison_unavailable_either_side() {
        let f = formatter();
        for lang in Language::ALL {
            let expected = f.catalog().get(lang, MessageKey::DataUnavailable);
            let cases = [
                (RatesLookup::Unavailable, full()),
                (full(), RatesLookup::Unavailable),
                (RatesLookup::Unavailable, RatesLookup::Unavailable),
            ];
            for (today, yesterday) in cases {
                let text = f.format_comparison(&today, &yesterday, "a", "b", lang).unwrap();
                assert_eq!(text, expected);
            }
        }
    }

    #[test]
    fn test_difference_rounding() {
        let d = difference(Decimal::from_str("19.64705").unwrap(), Decimal::ZERO);
        assert_eq!(format_difference(d), "19.6471");

        let d = difference(Decimal::from_str("1.00004").unwrap(), Decimal::ONE);
        assert_eq!(Trend::of(d), Trend::Equal);
        assert_eq!(format_difference(d), "0.0000");

        let d = difference(Decimal::ONE, Decimal::from_str("1.00004").unwrap());
        assert_eq!(format_difference(d), "0.0000");
    }

    #[test]
    fn test_parse_rate_is_permissive() {
        assert_eq!(parse_rate(Some(" 19.6470 ")), Decimal::from_str("19.6470").unwrap());
        assert_eq!(parse_rate(Some("0,4071")), Decimal::from_str("0.4071").unwrap());
        assert_eq!(parse_rate(Some("n/a")), Decimal::ZERO);
        assert_eq!(parse_rate(None), Decimal::ZERO);
    }
}
