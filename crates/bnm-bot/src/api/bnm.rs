//! National Bank of Moldova official exchange rate client
//!
//! The rates for one date are published as an XML document:
//!
//! ```xml
//! <ValCurs Date="16.10.2026" name="Official exchange rate">
//!   <Valute ID="47">
//!     <NumCode>978</NumCode>
//!     <CharCode>EUR</CharCode>
//!     <Nominal>1</Nominal>
//!     <Name>Euro</Name>
//!     <Value>19.6470</Value>
//!   </Valute>
//! </ValCurs>
//! ```
//!
//! No API key is required.

use crate::calendar::format_date;
use crate::error::{BotError, Result};
use crate::rates::RatesSnapshot;
use async_trait::async_trait;
use chrono::NaiveDate;
use quick_xml::Reader;
use quick_xml::events::Event;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Default endpoint serving the rates document
pub const BNM_BASE_URL: &str = "https://bnm.md/en/official_exchange_rates";

/// Source of official rates for a business date
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetch and parse the rates published for `date`
    ///
    /// Every call goes to the upstream; nothing is cached.
    async fn fetch(&self, date: NaiveDate) -> Result<RatesSnapshot>;
}

#[derive(Debug, Deserialize)]
struct ValCurs {
    #[serde(rename = "Valute", default)]
    valutes: Vec<Valute>,
}

#[derive(Debug, Deserialize)]
struct Valute {
    #[serde(rename = "@ID")]
    id: String,
    #[serde(rename = "Value", default)]
    value: Option<String>,
}

/// Extract the configured currencies from a rates document
///
/// A currency whose node is missing or empty is left unavailable; only a
/// malformed document, or one whose root is not a dated `ValCurs`, fails the
/// whole snapshot.
pub fn parse_document(date: NaiveDate, body: &str) -> Result<RatesSnapshot> {
    let parse_error = |reason: String| BotError::UpstreamParse {
        date: format_date(date),
        reason,
    };

    check_root(body).map_err(parse_error)?;
    let doc: ValCurs = quick_xml::de::from_str(body).map_err(|e| parse_error(e.to_string()))?;

    Ok(RatesSnapshot::collect(date, |code| {
        doc.valutes
            .iter()
            .find(|v| v.id.trim() == code.upstream_id())
            .and_then(|v| v.value.clone())
    }))
}

/// Ensure the first element is `<ValCurs>` carrying a `Date` attribute
///
/// Error pages served with a success status would otherwise deserialize into
/// an empty rates list.
fn check_root(body: &str) -> std::result::Result<(), String> {
    let mut reader = Reader::from_str(body);
    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(root) | Event::Empty(root) => {
                let name = root.name();
                if name.as_ref() != b"ValCurs" {
                    return Err(format!(
                        "unexpected root element <{}>",
                        String::from_utf8_lossy(name.as_ref())
                    ));
                }
                return match root.try_get_attribute("Date") {
                    Ok(Some(_)) => Ok(()),
                    Ok(None) => Err("ValCurs has no Date attribute".to_string()),
                    Err(e) => Err(e.to_string()),
                };
            }
            Event::Eof => return Err("document has no root element".to_string()),
            _ => {}
        }
    }
}

/// HTTP client for the BNM rates endpoint
#[derive(Debug, Clone)]
pub struct BnmClient {
    client: Client,
    base_url: String,
}

impl BnmClient {
    /// Create a client against `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bnm-bot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Endpoint the client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_document(&self, date_text: &str) -> Result<String> {
        let fetch_error = |reason: String| BotError::UpstreamFetch {
            date: date_text.to_string(),
            reason,
        };

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("get_xml", "1"), ("date", date_text)])
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {status}")));
        }

        response.text().await.map_err(|e| fetch_error(e.to_string()))
    }
}

#[async_trait]
impl RateSource for BnmClient {
    async fn fetch(&self, date: NaiveDate) -> Result<RatesSnapshot> {
        let date_text = format_date(date);
        tracing::debug!(date = %date_text, "Fetching BNM rates");

        let body = self.fetch_document(&date_text).await?;
        let snapshot = parse_document(date, &body)?;

        let missing = snapshot.missing();
        if !missing.is_empty() {
            tracing::warn!(date = %date_text, ?missing, "BNM document lacks some currencies");
        }

        Ok(snapshot)
    }
}
