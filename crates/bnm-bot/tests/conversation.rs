//! End-to-end conversations against an in-memory rates source and transport

use async_trait::async_trait;
use bnm_bot::api::parse_document;
use bnm_bot::{
    BotError, Catalog, ChatTransport, FixedClock, HealthCounters, InboundMessage, Language,
    Listener, OutboundMessage, RateSource, RatesBot, RatesSnapshot, Result,
};
use chrono::NaiveDate;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

const FRIDAY_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ValCurs Date="16.10.2026" name="Official exchange rate">
  <Valute ID="47"><NumCode>978</NumCode><CharCode>EUR</CharCode><Nominal>1</Nominal><Name>Euro</Name><Value>19.6000</Value></Valute>
  <Valute ID="44"><NumCode>840</NumCode><CharCode>USD</CharCode><Nominal>1</Nominal><Name>US Dollar</Name><Value>16.9000</Value></Valute>
  <Valute ID="53"><NumCode>980</NumCode><CharCode>UAH</CharCode><Nominal>1</Nominal><Name>Hryvnia</Name><Value>0.4071</Value></Valute>
  <Valute ID="49"><NumCode>946</NumCode><CharCode>RON</CharCode><Nominal>1</Nominal><Name>Leu</Name><Value>3.8651</Value></Valute>
  <Valute ID="51"><NumCode>643</NumCode><CharCode>RUB</CharCode><Nominal>1</Nominal><Name>Ruble</Name><Value>0.2087</Value></Valute>
</ValCurs>"#;

const MONDAY_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ValCurs Date="19.10.2026" name="Official exchange rate">
  <Valute ID="47"><CharCode>EUR</CharCode><Value>19.6470</Value></Valute>
  <Valute ID="44"><CharCode>USD</CharCode><Value>16.8934</Value></Valute>
  <Valute ID="53"><CharCode>UAH</CharCode><Value>0.4071</Value></Valute>
  <Valute ID="49"><CharCode>RON</CharCode><Value>3.8651</Value></Valute>
  <Valute ID="51"><CharCode>RUB</CharCode><Value>0.2100</Value></Valute>
</ValCurs>"#;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
}

/// Serves canned documents by date and records every requested date
#[derive(Default)]
struct FakeSource {
    documents: HashMap<NaiveDate, &'static str>,
    requests: Mutex<Vec<NaiveDate>>,
}

#[async_trait]
impl RateSource for FakeSource {
    async fn fetch(&self, date: NaiveDate) -> Result<RatesSnapshot> {
        self.requests.lock().unwrap().push(date);
        match self.documents.get(&date) {
            Some(body) => parse_document(date, body),
            None => Err(BotError::UpstreamFetch {
                date: date.format("%d.%m.%Y").to_string(),
                reason: "HTTP 404 Not Found".to_string(),
            }),
        }
    }
}

struct Harness {
    bot: RatesBot,
    source: Arc<FakeSource>,
    counters: Arc<HealthCounters>,
}

impl Harness {
    fn new(today: NaiveDate, documents: &[(NaiveDate, &'static str)]) -> Self {
        let source = Arc::new(FakeSource {
            documents: documents.iter().copied().collect(),
            ..FakeSource::default()
        });
        let counters = Arc::new(HealthCounters::new());
        let bot = RatesBot::new(
            source.clone(),
            Arc::new(FixedClock(today)),
            Arc::new(Catalog::builtin().unwrap()),
            counters.clone(),
        )
        .unwrap();
        Self {
            bot,
            source,
            counters,
        }
    }

    async fn say(&mut self, user_id: i64, text: &str) -> OutboundMessage {
        self.bot
            .handle(&InboundMessage::text(user_id, user_id, text))
            .await
            .expect("expected a reply")
    }

    fn requests(&self) -> Vec<NaiveDate> {
        self.source.requests.lock().unwrap().clone()
    }
}

#[tokio::test]
async fn test_full_conversation_in_russian() {
    let mut h = Harness::new(date(19), &[(date(16), FRIDAY_XML), (date(19), MONDAY_XML)]);

    let welcome = h.say(1, "/start").await;
    assert_eq!(welcome.keyboard.as_ref().unwrap().rows.len(), 3);

    let menu = h.say(1, "🇷🇺 Русский").await;
    assert_eq!(menu.text, "Язык установлен: Русский. Выберите пункт меню.");
    assert!(menu.keyboard.unwrap().labels().any(|l| l == "📈 Сравнение"));

    let today = h.say(1, "📊 Курс на сегодня").await;
    assert_eq!(
        today.text,
        "Официальный курс НБМ, 19.10.2026:\n\
         EUR: 19.6470 MDL\n\
         USD: 16.8934 MDL\n\
         UAH: 0.4071 MDL\n\
         RON: 3.8651 MDL\n\
         RUB: 0.2100 MDL\n\
         Хорошего и продуктивного дня!"
    );

    let comparison = h.say(1, "📈 Сравнение").await;
    assert_eq!(
        comparison.text,
        "Курс НБМ, 19.10.2026 по сравнению с 16.10.2026:\n\
         EUR: 19.6470 MDL ⬆️ (0.0470)\n\
         USD: 16.8934 MDL ⬇️ (-0.0066)\n\
         UAH: 0.4071 MDL ➡️ (0.0000)\n\
         RON: 3.8651 MDL ➡️ (0.0000)\n\
         RUB: 0.2100 MDL ⬆️ (0.0013)"
    );

    assert_eq!(h.requests(), vec![date(19), date(19), date(16)]);
    assert_eq!(h.bot.sessions().language(1), Some(Language::Ru));
}

#[tokio::test]
async fn test_weekend_requests_resolve_to_friday() {
    // Saturday
    let mut h = Harness::new(date(17), &[(date(15), MONDAY_XML), (date(16), FRIDAY_XML)]);

    let today = h.say(7, "/get_rates").await;
    assert!(today.text.starts_with("Curs valutar BNM, 16.10.2026:"));

    let yesterday = h.say(7, "/yesterday").await;
    assert!(yesterday.text.starts_with("Curs valutar BNM, 15.10.2026:"));

    assert_eq!(h.requests(), vec![date(16), date(15)]);
}

#[tokio::test]
async fn test_missing_document_degrades_to_unavailable() {
    let mut h = Harness::new(date(19), &[(date(19), MONDAY_XML)]);
    h.say(3, "🇬🇧 English").await;

    let reply = h.say(3, "📈 Comparison").await;

    assert_eq!(
        reply.text,
        "Data is currently unavailable. Please try again later."
    );
    // Both sides are still fetched
    assert_eq!(h.requests(), vec![date(19), date(16)]);
    assert_eq!(h.counters.snapshot().handler_errors, 0);
}

#[test]
fn test_unrecognized_input_gets_no_reply() {
    tokio_test::block_on(async {
        let mut h = Harness::new(date(19), &[]);

        assert!(
            h.bot
                .handle(&InboundMessage::text(1, 1, "what is the rate?"))
                .await
                .is_none()
        );
        assert!(h.bot.handle(&InboundMessage::non_text(1, 1)).await.is_none());
        assert!(h.requests().is_empty());
        assert_eq!(h.counters.snapshot().messages, 2);
    });
}

/// Plays one batch of messages and collects the replies
struct RecordingTransport {
    batches: VecDeque<Vec<InboundMessage>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn receive(&mut self) -> Result<Vec<InboundMessage>> {
        self.batches
            .pop_front()
            .ok_or_else(|| BotError::Transport("getUpdates: connection reset".to_string()))
    }

    async fn send(&self, message: &OutboundMessage) -> Result<()> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

#[tokio::test]
async fn test_listener_serves_users_independently() {
    let mut h = Harness::new(date(19), &[(date(19), MONDAY_XML)]);
    let sent = Arc::new(Mutex::new(Vec::new()));
    let mut listener = Listener::new(RecordingTransport {
        batches: VecDeque::from([vec![
            InboundMessage::text(1, 100, "🇬🇧 English"),
            InboundMessage::text(2, 200, "/today"),
            InboundMessage::text(1, 100, "/today"),
        ]]),
        sent: sent.clone(),
    });

    let err = listener.run(&mut h.bot).await.unwrap_err();
    assert!(err.is_transport());

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[1].chat_id, 200);
    assert!(sent[1].text.starts_with("Curs valutar BNM, 19.10.2026:"));
    assert_eq!(sent[2].chat_id, 100);
    assert!(sent[2].text.starts_with("BNM exchange rates, 19.10.2026:"));
}
