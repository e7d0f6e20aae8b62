//! Listening loop and its restart supervisor

use super::RatesBot;
use crate::config::BotConfig;
use crate::error::{BotError, Result};
use crate::health::HealthCounters;
use crate::platforms::ChatTransport;
use tokio::sync::watch;

/// Pumps messages from one transport through the bot
pub struct Listener<T> {
    transport: T,
    batches: u64,
}

impl<T: ChatTransport> Listener<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            batches: 0,
        }
    }

    /// Batches received so far
    pub fn batches(&self) -> u64 {
        self.batches
    }

    /// Receive one batch and answer it in order; returns the number of replies
    /// delivered
    ///
    /// A reply the platform rejects for its chat is counted and skipped; any
    /// other send error ends the batch.
    pub async fn poll_once(&mut self, bot: &mut RatesBot) -> Result<usize> {
        let messages = self.transport.receive().await?;
        self.batches += 1;

        let mut replies = 0;
        for message in &messages {
            let Some(reply) = bot.handle(message).await else {
                continue;
            };
            match self.transport.send(&reply).await {
                Ok(()) => replies += 1,
                Err(BotError::Rejected(reason)) => {
                    bot.counters().record_delivery_failure();
                    tracing::warn!(chat_id = reply.chat_id, %reason, "Reply rejected");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(replies)
    }

    /// Serve until the transport fails
    pub async fn run(&mut self, bot: &mut RatesBot) -> Result<()> {
        loop {
            self.poll_once(bot).await?;
        }
    }
}

/// Keep a listener alive until `shutdown` is signalled
///
/// `connect` builds a fresh transport for every attempt. Connection and
/// transport failures are logged and retried without limit, waiting
/// [`BotConfig::restart_backoff`] in between. The attempt counter resets once
/// a listener has received at least one batch.
pub async fn run_forever<T, F>(
    bot: &mut RatesBot,
    mut connect: F,
    config: &BotConfig,
    counters: &HealthCounters,
    mut shutdown: watch::Receiver<bool>,
) where
    T: ChatTransport,
    F: FnMut() -> Result<T>,
{
    let mut attempt: u32 = 0;

    loop {
        if *shutdown.borrow() {
            break;
        }

        let failure = match connect() {
            Ok(transport) => {
                let mut listener = Listener::new(transport);
                tracing::info!(attempt, "Listener started");

                let outcome = tokio::select! {
                    outcome = listener.run(bot) => outcome,
                    () = shutdown_requested(&mut shutdown) => break,
                };

                if listener.batches() > 0 {
                    attempt = 0;
                }
                match outcome {
                    Ok(()) => continue,
                    Err(e) => e,
                }
            }
            Err(e) => e,
        };

        counters.record_transport_restart();
        let delay = config.restart_backoff(attempt);
        attempt = attempt.saturating_add(1);
        tracing::warn!(
            error = %failure,
            attempt,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "Listener failed, restarting"
        );

        tokio::select! {
            () = tokio::time::sleep(delay) => {}
            () = shutdown_requested(&mut shutdown) => break,
        }
    }

    tracing::info!("Listener stopped");
}

/// Resolves once shutdown is requested or the sender is gone
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
