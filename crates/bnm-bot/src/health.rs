//! Process health counters and the periodic health logger
//!
//! Counters are written only by the message-handling task and read by the
//! monitor task; they share nothing else.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Counters sampled by [`HealthMonitor`]
#[derive(Debug)]
pub struct HealthCounters {
    started: Instant,
    messages: AtomicU64,
    handler_errors: AtomicU64,
    delivery_failures: AtomicU64,
    transport_restarts: AtomicU64,
}

impl Default for HealthCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthCounters {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            messages: AtomicU64::new(0),
            handler_errors: AtomicU64::new(0),
            delivery_failures: AtomicU64::new(0),
            transport_restarts: AtomicU64::new(0),
        }
    }

    pub fn record_message(&self) {
        self.messages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_handler_error(&self) {
        self.handler_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delivery_failure(&self) {
        self.delivery_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_transport_restart(&self) {
        self.transport_restarts.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> HealthSnapshot {
        HealthSnapshot {
            uptime: self.started.elapsed(),
            messages: self.messages.load(Ordering::Relaxed),
            handler_errors: self.handler_errors.load(Ordering::Relaxed),
            delivery_failures: self.delivery_failures.load(Ordering::Relaxed),
            transport_restarts: self.transport_restarts.load(Ordering::Relaxed),
            resident_bytes: resident_memory_bytes(),
        }
    }
}

/// Values logged on each health tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthSnapshot {
    pub uptime: Duration,
    pub messages: u64,
    pub handler_errors: u64,
    /// Replies the platform refused for a single chat
    pub delivery_failures: u64,
    pub transport_restarts: u64,
    /// Resident set size, when the platform exposes it
    pub resident_bytes: Option<u64>,
}

/// Resident set size from the `VmRSS` line of `/proc/self/status`
#[cfg(target_os = "linux")]
pub fn resident_memory_bytes() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    parse_vm_rss(&status)
}

#[cfg(not(target_os = "linux"))]
pub fn resident_memory_bytes() -> Option<u64> {
    None
}

/// `VmRSS` is reported in kB regardless of the kernel page size
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_vm_rss(status: &str) -> Option<u64> {
    let rest = status.lines().find_map(|l| l.strip_prefix("VmRSS:"))?;
    let mut fields = rest.split_whitespace();
    let value = fields.next()?.parse::<u64>().ok()?;
    match fields.next() {
        Some("kB") | None => Some(value * 1024),
        Some(_) => None,
    }
}

/// Periodic task logging a [`HealthSnapshot`]
#[derive(Debug, Clone)]
pub struct HealthMonitor {
    interval: Duration,
    memory_warn_bytes: u64,
}

impl HealthMonitor {
    pub fn new(interval: Duration, memory_warn_bytes: u64) -> Self {
        Self {
            interval,
            memory_warn_bytes,
        }
    }

    /// Run until `shutdown` flips to `true` or its sender is dropped
    pub fn spawn(
        self,
        counters: std::sync::Arc<HealthCounters>,
        mut shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.report(&counters.snapshot());
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("Health monitor stopped");
        })
    }

    /// Log one snapshot; returns whether memory is above the warning threshold
    pub fn report(&self, snapshot: &HealthSnapshot) -> bool {
        tracing::info!(
            uptime_secs = snapshot.uptime.as_secs(),
            messages = snapshot.messages,
            handler_errors = snapshot.handler_errors,
            delivery_failures = snapshot.delivery_failures,
            transport_restarts = snapshot.transport_restarts,
            resident_bytes = snapshot.resident_bytes,
            "Health snapshot"
        );

        let pressure = snapshot
            .resident_bytes
            .is_some_and(|bytes| bytes > self.memory_warn_bytes);
        if pressure {
            tracing::warn!(
                resident_bytes = snapshot.resident_bytes,
                threshold = self.memory_warn_bytes,
                "Memory usage above threshold"
            );
        }
        pressure
    }
}
