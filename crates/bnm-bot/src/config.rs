//! Configuration for the rates bot

use crate::api::bnm::BNM_BASE_URL;
use crate::error::{BotError, Result};
use bnm_utils::{env_or, env_parse_or, required_env};
use std::time::Duration;

/// Environment variable holding the Telegram bot token
pub const TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";

/// Configuration for the rates bot
#[derive(Clone)]
pub struct BotConfig {
    /// Telegram bot token from BotFather
    pub telegram_token: String,

    /// BNM rates endpoint
    pub bnm_base_url: String,

    /// Timeout of one upstream rates request
    pub request_timeout: Duration,

    /// Long-poll timeout passed to `getUpdates`
    pub poll_timeout: Duration,

    /// Interval between health snapshots
    pub health_interval: Duration,

    /// Resident memory above which the health monitor warns
    pub memory_warn_bytes: u64,

    /// First delay before restarting a failed listener
    pub restart_backoff_base: Duration,

    /// Upper bound of the listener restart delay
    pub restart_backoff_max: Duration,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            telegram_token: String::new(),
            bnm_base_url: BNM_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(15),
            poll_timeout: Duration::from_secs(30),
            health_interval: Duration::from_secs(60),
            memory_warn_bytes: 256 * 1024 * 1024,
            restart_backoff_base: Duration::from_secs(1),
            restart_backoff_max: Duration::from_secs(60),
        }
    }
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("telegram_token", &"<redacted>")
            .field("bnm_base_url", &self.bnm_base_url)
            .field("request_timeout", &self.request_timeout)
            .field("poll_timeout", &self.poll_timeout)
            .field("health_interval", &self.health_interval)
            .field("memory_warn_bytes", &self.memory_warn_bytes)
            .field("restart_backoff_base", &self.restart_backoff_base)
            .field("restart_backoff_max", &self.restart_backoff_max)
            .finish()
    }
}

impl BotConfig {
    /// Create a new configuration builder
    pub fn builder() -> BotConfigBuilder {
        BotConfigBuilder::default()
    }

    /// Load configuration from the process environment
    ///
    /// `TELEGRAM_BOT_TOKEN` is required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let secs = |name: &str, default: Duration| -> Result<Duration> {
            Ok(Duration::from_secs(env_parse_or(name, default.as_secs())?))
        };

        Self::builder()
            .telegram_token(required_env(TOKEN_VAR)?)
            .bnm_base_url(env_or("BNM_BASE_URL", &defaults.bnm_base_url))
            .request_timeout(secs("BNM_TIMEOUT_SECS", defaults.request_timeout)?)
            .poll_timeout(secs("TELEGRAM_POLL_TIMEOUT_SECS", defaults.poll_timeout)?)
            .health_interval(secs("HEALTH_INTERVAL_SECS", defaults.health_interval)?)
            .memory_warn_bytes(
                env_parse_or("MEMORY_WARN_MB", defaults.memory_warn_bytes / 1024 / 1024)?
                    * 1024
                    * 1024,
            )
            .build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.telegram_token.trim().is_empty() {
            return Err(BotError::Config(format!("{TOKEN_VAR} not set")));
        }

        if !self.bnm_base_url.starts_with("http://") && !self.bnm_base_url.starts_with("https://")
        {
            return Err(BotError::Config(format!(
                "BNM base URL must be http(s): {}",
                self.bnm_base_url
            )));
        }

        if self.request_timeout.is_zero() || self.health_interval.is_zero() {
            return Err(BotError::Config(
                "request timeout and health interval must be greater than 0".to_string(),
            ));
        }

        if self.restart_backoff_base > self.restart_backoff_max {
            return Err(BotError::Config(
                "restart backoff base exceeds its maximum".to_string(),
            ));
        }

        Ok(())
    }

    /// Delay before listener restart number `attempt` (0-based)
    pub fn restart_backoff(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt.min(16));
        self.restart_backoff_base
            .saturating_mul(factor)
            .min(self.restart_backoff_max)
    }
}

/// Builder for BotConfig
#[derive(Debug, Default)]
pub struct BotConfigBuilder {
    telegram_token: Option<String>,
    bnm_base_url: Option<String>,
    request_timeout: Option<Duration>,
    poll_timeout: Option<Duration>,
    health_interval: Option<Duration>,
    memory_warn_bytes: Option<u64>,
    restart_backoff_base: Option<Duration>,
    restart_backoff_max: Option<Duration>,
}

impl BotConfigBuilder {
    /// Set the Telegram bot token
    pub fn telegram_token(mut self, token: impl Into<String>) -> Self {
        self.telegram_token = Some(token.into());
        self
    }

    /// Set the BNM endpoint
    pub fn bnm_base_url(mut self, url: impl Into<String>) -> Self {
        self.bnm_base_url = Some(url.into());
        self
    }

    /// Set the upstream request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the long-poll timeout
    pub fn poll_timeout(mut self, duration: Duration) -> Self {
        self.poll_timeout = Some(duration);
        self
    }

    /// Set the health snapshot interval
    pub fn health_interval(mut self, duration: Duration) -> Self {
        self.health_interval = Some(duration);
        self
    }

    /// Set the memory warning threshold
    pub fn memory_warn_bytes(mut self, bytes: u64) -> Self {
        self.memory_warn_bytes = Some(bytes);
        self
    }

    /// Set the listener restart backoff bounds
    pub fn restart_backoff(mut self, base: Duration, max: Duration) -> Self {
        self.restart_backoff_base = Some(base);
        self.restart_backoff_max = Some(max);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<BotConfig> {
        let defaults = BotConfig::default();

        let config = BotConfig {
            telegram_token: self.telegram_token.unwrap_or(defaults.telegram_token),
            bnm_base_url: self.bnm_base_url.unwrap_or(defaults.bnm_base_url),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            poll_timeout: self.poll_timeout.unwrap_or(defaults.poll_timeout),
            health_interval: self.health_interval.unwrap_or(defaults.health_interval),
            memory_warn_bytes: self.memory_warn_bytes.unwrap_or(defaults.memory_warn_bytes),
            restart_backoff_base: self
                .restart_backoff_base
                .unwrap_or(defaults.restart_backoff_base),
            restart_backoff_max: self
                .restart_backoff_max
                .unwrap_or(defaults.restart_backoff_max),
        };

        config.validate()?;
        Ok(config)
    }
}
