//! Configuration loading from environment variables.
//!
//! Everything has a default, so a bare `cargo run` serves the contract API on
//! port 3000 and an engine built from [`Config::engine`] talks to it.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Logging level (default: "info,gallery=debug,tower_http=debug")
//! - `HOST`: Server bind address (default: "0.0.0.0")
//! - `PORT`: Server port (default: 3000)
//! - `API_BASE_URL`: Root the engine's gateway talks to (default: "http://127.0.0.1:3000/api")
//! - `REQUEST_TIMEOUT_MS`: Per-request timeout of the gateway (default: 10000)
//! - `LIKE_DEBOUNCE_MS`: Quiet period before a like burst is sent (default: 500)
//! - `COMMENT_DEBOUNCE_MS`: Quiet period before a comment is sent (default: 800)
//! - `DUPLICATE_COOLDOWN_MS`: Window in which the same comment is refused (default: 5000)
//! - `DELETE_FADE_MS`: Fade-out before a deleted comment is hidden (default: 300)
//! - `NOTIFICATION_CAPACITY`: Buffered notifications per subscriber (default: 100)

use crate::application::{Notifier, SubmissionOptions, ToggleOptions};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Base URL of the like/comment API, without trailing slash
    pub api_base_url: String,

    pub request_timeout_ms: u64,
    pub like_debounce_ms: u64,
    pub comment_debounce_ms: u64,
    pub duplicate_cooldown_ms: u64,
    pub delete_fade_ms: u64,
    pub notification_capacity: usize,
}

/// Timings and buffer sizes for the client-side components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub request_timeout: Duration,
    pub like_debounce: Duration,
    pub comment_debounce: Duration,
    pub duplicate_cooldown: Duration,
    pub delete_fade: Duration,
    pub notification_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            like_debounce: Duration::from_millis(500),
            comment_debounce: Duration::from_millis(800),
            duplicate_cooldown: Duration::from_secs(5),
            delete_fade: Duration::from_millis(300),
            notification_capacity: 100,
        }
    }
}

impl EngineConfig {
    pub fn toggle_options(&self) -> ToggleOptions {
        ToggleOptions {
            debounce: self.like_debounce,
            initial: None,
        }
    }

    pub fn submission_options(&self) -> SubmissionOptions {
        SubmissionOptions {
            debounce: self.comment_debounce,
            cooldown: self.duplicate_cooldown,
            fade_out: self.delete_fade,
        }
    }

    pub fn notifier(&self) -> Notifier {
        Notifier::new(self.notification_capacity)
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env_or("HOST", "0.0.0.0".to_string())?,
            port: env_or("PORT", 3000)?,
            api_base_url: env_or("API_BASE_URL", "http://127.0.0.1:3000/api".to_string())?
                .trim_end_matches('/')
                .to_string(),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", 10_000)?,
            like_debounce_ms: env_or("LIKE_DEBOUNCE_MS", 500)?,
            comment_debounce_ms: env_or("COMMENT_DEBOUNCE_MS", 800)?,
            duplicate_cooldown_ms: env_or("DUPLICATE_COOLDOWN_MS", 5_000)?,
            delete_fade_ms: env_or("DELETE_FADE_MS", 300)?,
            notification_capacity: env_or("NOTIFICATION_CAPACITY", 100)?,
        })
    }

    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            like_debounce: Duration::from_millis(self.like_debounce_ms),
            comment_debounce: Duration::from_millis(self.comment_debounce_ms),
            duplicate_cooldown: Duration::from_millis(self.duplicate_cooldown_ms),
            delete_fade: Duration::from_millis(self.delete_fade_ms),
            notification_capacity: self.notification_capacity,
        }
    }
}

/// Load an environment variable with a default value.
///
/// # Errors
///
/// Returns an error if the variable is set but cannot be parsed.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}
