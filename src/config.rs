//! Configuration management

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

/// Relay configuration, loaded once at startup
#[derive(Clone, Deserialize)]
pub struct RelayConfig {
    // =========================================================================
    // LINE Messaging API
    // =========================================================================
    /// Channel access token (bearer token for the reply API)
    pub line_channel_access_token: String,

    /// Channel secret for webhook signature verification
    pub line_channel_secret: String,

    /// Base URL of the LINE Messaging API
    #[serde(default = "default_line_api_base")]
    pub line_api_base: String,

    /// Timeout for a single reply call
    #[serde(default = "default_reply_timeout")]
    pub reply_timeout_secs: u64,

    // =========================================================================
    // Gemini
    // =========================================================================
    /// API key for the generative language API
    pub gemini_api_key: String,

    /// Model used for completions
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Base URL of the generative language API
    #[serde(default = "default_gemini_api_base")]
    pub gemini_api_base: String,

    /// Timeout for a single completion call
    #[serde(default = "default_completion_timeout")]
    pub completion_timeout_secs: u64,

    // =========================================================================
    // Server
    // =========================================================================
    /// Webhook server bind address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Log raw webhook bodies
    #[serde(default)]
    pub debug_mode: bool,
}

fn default_line_api_base() -> String {
    "https://api.line.me".to_string()
}

fn default_gemini_api_base() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:5001".to_string()
}

fn default_completion_timeout() -> u64 {
    30
}

fn default_reply_timeout() -> u64 {
    10
}

impl RelayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} is required", key))
        };

        Ok(Self {
            line_channel_access_token: required("LINE_CHANNEL_ACCESS_TOKEN")?,
            line_channel_secret: required("LINE_CHANNEL_SECRET")?,
            line_api_base: lookup("LINE_API_BASE").unwrap_or_else(default_line_api_base),
            reply_timeout_secs: lookup("REPLY_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_reply_timeout),

            gemini_api_key: required("GEMINI_API_KEY")?,
            gemini_model: lookup("GEMINI_MODEL").unwrap_or_else(default_gemini_model),
            gemini_api_base: lookup("GEMINI_API_BASE").unwrap_or_else(default_gemini_api_base),
            completion_timeout_secs: lookup("COMPLETION_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_completion_timeout),

            listen_addr: lookup("LISTEN_ADDR").unwrap_or_else(default_listen_addr),
            debug_mode: lookup("DEBUG_MODE").is_some(),
        })
    }

    pub fn completion_timeout(&self) -> Duration {
        Duration::from_secs(self.completion_timeout_secs)
    }

    pub fn reply_timeout(&self) -> Duration {
        Duration::from_secs(self.reply_timeout_secs)
    }
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("line_channel_access_token", &"<redacted>")
            .field("line_channel_secret", &"<redacted>")
            .field("line_api_base", &self.line_api_base)
            .field("reply_timeout_secs", &self.reply_timeout_secs)
            .field("gemini_api_key", &"<redacted>")
            .field("gemini_model", &self.gemini_model)
            .field("gemini_api_base", &self.gemini_api_base)
            .field("completion_timeout_secs", &self.completion_timeout_secs)
            .field("listen_addr", &self.listen_addr)
            .field("debug_mode", &self.debug_mode)
            .finish()
    }
}
