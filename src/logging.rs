//! Tracing setup and secret masking
//!
//! The bot token is part of every Bot API URL, so it must never be printed
//! as-is. Use [`SensitiveToken`] whenever a token reaches a log line or the
//! terminal.

use std::fmt;
use std::str::FromStr;
use tracing_subscriber::{fmt as tracing_fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}' (expected text or json)", other)),
        }
    }
}

/// Initialize tracing/logging
///
/// Note: This function can only be called once. The filter comes from
/// `RUST_LOG` and defaults to `info`.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry.with(tracing_fmt::layer().with_target(true)).init(),
        LogFormat::Json => registry
            .with(tracing_fmt::layer().json().with_target(true))
            .init(),
    }
}

/// Masked bot token: `<bot id>:***`
///
/// Telegram tokens look like `123456:AAG...`; the numeric bot id before the
/// colon is public, the rest is the secret.
#[derive(Clone, Copy, Debug)]
pub struct SensitiveToken<'a> {
    inner: &'a str,
}

impl<'a> SensitiveToken<'a> {
    pub fn new(token: &'a str) -> Self {
        Self { inner: token }
    }
}

impl fmt::Display for SensitiveToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.split_once(':') {
            Some((bot_id, _)) if !bot_id.is_empty() => write!(f, "{}:***", bot_id),
            _ => write!(f, "***"),
        }
    }
}

/// Replace every occurrence of the token in `text`
///
/// Used on upstream error bodies and URLs before they are logged.
pub fn redact_token(text: &str, token: &str) -> String {
    if token.is_empty() {
        return text.to_string();
    }
    text.replace(token, &SensitiveToken::new(token).to_string())
}
