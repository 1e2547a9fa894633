use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment prefix for every configuration key, e.g.
/// `LEAD_RELAY__TELEGRAM__BOT_TOKEN`
pub const ENV_PREFIX: &str = "LEAD_RELAY";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub telegram: TelegramConfig,
    pub storage: StorageConfig,
    pub messages: MessagesConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            body_limit_bytes: 64 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub api_base_url: String,
    pub timeout_seconds: u64,
    pub parse_mode: String,
    /// Chats that always receive form notifications (admin chat, company channel)
    pub recipient_chat_ids: Vec<String>,
    /// Chats allowed to run `/stats`
    pub admin_chat_ids: Vec<String>,
    /// Public URL of `/telegram/webhook`, used by `set-webhook`
    pub webhook_url: Option<String>,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            api_base_url: "https://api.telegram.org".to_string(),
            timeout_seconds: 10,
            parse_mode: "HTML".to_string(),
            recipient_chat_ids: Vec::new(),
            admin_chat_ids: Vec::new(),
            webhook_url: None,
        }
    }
}

impl TelegramConfig {
    pub fn is_admin(&self, chat_id: &str) -> bool {
        self.admin_chat_ids.iter().any(|id| id == chat_id)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Relative paths resolve against the working directory
    pub subscribers_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            subscribers_file: PathBuf::from("subscribers.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MessagesConfig {
    /// Shown in the bot's welcome and goodbye replies
    pub company_name: String,
    /// Offset used for timestamps in messages
    pub utc_offset_minutes: i32,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            company_name: "Культура Метров".to_string(),
            utc_offset_minutes: 180,
        }
    }
}

impl MessagesConfig {
    /// Falls back to UTC for an offset outside ±24h, which validation rejects anyway
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "/metrics".to_string(),
        }
    }
}

/// Load configuration: defaults, then the optional TOML file, then
/// `LEAD_RELAY__*` variables, then the legacy `PORT`,
/// `TELEGRAM_WEBHOOK_URL` and `TELEGRAM_BOT_TOKEN` variables.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("telegram.recipient_chat_ids")
                .with_list_parse_key("telegram.admin_chat_ids")
                .try_parsing(true),
        )
        .set_override_option("server.port", std::env::var("PORT").ok())?
        .set_override_option(
            "telegram.webhook_url",
            std::env::var("TELEGRAM_WEBHOOK_URL").ok(),
        )?
        .set_override_option(
            "telegram.bot_token",
            std::env::var("TELEGRAM_BOT_TOKEN").ok(),
        )?
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.telegram.bot_token.trim().is_empty() {
        anyhow::bail!("telegram.bot_token must be set");
    }

    if cfg.server.port == 0 {
        anyhow::bail!("server.port must be non-zero");
    }

    if !cfg.telegram.api_base_url.starts_with("http://")
        && !cfg.telegram.api_base_url.starts_with("https://")
    {
        anyhow::bail!(
            "telegram.api_base_url must be an http(s) URL, got '{}'",
            cfg.telegram.api_base_url
        );
    }

    if cfg.telegram.timeout_seconds == 0 {
        anyhow::bail!("telegram.timeout_seconds must be positive");
    }

    if FixedOffset::east_opt(cfg.messages.utc_offset_minutes.saturating_mul(60)).is_none() {
        anyhow::bail!(
            "messages.utc_offset_minutes {} is out of range",
            cfg.messages.utc_offset_minutes
        );
    }

    if cfg.messages.company_name.trim().is_empty() {
        anyhow::bail!("messages.company_name cannot be empty");
    }

    if cfg.metrics.enabled && !cfg.metrics.endpoint.starts_with('/') {
        anyhow::bail!("metrics.endpoint must start with '/'");
    }

    for id in cfg
        .telegram
        .recipient_chat_ids
        .iter()
        .chain(cfg.telegram.admin_chat_ids.iter())
    {
        if id.trim().is_empty() {
            anyhow::bail!("Chat ids cannot be empty");
        }
    }

    Ok(())
}
