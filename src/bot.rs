//! Bot commands received through the webhook
//!
//! `/start` subscribes the chat to form notifications, `/stop` unsubscribes
//! it, `/stats` (admin chats only) lists subscribers. Everything else is
//! ignored. Failures are logged and answered with a short error reply; they
//! never fail the webhook request itself.

use chrono::{DateTime, FixedOffset, Utc};
use std::fmt::Write;
use tracing::{debug, error, info, warn};

use crate::{
    config::Config,
    format::{escape_html, format_date},
    metrics,
    store::{NewSubscriber, Subscriber, SubscriberStats, SubscriberStore},
    telegram::{Message, TelegramClient, Update},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Stats,
}

impl Command {
    /// Parse a message that consists of exactly one command, optionally
    /// addressed as `/command@bot_name`
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.contains(char::is_whitespace) {
            return None;
        }
        let command = match text.split_once('@') {
            Some((command, bot_name)) if !bot_name.is_empty() => command,
            Some(_) => return None,
            None => text,
        };

        match command {
            "/start" => Some(Self::Start),
            "/stop" => Some(Self::Stop),
            "/stats" => Some(Self::Stats),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Stats => "stats",
        }
    }
}

const SUBSCRIBE_FAILED: &str = "❌ Произошла ошибка при подписке. Попробуйте позже.";
const UNSUBSCRIBE_FAILED: &str = "❌ Произошла ошибка при отписке. Попробуйте позже.";
const NOT_SUBSCRIBED: &str = "❌ Вы не были подписаны на уведомления.";
const STATS_FAILED: &str = "❌ Ошибка получения статистики.";

pub fn welcome_text(company_name: &str) -> String {
    format!(
        "👋 Добро пожаловать в бот \"{}\"!\n\n\
         Вы успешно подписались на уведомления о новых заявках на ремонт квартир.\n\n\
         📋 Доступные команды:\n\
         /stop - Отписаться от уведомлений\n\
         /stats - Статистика (только для администратора)\n\n\
         Мы будем присылать вам информацию о новых заявках с сайта.",
        escape_html(company_name)
    )
}

pub fn goodbye_text(company_name: &str) -> String {
    format!(
        "👋 Вы успешно отписались от уведомлений.\n\n\
         Если передумаете, просто напишите /start снова.\n\n\
         Спасибо за использование бота \"{}\"!",
        escape_html(company_name)
    )
}

/// Admin statistics reply
pub fn stats_text(subscribers: &[Subscriber], now: DateTime<Utc>, utc_offset: FixedOffset) -> String {
    let stats = SubscriberStats::compute(subscribers, now);

    let mut text = String::new();
    let _ = writeln!(text, "📊 Статистика подписчиков:\n");
    let _ = writeln!(text, "👥 Всего подписчиков: {}", stats.total);
    let _ = writeln!(text, "🆕 За последнюю неделю: {}\n", stats.recent);
    text.push_str("📋 Список подписчиков:");

    for (i, subscriber) in subscribers.iter().enumerate() {
        let name = subscriber
            .first_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .map(escape_html)
            .unwrap_or_else(|| "Без имени".to_string());
        let _ = write!(text, "\n{}. {}", i + 1, name);
        if let Some(username) = subscriber.username.as_deref().filter(|u| !u.is_empty()) {
            let _ = write!(text, " (@{})", escape_html(username));
        }
        let _ = write!(
            text,
            " - {}",
            format_date(subscriber.subscribed_at.with_timezone(&utc_offset))
        );
    }

    text
}

/// Handles webhook updates against the subscriber store
#[derive(Debug, Clone)]
pub struct Bot {
    telegram: TelegramClient,
    store: SubscriberStore,
}

impl Bot {
    pub fn new(telegram: TelegramClient, store: SubscriberStore) -> Self {
        Self { telegram, store }
    }

    /// Process one update; returns the command that was acted on, if any
    pub async fn handle_update(&self, update: &Update, config: &Config) -> Option<Command> {
        let Some(message) = &update.message else {
            debug!(update_id = update.update_id, "Skipping update without message");
            return None;
        };

        let chat_id = message.chat.id.to_string();
        let text = message.text.as_deref().unwrap_or("");
        let sender = message
            .from
            .as_ref()
            .and_then(|u| u.first_name.as_deref())
            .unwrap_or("Unknown");

        info!(chat_id = %chat_id, from = %sender, text = %text, "Received message");

        let command = Command::parse(text)?;

        match command {
            Command::Start => self.handle_start(&chat_id, message, config).await,
            Command::Stop => self.handle_stop(&chat_id, config).await,
            Command::Stats => {
                if !config.telegram.is_admin(&chat_id) {
                    debug!(chat_id = %chat_id, "Ignoring /stats from non-admin chat");
                    return None;
                }
                self.handle_stats(&chat_id, config).await
            }
        }

        metrics::record_bot_command(command.as_str());
        Some(command)
    }

    async fn handle_start(&self, chat_id: &str, message: &Message, config: &Config) {
        let user = message.from.as_ref();
        let subscriber = NewSubscriber {
            chat_id: chat_id.to_string(),
            username: user.and_then(|u| u.username.clone()),
            first_name: user.and_then(|u| u.first_name.clone()),
        };

        match self.store.add(subscriber).await {
            Ok(outcome) => {
                info!(chat_id = %chat_id, outcome = ?outcome, "Chat subscribed to notifications");
                self.reply(chat_id, &welcome_text(&config.messages.company_name))
                    .await;
            }
            Err(e) => {
                error!(chat_id = %chat_id, error = %e, "Failed to add subscriber");
                self.reply(chat_id, SUBSCRIBE_FAILED).await;
            }
        }
    }

    async fn handle_stop(&self, chat_id: &str, config: &Config) {
        match self.store.remove(chat_id).await {
            Ok(true) => {
                info!(chat_id = %chat_id, "Chat unsubscribed from notifications");
                self.reply(chat_id, &goodbye_text(&config.messages.company_name))
                    .await;
            }
            Ok(false) => {
                self.reply(chat_id, NOT_SUBSCRIBED).await;
            }
            Err(e) => {
                error!(chat_id = %chat_id, error = %e, "Failed to remove subscriber");
                self.reply(chat_id, UNSUBSCRIBE_FAILED).await;
            }
        }
    }

    async fn handle_stats(&self, chat_id: &str, config: &Config) {
        match self.store.load().await {
            Ok(subscribers) => {
                let text = stats_text(&subscribers, Utc::now(), config.messages.utc_offset());
                self.reply(chat_id, &text).await;
            }
            Err(e) => {
                error!(chat_id = %chat_id, error = %e, "Failed to read subscriber stats");
                self.reply(chat_id, STATS_FAILED).await;
            }
        }
    }

    async fn reply(&self, chat_id: &str, text: &str) -> bool {
        match self.telegram.send_message(chat_id, text).await {
            Ok(()) => true,
            Err(e) => {
                warn!(chat_id = %chat_id, error = %e, "Failed to send reply");
                false
            }
        }
    }
}
