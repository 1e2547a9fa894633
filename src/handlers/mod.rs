pub mod calculator;
pub mod health;
pub mod metrics_handler;
pub mod submissions;
pub mod webhook;

use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::{
    bot::Bot, config::Config, notifier::Notifier, store::SubscriberStore,
    telegram::TelegramClient,
};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ArcSwap<Config>>,
    pub telegram: TelegramClient,
    pub notifier: Notifier,
    pub bot: Bot,
}

impl AppState {
    /// Build the state from the current configuration
    ///
    /// The bot token and the subscriber file path are captured here; later
    /// config reloads only affect recipient lists and message settings.
    pub fn new(config: Arc<ArcSwap<Config>>, http_client: reqwest::Client) -> Self {
        let cfg = config.load();
        let telegram = TelegramClient::new(http_client, &cfg.telegram);
        let store = SubscriberStore::new(cfg.storage.subscribers_file.clone());

        Self {
            notifier: Notifier::new(telegram.clone(), store.clone()),
            bot: Bot::new(telegram.clone(), store),
            telegram,
            config,
        }
    }
}
