//! Flat-file subscriber list
//!
//! The whole list lives in one JSON array. Every mutation reads the file,
//! changes the list in memory and writes the file back. There is no
//! locking: two concurrent mutations can lose an update, the last writer
//! wins.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Window counted as "recent" in [`SubscriberStats`]
pub const RECENT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed subscriber file {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A chat that opted in to form notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub chat_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    pub subscribed_at: DateTime<Utc>,
}

/// Subscriber data known before the subscription timestamp is assigned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSubscriber {
    pub chat_id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

impl NewSubscriber {
    pub fn new(chat_id: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Added,
    AlreadySubscribed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubscriberStats {
    pub total: usize,
    /// Subscribed within the last [`RECENT_WINDOW_DAYS`] days
    pub recent: usize,
}

impl SubscriberStats {
    pub fn compute(subscribers: &[Subscriber], now: DateTime<Utc>) -> Self {
        let cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
        Self {
            total: subscribers.len(),
            recent: subscribers
                .iter()
                .filter(|s| s.subscribed_at > cutoff)
                .count(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubscriberStore {
    path: PathBuf,
}

impl SubscriberStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full list, creating an empty file first if none exists
    pub async fn load(&self) -> Result<Vec<Subscriber>, StoreError> {
        if !tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| self.io_error(e))?
        {
            info!(path = %self.path.display(), "Creating empty subscriber file");
            self.save(&[]).await?;
            return Ok(Vec::new());
        }

        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        serde_json::from_slice(&data).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrite the file with the given list
    async fn save(&self, subscribers: &[Subscriber]) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(subscribers).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        tokio::fs::write(&self.path, data)
            .await
            .map_err(|e| self.io_error(e))
    }

    /// Append a subscriber unless the chat id is already present
    pub async fn add(&self, subscriber: NewSubscriber) -> Result<SubscribeOutcome, StoreError> {
        self.add_at(subscriber, Utc::now()).await
    }

    pub async fn add_at(
        &self,
        subscriber: NewSubscriber,
        subscribed_at: DateTime<Utc>,
    ) -> Result<SubscribeOutcome, StoreError> {
        let mut subscribers = self.load().await?;

        if subscribers.iter().any(|s| s.chat_id == subscriber.chat_id) {
            debug!(chat_id = %subscriber.chat_id, "Chat already subscribed");
            return Ok(SubscribeOutcome::AlreadySubscribed);
        }

        subscribers.push(Subscriber {
            chat_id: subscriber.chat_id,
            username: subscriber.username,
            first_name: subscriber.first_name,
            subscribed_at,
        });
        self.save(&subscribers).await?;
        crate::metrics::set_subscriber_count(subscribers.len());

        Ok(SubscribeOutcome::Added)
    }

    /// Remove a chat id; `false` when it was not subscribed
    pub async fn remove(&self, chat_id: &str) -> Result<bool, StoreError> {
        let subscribers = self.load().await?;
        let before = subscribers.len();

        let remaining: Vec<Subscriber> = subscribers
            .into_iter()
            .filter(|s| s.chat_id != chat_id)
            .collect();

        if remaining.len() == before {
            return Ok(false);
        }

        self.save(&remaining).await?;
        crate::metrics::set_subscriber_count(remaining.len());
        Ok(true)
    }

    pub async fn chat_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .map(|s| s.chat_id)
            .collect())
    }

    pub async fn stats(&self, now: DateTime<Utc>) -> Result<SubscriberStats, StoreError> {
        let subscribers = self.load().await?;
        Ok(SubscriberStats::compute(&subscribers, now))
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
