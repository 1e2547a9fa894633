use chrono::{FixedOffset, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

use crate::{
    format::format_submission, form::FormSubmission, metrics, store::SubscriberStore,
    telegram::TelegramClient,
};

/// Outcome of one fan-out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NotifyReport {
    pub recipients: usize,
    pub delivered: usize,
    pub failed: usize,
}

impl NotifyReport {
    /// At least one recipient got the message
    pub fn is_success(&self) -> bool {
        self.delivered > 0
    }
}

/// Subscribers first, then static recipients; first occurrence wins
pub fn merge_recipients(subscribers: Vec<String>, static_ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    subscribers
        .into_iter()
        .chain(static_ids.iter().cloned())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// Relays form submissions to every subscriber and static recipient
#[derive(Debug, Clone)]
pub struct Notifier {
    telegram: TelegramClient,
    store: SubscriberStore,
}

impl Notifier {
    pub fn new(telegram: TelegramClient, store: SubscriberStore) -> Self {
        Self { telegram, store }
    }

    /// Union of persisted subscribers and `static_ids`
    ///
    /// A store failure is logged and only the static list is used.
    pub async fn recipients(&self, static_ids: &[String]) -> Vec<String> {
        let subscribers = match self.store.chat_ids().await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "Failed to read subscribers, using static recipients only");
                Vec::new()
            }
        };
        merge_recipients(subscribers, static_ids)
    }

    /// Send `text` to all recipients at once and wait for every call
    pub async fn broadcast(&self, text: &str, recipients: &[String]) -> NotifyReport {
        let sends = recipients.iter().map(|chat_id| async move {
            let result = self.telegram.send_message(chat_id, text).await;
            if let Err(e) = &result {
                warn!(chat_id = %chat_id, error = %e, "Failed to deliver notification");
            }
            metrics::record_delivery(result.is_ok());
            result.is_ok()
        });

        let results = join_all(sends).await;
        let delivered = results.iter().filter(|ok| **ok).count();

        NotifyReport {
            recipients: recipients.len(),
            delivered,
            failed: results.len() - delivered,
        }
    }

    /// Format a submission and fan it out
    pub async fn notify(
        &self,
        form: &FormSubmission,
        static_ids: &[String],
        utc_offset: FixedOffset,
    ) -> NotifyReport {
        let text = format_submission(form, Utc::now().with_timezone(&utc_offset));
        let recipients = self.recipients(static_ids).await;

        info!(
            form_type = form.kind.as_str(),
            recipients = recipients.len(),
            "Sending notification"
        );

        let report = self.broadcast(&text, &recipients).await;
        metrics::record_notification(form.kind.as_str(), report.is_success());

        if report.is_success() {
            info!(
                delivered = report.delivered,
                failed = report.failed,
                "Notification delivered"
            );
        } else {
            warn!(
                recipients = report.recipients,
                "Notification was not delivered to anyone"
            );
        }

        report
    }
}
