use anyhow::{bail, Result};
use colored::Colorize;
use lead_relay::{
    config,
    form::FormSubmission,
    notifier::Notifier,
    store::SubscriberStore,
    telegram::TelegramClient,
};
use std::path::Path;

/// Execute the notify-test command
///
/// Sends a contact submission through the same fan-out the service uses.
pub async fn execute(config_path: &Path, name: String, phone: String, comment: String) -> Result<()> {
    let cfg = config::load_config(config_path)?;

    let store = SubscriberStore::new(cfg.storage.subscribers_file.clone());
    let telegram = TelegramClient::new(reqwest::Client::new(), &cfg.telegram);
    let notifier = Notifier::new(telegram, store);

    println!("{}", "Sending test notification...".yellow());

    let form = FormSubmission::contact(name, phone).with_comment(comment);
    let report = notifier
        .notify(
            &form,
            &cfg.telegram.recipient_chat_ids,
            cfg.messages.utc_offset(),
        )
        .await;

    println!("  Recipients: {}", report.recipients);
    println!("  Delivered: {}", report.delivered.to_string().green());
    println!("  Failed: {}", report.failed.to_string().red());

    if !report.is_success() {
        if report.recipients == 0 {
            println!();
            println!("Tip: no subscribers yet. Users need to send /start to the bot first.");
        }
        bail!("Notification was not delivered to any recipient");
    }

    println!("{}", "✓ Notification sent".green());
    Ok(())
}
