use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use lead_relay::{
    config,
    format::format_date,
    store::{SubscriberStats, SubscriberStore},
};
use std::path::Path;

/// Execute the subscribers command
pub async fn execute(config_path: &Path) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    let store = SubscriberStore::new(cfg.storage.subscribers_file.clone());

    let subscribers = store.load().await?;
    let stats = SubscriberStats::compute(&subscribers, Utc::now());
    let offset = cfg.messages.utc_offset();

    println!("{}", "Subscribers:".bold());
    println!("  {}: {}", "File".cyan(), store.path().display());
    println!("  {}: {}", "Total".cyan(), stats.total);
    println!("  {}: {}", "Last 7 days".cyan(), stats.recent);
    println!();

    for (idx, subscriber) in subscribers.iter().enumerate() {
        println!(
            "  {}. {} {} {} - {}",
            idx + 1,
            subscriber.chat_id,
            subscriber.first_name.as_deref().unwrap_or("-"),
            subscriber
                .username
                .as_deref()
                .map(|u| format!("(@{})", u))
                .unwrap_or_default(),
            format_date(subscriber.subscribed_at.with_timezone(&offset))
        );
    }

    println!();
    println!(
        "  {}: {}",
        "Static recipients".cyan(),
        cfg.telegram.recipient_chat_ids.len()
    );

    Ok(())
}
