use anyhow::{anyhow, Result};
use colored::Colorize;
use lead_relay::{config, telegram::TelegramClient};
use std::path::Path;

/// Execute the set-webhook command
///
/// Registers `url`, or `telegram.webhook_url` when no URL is given.
pub async fn set(config_path: &Path, url: Option<String>) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    let url = url
        .or_else(|| cfg.telegram.webhook_url.clone())
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| anyhow!("No webhook URL: pass --url or set telegram.webhook_url"))?;

    println!("{}", "Setting up bot webhook...".yellow());
    println!("  Webhook URL: {}", url);

    let client = TelegramClient::new(reqwest::Client::new(), &cfg.telegram);
    let ok = client.set_webhook(&url).await?;

    if ok {
        println!("{}", "✓ Webhook set successfully".green());
        println!();
        println!("{}", "Next steps:".bold());
        println!("  1. Make sure the service is running: lead-relay serve");
        println!("  2. Users send /start to the bot to subscribe to notifications");
        println!("  3. Test delivery with: lead-relay notify-test");
        Ok(())
    } else {
        println!("{}", "✗ Failed to set webhook".red());
        println!();
        println!("{}", "Troubleshooting:".bold());
        println!("  1. Check that the service is reachable from the internet over HTTPS");
        println!("  2. Verify the webhook URL is correct");
        println!("  3. Make sure the bot token is valid");
        Err(anyhow!("Bot API refused the webhook"))
    }
}

/// Execute the delete-webhook command
pub async fn delete(config_path: &Path) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    let client = TelegramClient::new(reqwest::Client::new(), &cfg.telegram);

    if client.delete_webhook().await? {
        println!("{}", "✓ Webhook deleted".green());
        Ok(())
    } else {
        println!("{}", "✗ Failed to delete webhook".red());
        Err(anyhow!("Bot API refused to delete the webhook"))
    }
}
