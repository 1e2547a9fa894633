use anyhow::Result;
use colored::Colorize;
use lead_relay::{
    config::{self, Config},
    logging::SensitiveToken,
};
use std::path::Path;
use tracing::info;

/// Execute the config show command
///
/// Displays the current configuration with the bot token masked
pub fn show(config_path: &Path) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());
    info!("Loading configuration for display");

    let cfg = config::load_config(config_path)?;
    let sanitized = sanitize_secrets(&cfg);

    println!("{}", "Current Configuration:".green().bold());
    println!();

    let toml_string = toml::to_string_pretty(&sanitized)?;
    println!("{}", toml_string);

    Ok(())
}

/// Execute the config validate command
pub fn validate(config_path: &Path) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());
    info!("Validating configuration file");

    let cfg = config::load_config(config_path)?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  {}: {}:{}", "Server".cyan(), cfg.server.host, cfg.server.port);
    println!("  {}: {}", "Bot".cyan(), SensitiveToken::new(&cfg.telegram.bot_token));
    println!(
        "  {}: {}",
        "Static recipients".cyan(),
        cfg.telegram.recipient_chat_ids.len()
    );
    println!("  {}: {}", "Admins".cyan(), cfg.telegram.admin_chat_ids.len());
    println!(
        "  {}: {}",
        "Webhook URL".cyan(),
        cfg.telegram.webhook_url.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  {}: {}",
        "Subscriber file".cyan(),
        cfg.storage.subscribers_file.display()
    );
    println!(
        "  {}: {}",
        "Metrics".cyan(),
        if cfg.metrics.enabled {
            cfg.metrics.endpoint.as_str().green()
        } else {
            "disabled".red()
        }
    );

    info!("Configuration validation successful");
    Ok(())
}

/// Sanitize secrets in configuration for safe display
fn sanitize_secrets(cfg: &Config) -> Config {
    let mut sanitized = cfg.clone();
    sanitized.telegram.bot_token = SensitiveToken::new(&cfg.telegram.bot_token).to_string();
    sanitized
}
