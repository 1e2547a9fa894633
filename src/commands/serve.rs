use anyhow::Result;
use colored::Colorize;
use lead_relay::{config, server};
use std::path::Path;
use tracing::info;

/// Execute the serve command
///
/// Loads configuration and blocks until a shutdown signal arrives.
pub async fn execute(config_path: &Path) -> Result<()> {
    println!("{}", "Starting lead relay...".green());

    let cfg = config::load_config(config_path)?;
    info!(config = %config_path.display(), "Configuration loaded");

    server::start_server(cfg, config_path.to_path_buf()).await?;

    Ok(())
}
