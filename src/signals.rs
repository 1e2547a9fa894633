use anyhow::Result;
use arc_swap::ArcSwap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use crate::config::{self, Config};

/// Shutdown signal types
#[derive(Debug, Clone, Copy)]
pub enum ShutdownSignal {
    /// Graceful shutdown (drain connections, clean up)
    Graceful,
}

/// Setup signal handlers for the server
///
/// Returns a broadcast sender for shutdown signals and a join handle for the signal task
///
/// Handles:
/// - SIGTERM/SIGINT: Graceful shutdown
/// - SIGHUP: Configuration reload from `config_path`
#[cfg(unix)]
pub fn setup_signal_handlers(
    config: Arc<ArcSwap<Config>>,
    config_path: PathBuf,
) -> (broadcast::Sender<ShutdownSignal>, tokio::task::JoinHandle<()>) {
    let (shutdown_tx, _) = broadcast::channel(16);
    let tx_clone = shutdown_tx.clone();

    let handle = tokio::spawn(async move {
        let (mut sigterm, mut sighup) =
            match (signal(SignalKind::terminate()), signal(SignalKind::hangup())) {
                (Ok(sigterm), Ok(sighup)) => (sigterm, sighup),
                (Err(e), _) | (_, Err(e)) => {
                    error!("Failed to install signal handlers, only Ctrl+C will work: {}", e);
                    if tokio::signal::ctrl_c().await.is_ok() {
                        let _ = tx_clone.send(ShutdownSignal::Graceful);
                    }
                    return;
                }
            };

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("SIGTERM received, initiating graceful shutdown");
                    let _ = tx_clone.send(ShutdownSignal::Graceful);
                    break;
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("SIGINT received, initiating graceful shutdown");
                    let _ = tx_clone.send(ShutdownSignal::Graceful);
                    break;
                }
                _ = sighup.recv() => {
                    info!("SIGHUP received, reloading configuration");
                    if let Err(e) = reload_config(&config, &config_path) {
                        error!("Failed to reload configuration: {}", e);
                    } else {
                        info!("Configuration reloaded successfully");
                    }
                }
            }
        }
    });

    (shutdown_tx, handle)
}

/// Windows placeholder - signals not fully supported
#[cfg(not(unix))]
pub fn setup_signal_handlers(
    _config: Arc<ArcSwap<Config>>,
    _config_path: PathBuf,
) -> (broadcast::Sender<ShutdownSignal>, tokio::task::JoinHandle<()>) {
    let (shutdown_tx, _) = broadcast::channel(16);
    let tx_clone = shutdown_tx.clone();

    let handle = tokio::spawn(async move {
        // On Windows, only Ctrl+C is supported
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl+C received, initiating shutdown");
                let _ = tx_clone.send(ShutdownSignal::Graceful);
            }
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}", e);
            }
        }
    });

    (shutdown_tx, handle)
}

/// Reload configuration atomically
///
/// If loading or validation fails, the old configuration stays in place.
/// The bot token, listen address and subscriber file are bound at startup
/// and only change on restart.
fn reload_config(current: &Arc<ArcSwap<Config>>, config_path: &Path) -> Result<()> {
    let new_config = config::load_config(config_path)?;
    let old_config = current.load();

    if new_config.telegram.bot_token != old_config.telegram.bot_token {
        warn!("telegram.bot_token changed; restart the service to use the new token");
    }
    if new_config.server.host != old_config.server.host
        || new_config.server.port != old_config.server.port
    {
        warn!("server address changed; restart the service to rebind");
    }
    if new_config.storage.subscribers_file != old_config.storage.subscribers_file {
        warn!("storage.subscribers_file changed; restart the service to switch files");
    }

    info!(
        "New configuration loaded. Recipients: {}, admins: {}",
        new_config.telegram.recipient_chat_ids.len(),
        new_config.telegram.admin_chat_ids.len()
    );

    current.store(Arc::new(new_config));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> Config {
        let mut cfg = Config::default();
        cfg.telegram.bot_token = "1:test".to_string();
        cfg
    }

    #[tokio::test]
    async fn test_setup_signal_handlers() {
        let config = Arc::new(ArcSwap::from_pointee(create_test_config()));
        let (shutdown_tx, _handle) =
            setup_signal_handlers(config, PathBuf::from("does-not-exist.toml"));

        // Should be able to subscribe to shutdown signals
        let mut rx = shutdown_tx.subscribe();

        shutdown_tx.send(ShutdownSignal::Graceful).unwrap();

        let received = rx.recv().await.unwrap();
        assert!(matches!(received, ShutdownSignal::Graceful));
    }

    #[test]
    fn test_reload_keeps_old_config_on_error() {
        let mut bad = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        std::io::Write::write_all(&mut bad, b"[messages]\nutc_offset_minutes = 100000\n").unwrap();

        let config = Arc::new(ArcSwap::from_pointee(create_test_config()));
        let result = reload_config(&config, bad.path());

        assert!(result.is_err());
        assert_eq!(config.load().messages.utc_offset_minutes, 180);
    }

    #[test]
    fn test_reload_swaps_recipients() {
        let mut good = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        std::io::Write::write_all(
            &mut good,
            b"[telegram]\nbot_token = \"1:test\"\nrecipient_chat_ids = [\"5\", \"6\"]\n",
        )
        .unwrap();

        let config = Arc::new(ArcSwap::from_pointee(create_test_config()));
        reload_config(&config, good.path()).unwrap();
        assert_eq!(config.load().telegram.recipient_chat_ids, vec!["5", "6"]);
    }
}
