use clap::{Parser, Subcommand};
use lead_relay::logging::LogFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lead-relay", version, about = "Landing page form relay and subscriber bot")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    /// Log output format: text or json
    #[arg(long, default_value = "text", env = "LEAD_RELAY_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the HTTP service (default)
    Serve,

    /// Register the webhook URL with the Bot API
    SetWebhook {
        /// Webhook URL (defaults to telegram.webhook_url)
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Remove the registered webhook
    DeleteWebhook,

    /// Send a test contact submission to every recipient
    NotifyTest {
        #[arg(long, default_value = "Тестовый Пользователь")]
        name: String,

        #[arg(long, default_value = "+7 (999) 123-45-67")]
        phone: String,

        #[arg(long, default_value = "Это тестовое уведомление от системы")]
        comment: String,
    },

    /// Show subscriber statistics and the subscriber list
    Subscribers,

    /// Print a renovation estimate
    Quote {
        /// Apartment area in square metres
        #[arg(short, long, default_value_t = lead_relay::calculator::DEFAULT_AREA)]
        area: u32,

        /// Secondary housing instead of a new build
        #[arg(long)]
        secondary: bool,

        /// Include a design project
        #[arg(long)]
        design: bool,

        /// Demolition required (secondary housing only)
        #[arg(long)]
        demolition: bool,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display current configuration (with secrets masked)
    Show,

    /// Validate configuration file
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Serve if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}
