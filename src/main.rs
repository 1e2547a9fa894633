use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use lead_relay::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    init_tracing(args.log_format);

    match args.get_command() {
        cli::Commands::Serve => {
            commands::serve::execute(&args.config).await?;
        }
        cli::Commands::SetWebhook { url } => {
            commands::webhook::set(&args.config, url).await?;
        }
        cli::Commands::DeleteWebhook => {
            commands::webhook::delete(&args.config).await?;
        }
        cli::Commands::NotifyTest {
            name,
            phone,
            comment,
        } => {
            commands::notify::execute(&args.config, name, phone, comment).await?;
        }
        cli::Commands::Subscribers => {
            commands::subscribers::execute(&args.config).await?;
        }
        cli::Commands::Quote {
            area,
            secondary,
            design,
            demolition,
        } => {
            commands::quote::execute(area, secondary, design, demolition)?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&args.config)?,
            cli::ConfigCommands::Validate => commands::config::validate(&args.config)?,
        },
        cli::Commands::Version => {
            println!("lead-relay v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
