// velowatch/src/main.rs

mod cli;
mod logic;

use clap::Parser;
use cli::{Cli, Commands, ConfigAction};
use logic::builder;
use logic::client::{confcmd, poller, status};
use logic::config::WatchConfig;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command‐line arguments
    let args = Cli::parse();

    // Allow VELOWATCH_HOST / VELOWATCH_PORT to override flags
    let host = std::env::var("VELOWATCH_HOST").unwrap_or_else(|_| args.host.clone());
    let port = std::env::var("VELOWATCH_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(args.port);

    // Dispatch on subcommand
    match args.command {
        Commands::Watch {
            path,
            base_url,
            interval,
            fresh_threshold,
            stale_threshold,
            locale,
            config,
        } => {
            // Create configuration from file, environment, and CLI arguments
            let watch_config = if let Some(config_path) = config {
                // Load from file first, then apply environment and CLI overrides
                WatchConfig::from_file(&config_path)?.apply_env().with_overrides(
                    interval,
                    fresh_threshold,
                    stale_threshold,
                    locale.map(|l| l.as_key().to_string()),
                )
            } else {
                // Use the saved config, environment variables, and CLI args
                WatchConfig::from_args_and_env(
                    interval,
                    fresh_threshold,
                    stale_threshold,
                    locale.map(|l| l.as_key().to_string()),
                )
            };
            watch_config.validate()?;

            // Ctrl-C flips the shutdown signal; the poller drains cleanly
            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    let _ = shutdown_tx.send(true);
                }
            });

            poller::run(base_url, host, port, path, watch_config, shutdown_rx).await?
        }

        Commands::Status {
            path,
            base_url,
            format,
            sort,
            status: status_filter,
            fresh_threshold,
            stale_threshold,
            locale,
            config,
        } => {
            // Create configuration from file, environment, and CLI arguments
            let watch_config = if let Some(config_path) = config {
                // Load from file first, then apply environment and CLI overrides
                WatchConfig::from_file(&config_path)?.apply_env().with_overrides(
                    None,
                    fresh_threshold,
                    stale_threshold,
                    locale.map(|l| l.as_key().to_string()),
                )
            } else {
                // Use the saved config, environment variables, and CLI args
                WatchConfig::from_args_and_env(
                    None,
                    fresh_threshold,
                    stale_threshold,
                    locale.map(|l| l.as_key().to_string()),
                )
            };
            watch_config.validate()?;

            status::run(
                base_url,
                host,
                port,
                path,
                format,
                sort,
                status_filter,
                watch_config,
            )
            .await?
        }

        Commands::Build {
            program,
            output,
            user_agent,
            limit,
        } => builder::run(program, output, user_agent, limit).await?,

        Commands::Config { action } => match action {
            ConfigAction::Show => confcmd::show()?,
            ConfigAction::Set {
                interval,
                fresh_threshold,
                stale_threshold,
                locale,
            } => confcmd::set(
                interval,
                fresh_threshold,
                stale_threshold,
                locale.map(|l| l.as_key().to_string()),
            )?,
        },
    }

    Ok(())
}
