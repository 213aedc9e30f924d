use crate::logic::config::WatchConfig;
use colored::*;

/// Show the effective configuration and where it lives
pub fn show() -> anyhow::Result<()> {
    let config = WatchConfig::load_saved();

    println!("{}", "Current Configuration:".bright_blue().bold());
    display_config(&config);

    if let Ok(path) = WatchConfig::saved_file() {
        println!();
        println!("{} {}", "Config file:".bright_blue(), path.display());
    }
    Ok(())
}

fn display_config(config: &WatchConfig) {
    println!();
    println!(
        "  {} {} seconds",
        "Poll interval:".cyan(),
        config.poll_interval_seconds.to_string().bright_white()
    );
    println!(
        "  {} {} seconds",
        "Fresh threshold:".green(),
        config.fresh_threshold_seconds.to_string().bright_white()
    );
    println!(
        "  {} {} seconds",
        "Stale threshold:".bright_red(),
        config.stale_threshold_seconds.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Locale:".yellow(),
        config.locale.bright_white()
    );

    println!();
    println!("{}", "Freshness Definitions:".bright_green().bold());
    println!("  {} Map updated within the fresh threshold", "●".green());
    println!("  {} Map updated within the stale threshold", "●".yellow());
    println!(
        "  {} Map older than the stale threshold; the watcher re-checks upstream",
        "●".red()
    );
}

/// Persist new threshold or locale values
pub fn set(
    interval: Option<u64>,
    fresh_threshold: Option<u64>,
    stale_threshold: Option<u64>,
    locale: Option<String>,
) -> anyhow::Result<()> {
    if interval.is_none()
        && fresh_threshold.is_none()
        && stale_threshold.is_none()
        && locale.is_none()
    {
        eprintln!("{}", "Error: At least one setting must be specified".red().bold());
        eprintln!("Use one or more of: --interval, --fresh-threshold, --stale-threshold, --locale");
        return Ok(());
    }

    let current = WatchConfig::load_saved();
    let updated = current.with_overrides(interval, fresh_threshold, stale_threshold, locale);

    if let Err(e) = updated.validate() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        return Ok(());
    }

    updated.save()?;

    println!("{}", "Configuration updated successfully".bright_green().bold());
    println!();
    show()
}
