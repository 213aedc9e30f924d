//! The steady-state watcher: fetch the station map, render the relative-time
//! label, and refresh the view when the published document actually changes.

use crate::logic::backoff::Backoff;
use crate::logic::client::fetch::fetch_station_map;
use crate::logic::client::status::{display_header, display_station_table};
use crate::logic::client::url_utils::parse_resource_url;
use crate::logic::config::WatchConfig;
use crate::logic::reltime::{elapsed_since, updated_label};
use crate::logic::types::StationMap;
use chrono::{DateTime, Utc};
use colored::*;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;
use url::Url;

const INITIAL_RETRY_DELAY: Duration = Duration::from_secs(1);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// True when a freshly fetched timestamp obsoletes the rendered one. Exact
/// instant equality, so a stale-but-unchanged document never refreshes.
pub fn should_refresh(previous: DateTime<Utc>, fetched: DateTime<Utc>) -> bool {
    previous != fetched
}

/// One watcher run over a single resource: owns the reference instant, the
/// rendered label, and the held snapshot.
pub struct Poller {
    client: Client,
    url: Url,
    config: WatchConfig,
    last_updated: DateTime<Utc>,
    label: String,
    map: StationMap,
}

impl Poller {
    /// First fetch, retried with exponential backoff until it succeeds or the
    /// shutdown signal fires (`None`).
    pub async fn start(
        client: Client,
        url: Url,
        config: WatchConfig,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Option<Self> {
        let mut backoff = Backoff::new(INITIAL_RETRY_DELAY, MAX_RETRY_DELAY);

        let (map, last_updated) = loop {
            match fetch_snapshot(&client, &url).await {
                Ok(snapshot) => break snapshot,
                Err(e) => {
                    eprintln!("{} {}", "✗ Initial fetch failed:".red().bold(), e);
                    let delay = backoff.next_delay();
                    tokio::select! {
                        _ = sleep(delay) => {}
                        _ = shutdown.changed() => return None,
                    }
                }
            }
        };

        Some(Self {
            client,
            url,
            config,
            last_updated,
            label: String::new(),
            map,
        })
    }

    /// Polling state: render once, then tick every poll interval until the
    /// shutdown signal fires.
    pub async fn run(&mut self, shutdown: &mut watch::Receiver<bool>) {
        self.update_label(Utc::now());
        self.render();

        loop {
            let interval = Duration::from_secs(self.config.poll_interval_seconds);
            tokio::select! {
                _ = sleep(interval) => {}
                _ = shutdown.changed() => return,
            }
            self.tick().await;
        }
    }

    /// One polling step: check staleness, re-fetch and reconcile if needed,
    /// then re-render the label.
    async fn tick(&mut self) {
        let now = Utc::now();
        let elapsed_ms = elapsed_since(self.last_updated, now);

        if self.config.needs_refetch(elapsed_ms) {
            match fetch_snapshot(&self.client, &self.url).await {
                Ok((map, fetched)) => {
                    if should_refresh(self.last_updated, fetched) {
                        // the page-reload analog: adopt the new document and
                        // reset the reference instant
                        self.map = map;
                        self.last_updated = fetched;
                    }
                }
                // next tick is the retry path
                Err(e) => eprintln!("{} {}", "✗ Poll failed:".red().bold(), e),
            }
        }

        self.update_label(Utc::now());
        self.render();
    }

    fn update_label(&mut self, now: DateTime<Utc>) {
        let elapsed_ms = elapsed_since(self.last_updated, now);
        self.label = updated_label(elapsed_ms, self.config.locale());
    }

    fn render(&self) {
        // Clear screen (ANSI escape code)
        print!("\x1B[2J\x1B[1;1H");
        let freshness = self.config.classify_freshness(&self.last_updated);
        display_header(&self.label, &freshness, self.map.features.len());
        display_station_table(&self.map.features);
    }
}

async fn fetch_snapshot(
    client: &Client,
    url: &Url,
) -> anyhow::Result<(StationMap, DateTime<Utc>)> {
    let map = fetch_station_map(client, url).await?;
    let updated = map.updated_at()?;
    Ok((map, updated))
}

pub async fn run(
    base_url: Option<String>,
    host: String,
    port: u16,
    path: String,
    config: WatchConfig,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let url = parse_resource_url(base_url.as_deref(), &host, port, &path)?;
    let client = Client::new();

    println!(
        "{}",
        "Watching station map. Press Ctrl+C to exit...".bright_cyan().bold()
    );

    // `None` means the shutdown signal fired before the first successful fetch
    if let Some(mut poller) = Poller::start(client, url, config, &mut shutdown).await {
        poller.run(&mut shutdown).await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::types::parse_last_updated;

    #[test]
    fn test_unchanged_timestamp_never_refreshes() {
        let previous = parse_last_updated("2024-01-01 00:00:00+0000").unwrap();
        let fetched = parse_last_updated("2024-01-01T00:00:00Z").unwrap();
        assert!(!should_refresh(previous, fetched));
    }

    #[test]
    fn test_changed_timestamp_refreshes() {
        let previous = parse_last_updated("2024-01-01 00:00:00+0000").unwrap();
        let fetched = parse_last_updated("2024-01-01 00:05:00+0000").unwrap();
        assert!(should_refresh(previous, fetched));
    }
}
