use crate::logic::types::StationMap;
use anyhow::Context;
use reqwest::Client;
use url::Url;

/// Fetch and parse the station map. Non-success statuses become errors carrying
/// the HTTP status; the caller decides whether to log and wait or to retry.
pub async fn fetch_station_map(client: &Client, url: &Url) -> anyhow::Result<StationMap> {
    let resp = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("request to {} failed", url))?;

    if !resp.status().is_success() {
        anyhow::bail!("server responded with HTTP {} for {}", resp.status(), url);
    }

    resp.json::<StationMap>()
        .await
        .with_context(|| format!("invalid station map JSON from {}", url))
}
