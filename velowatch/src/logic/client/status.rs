use crate::cli::{OutputFormat, SortBy, StatusFilter};
use crate::logic::client::fetch::fetch_station_map;
use crate::logic::client::url_utils::parse_resource_url;
use crate::logic::config::WatchConfig;
use crate::logic::reltime::{elapsed_since, updated_label};
use crate::logic::types::{MapFreshness, StationFeature, StationStatus};
use chrono::Utc;
use colored::*;
use reqwest::Client;

/// Get colored status indicator for station availability
fn station_status_indicator(status: &StationStatus) -> String {
    match status {
        StationStatus::Available => "●".green().to_string(),
        StationStatus::Limited => "●".yellow().to_string(),
        StationStatus::Unavailable => "●".red().to_string(),
    }
}

/// Get colored status indicator for map freshness
fn freshness_indicator(freshness: &MapFreshness) -> String {
    match freshness {
        MapFreshness::Fresh => "●".green().to_string(),
        MapFreshness::Aging => "●".yellow().to_string(),
        MapFreshness::Stale => "●".red().to_string(),
    }
}

/// Sort stations based on the provided criteria
fn sort_stations(stations: &mut Vec<StationFeature>, sort_by: &SortBy) {
    match sort_by {
        SortBy::Name => stations.sort_by(|a, b| a.properties.station.cmp(&b.properties.station)),
        SortBy::Bikes => stations.sort_by(|a, b| {
            b.properties
                .ebikes_available
                .cmp(&a.properties.ebikes_available)
        }),
        SortBy::Docks => stations.sort_by(|a, b| {
            b.properties
                .docks_available
                .cmp(&a.properties.docks_available)
        }),
    }
}

/// Filter stations by availability
fn filter_stations(
    stations: Vec<StationFeature>,
    status_filter: &Option<StatusFilter>,
) -> Vec<StationFeature> {
    if let Some(filter) = status_filter {
        stations
            .into_iter()
            .filter(|feature| match filter {
                StatusFilter::Available => feature.properties.status() == StationStatus::Available,
                StatusFilter::Limited => feature.properties.status() == StationStatus::Limited,
                StatusFilter::Unavailable => {
                    feature.properties.status() == StationStatus::Unavailable
                }
            })
            .collect()
    } else {
        stations
    }
}

/// Display the label line and map summary above the table
pub fn display_header(label: &str, freshness: &MapFreshness, station_count: usize) {
    println!("{} {}", freshness_indicator(freshness), label.bright_white().bold());
    println!("{} {}", "Stations:".bright_blue().bold(), station_count);
    println!();
}

/// Display stations in table format
pub fn display_station_table(stations: &[StationFeature]) {
    println!(
        "{:<3} {:<25} {:<7} {:<7} {:<6}",
        "ST".bright_white().bold(),
        "STATION".bright_white().bold(),
        "BIKES".bright_white().bold(),
        "DOCKS".bright_white().bold(),
        "ELEC".bright_white().bold()
    );
    println!("{}", "─".repeat(52).bright_blue());

    for feature in stations {
        let props = &feature.properties;
        let status_indicator = station_status_indicator(&props.status());
        // char-based truncation, station names are accented French
        let name = if props.station.chars().count() > 23 {
            let short: String = props.station.chars().take(20).collect();
            format!("{}...", short)
        } else {
            props.station.clone()
        };

        println!(
            "{:<3} {:<25} {:<7} {:<7} {:<6}",
            status_indicator,
            name,
            format!("{}/{}", props.ebikes_available, props.docks_total),
            props.docks_available,
            if props.electrified { "yes" } else { "no" }
        );
    }
}

/// Display stations in compact format
fn display_stations_compact(stations: &[StationFeature]) {
    for feature in stations {
        let props = &feature.properties;
        let status_indicator = station_status_indicator(&props.status());
        println!(
            "{} {} ({}/{})",
            status_indicator, props.station, props.ebikes_available, props.docks_total
        );
    }
}

pub async fn run(
    base_url: Option<String>,
    host: String,
    port: u16,
    path: String,
    format: OutputFormat,
    sort: SortBy,
    status: Option<StatusFilter>,
    config: WatchConfig,
) -> anyhow::Result<()> {
    let url = parse_resource_url(base_url.as_deref(), &host, port, &path)?;
    let client = Client::new();

    let map = fetch_station_map(&client, &url).await?;
    let updated = map.updated_at()?;
    let elapsed_ms = elapsed_since(updated, Utc::now());
    let label = updated_label(elapsed_ms, config.locale());
    let freshness = config.classify_freshness(&updated);

    let mut stations = filter_stations(map.features.clone(), &status);
    sort_stations(&mut stations, &sort);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stations)?);
        }
        OutputFormat::Table => {
            display_header(&label, &freshness, stations.len());
            if stations.is_empty() {
                println!("{}", "No stations found.".yellow());
            } else {
                display_station_table(&stations);
            }
        }
        OutputFormat::Compact => {
            println!("{}", label.bright_white().bold());
            if stations.is_empty() {
                println!("{}", "No stations found.".yellow());
            } else {
                display_stations_compact(&stations);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::types::{PointGeometry, StationProperties};

    fn feature(name: &str, bikes: u32, docks: u32) -> StationFeature {
        StationFeature {
            id: name.to_string(),
            kind: "Feature".to_string(),
            geometry: PointGeometry {
                kind: "Point".to_string(),
                coordinates: [4.35818, 43.8353],
            },
            properties: StationProperties {
                station: name.to_string(),
                electrified: false,
                docks_total: 10,
                docks_available: docks,
                ebikes_available: bikes,
                note: String::new(),
            },
        }
    }

    #[test]
    fn test_sort_by_bikes_descending() {
        let mut stations = vec![feature("a", 1, 5), feature("b", 6, 5), feature("c", 3, 5)];
        sort_stations(&mut stations, &SortBy::Bikes);
        let names: Vec<_> = stations.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(names, ["b", "c", "a"]);
    }

    #[test]
    fn test_sort_by_name() {
        let mut stations = vec![feature("c", 1, 5), feature("a", 6, 5), feature("b", 3, 5)];
        sort_stations(&mut stations, &SortBy::Name);
        let names: Vec<_> = stations.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_filter_by_availability() {
        let stations = vec![
            feature("available", 6, 4),
            feature("limited", 0, 4),
            feature("unavailable", 0, 0),
        ];
        let filtered = filter_stations(stations.clone(), &Some(StatusFilter::Limited));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "limited");

        let unfiltered = filter_stations(stations, &None);
        assert_eq!(unfiltered.len(), 3);
    }
}
