//! The `build` command: query the upstream Ecovelo API and publish the
//! station map GeoJSON the watcher consumes.

use crate::logic::types::{PointGeometry, StationFeature, StationMap, StationProperties};
use anyhow::Context;
use chrono::Utc;
use colored::*;
use reqwest::Client;
use serde_json::Value;
use std::fs;

const ECOVELO_STATIONS_URL: &str = "https://api.cyclist.ecovelo.mobi/2025_03_24/stations";

const ELECTRIFIED_NOTE: &str = "Cette station est **raccordée** au réseau électrique.";
const FULL_STATION_NOTE: &str = "Le fait que la station soit pleine ne vous empêche pas \
     d'y retourner votre vélo. Il suffit d'accrocher votre vélo à un déjà présent, \
     en « caddie ».";

pub async fn run(
    program: String,
    output: String,
    user_agent: String,
    limit: u32,
) -> anyhow::Result<()> {
    let client = Client::new();
    let limit = limit.to_string();

    let resp = client
        .get(ECOVELO_STATIONS_URL)
        .header("Content-Type", "application/json")
        .header("User-Agent", &user_agent)
        .query(&[("program", program.as_str()), ("limit", limit.as_str())])
        .send()
        .await
        .context("request to the Ecovelo API failed")?;

    if !resp.status().is_success() {
        anyhow::bail!("Ecovelo API responded with HTTP {}", resp.status());
    }

    let body: Value = resp
        .json()
        .await
        .context("invalid JSON from the Ecovelo API")?;
    let data = body
        .get("data")
        .and_then(|d| d.as_array())
        .context("missing `data` member in the Ecovelo API response")?;

    let features: Vec<StationFeature> = data
        .iter()
        .filter_map(|object| convert_station(object, &program))
        .collect();

    let map = StationMap {
        kind: "FeatureCollection".to_string(),
        features,
        last_updated: Utc::now().format("%Y-%m-%d %H:%M:%S%z").to_string(),
    };

    let path = shellexpand::tilde(&output).to_string();
    fs::write(&path, serde_json::to_string_pretty(&map)?)
        .with_context(|| format!("cannot write {}", path))?;

    println!(
        "{} {} stations written to {}",
        "✓".green(),
        map.features.len(),
        path
    );
    Ok(())
}

/// Convert one upstream station object into a Feature. `None` drops objects
/// from other programs, non-stations, and records missing required members.
fn convert_station(object: &Value, program: &str) -> Option<StationFeature> {
    if object.get("program").and_then(|p| p.as_str()) != Some(program) {
        return None;
    }
    if object.get("object").and_then(|o| o.as_str()) != Some("station") {
        return None;
    }

    let electrified = object
        .get("electrical")
        .and_then(|e| e.as_bool())
        .unwrap_or(false);

    // Electric bike *docks* statistics
    let docks = object.get("statistics")?.get("docks")?.get("type")?.get("vae")?;
    let docks_total = docks.get("total")?.as_u64()? as u32;
    let docks_available = docks.get("free")?.as_u64()? as u32;
    let ebikes_available = object
        .get("statistics")?
        .get("vehicules")?
        .get("available")?
        .get("vae")?
        .as_u64()? as u32;

    let mut notes = Vec::new();
    if electrified {
        notes.push(ELECTRIFIED_NOTE);
    }
    // No free docks left at this station
    if docks_available == 0 {
        notes.push(FULL_STATION_NOTE);
    }

    let position = object.get("position")?;

    Some(StationFeature {
        // upstream station ID is kept as identifier
        id: object.get("id")?.as_str()?.to_string(),
        kind: "Feature".to_string(),
        geometry: PointGeometry {
            kind: "Point".to_string(),
            coordinates: [
                position.get("longitude")?.as_f64()?,
                position.get("latitude")?.as_f64()?,
            ],
        },
        properties: StationProperties {
            station: object.get("name")?.as_str()?.to_string(),
            electrified,
            docks_total,
            docks_available,
            ebikes_available,
            note: notes.join("\r\n"),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn upstream_station(program: &str, free_docks: u64, electrical: bool) -> Value {
        json!({
            "id": "gxMzY",
            "object": "station",
            "program": program,
            "name": "Arènes",
            "electrical": electrical,
            "position": { "longitude": 4.35818, "latitude": 43.8353 },
            "statistics": {
                "docks": { "type": { "vae": { "total": 10, "free": free_docks } } },
                "vehicules": { "available": { "vae": 6 } }
            }
        })
    }

    #[test]
    fn test_converts_matching_station() {
        let feature = convert_station(&upstream_station("nemovelo", 4, false), "nemovelo").unwrap();
        assert_eq!(feature.id, "gxMzY");
        assert_eq!(feature.kind, "Feature");
        assert_eq!(feature.properties.station, "Arènes");
        assert_eq!(feature.properties.docks_total, 10);
        assert_eq!(feature.properties.docks_available, 4);
        assert_eq!(feature.properties.ebikes_available, 6);
        // longitude first per GeoJSON
        assert_eq!(feature.geometry.coordinates, [4.35818, 43.8353]);
        assert_eq!(feature.properties.note, "");
    }

    #[test]
    fn test_drops_foreign_program() {
        assert!(convert_station(&upstream_station("other", 4, false), "nemovelo").is_none());
    }

    #[test]
    fn test_drops_non_station_objects() {
        let mut object = upstream_station("nemovelo", 4, false);
        object["object"] = json!("hub");
        assert!(convert_station(&object, "nemovelo").is_none());
    }

    #[test]
    fn test_electrified_note() {
        let feature = convert_station(&upstream_station("nemovelo", 4, true), "nemovelo").unwrap();
        assert!(feature.properties.electrified);
        assert_eq!(feature.properties.note, ELECTRIFIED_NOTE);
    }

    #[test]
    fn test_full_station_gets_caddie_note() {
        let feature = convert_station(&upstream_station("nemovelo", 0, false), "nemovelo").unwrap();
        assert_eq!(feature.properties.note, FULL_STATION_NOTE);

        let feature = convert_station(&upstream_station("nemovelo", 1, false), "nemovelo").unwrap();
        assert_eq!(feature.properties.note, "");
    }

    #[test]
    fn test_notes_join_electrified_first() {
        let feature = convert_station(&upstream_station("nemovelo", 0, true), "nemovelo").unwrap();
        assert_eq!(
            feature.properties.note,
            format!("{}\r\n{}", ELECTRIFIED_NOTE, FULL_STATION_NOTE)
        );
    }

    #[test]
    fn test_missing_statistics_drops_station() {
        let mut object = upstream_station("nemovelo", 4, false);
        object.as_object_mut().unwrap().remove("statistics");
        assert!(convert_station(&object, "nemovelo").is_none());
    }
}
