use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Station availability enum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StationStatus {
    Available,   // e-bikes and free docks both present
    Limited,     // out of e-bikes or out of free docks
    Unavailable, // out of both
}

/// Map freshness enum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapFreshness {
    Fresh, // updated within the fresh threshold
    Aging, // updated within the stale threshold
    Stale, // beyond the stale threshold, re-checked upstream
}

/// GeoJSON FeatureCollection as published by the map builder (RFC 7946 plus a
/// top-level `last_updated` stamp)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationMap {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<StationFeature>,
    pub last_updated: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationFeature {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: PointGeometry,
    pub properties: StationProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]` per GeoJSON
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationProperties {
    pub station: String,
    pub electrified: bool,
    pub docks_total: u32,
    pub docks_available: u32,
    pub ebikes_available: u32,
    #[serde(default)]
    pub note: String,
}

impl StationMap {
    /// Parsed `last_updated` instant.
    pub fn updated_at(&self) -> anyhow::Result<DateTime<Utc>> {
        parse_last_updated(&self.last_updated)
    }
}

impl StationProperties {
    pub fn status(&self) -> StationStatus {
        match (self.ebikes_available, self.docks_available) {
            (0, 0) => StationStatus::Unavailable,
            (0, _) | (_, 0) => StationStatus::Limited,
            _ => StationStatus::Available,
        }
    }
}

/// Parse the builder's `%Y-%m-%d %H:%M:%S%z` stamp, accepting RFC 3339 as well.
pub fn parse_last_updated(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%z") {
        return Ok(dt.with_timezone(&Utc));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("unparseable last_updated timestamp `{}`", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_builder_stamp() {
        let dt = parse_last_updated("2024-01-01 00:00:00+0000").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_parse_rfc3339_stamp() {
        let a = parse_last_updated("2024-01-01T00:00:00Z").unwrap();
        let b = parse_last_updated("2024-01-01 00:00:00+0000").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_offset_is_normalized() {
        let a = parse_last_updated("2024-01-01 02:00:00+0200").unwrap();
        let b = parse_last_updated("2024-01-01 00:00:00+0000").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_last_updated("yesterday").unwrap_err();
        assert!(err.to_string().contains("last_updated"));
    }

    #[test]
    fn test_station_status_classification() {
        let mut props = StationProperties {
            station: "Arènes".to_string(),
            electrified: true,
            docks_total: 10,
            docks_available: 4,
            ebikes_available: 6,
            note: String::new(),
        };
        assert_eq!(props.status(), StationStatus::Available);

        props.ebikes_available = 0;
        assert_eq!(props.status(), StationStatus::Limited);

        props.ebikes_available = 6;
        props.docks_available = 0;
        assert_eq!(props.status(), StationStatus::Limited);

        props.ebikes_available = 0;
        assert_eq!(props.status(), StationStatus::Unavailable);
    }

    #[test]
    fn test_station_map_deserialization() {
        let doc = json!({
            "type": "FeatureCollection",
            "last_updated": "2024-01-01 00:00:00+0000",
            "features": [{
                "id": "gxMzY",
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [4.35818, 43.8353] },
                "properties": {
                    "station": "Arènes",
                    "electrified": false,
                    "docks_total": 10,
                    "docks_available": 4,
                    "ebikes_available": 6
                }
            }]
        });
        let map: StationMap = serde_json::from_value(doc).unwrap();
        assert_eq!(map.kind, "FeatureCollection");
        assert_eq!(map.features.len(), 1);
        // longitude first, latitude second
        assert_eq!(map.features[0].geometry.coordinates[0], 4.35818);
        assert_eq!(map.features[0].geometry.coordinates[1], 43.8353);
        // `note` is optional in hand-written documents
        assert_eq!(map.features[0].properties.note, "");
        assert!(map.updated_at().is_ok());
    }
}
