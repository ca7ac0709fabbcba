//! Top-area ranking over the enriched collection.
//!
//! For a fixed set of metrics, keep the twenty areas with the highest
//! strictly-positive values, tagged with a display name and an approximate
//! centroid so the map client can label and fly to them.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, JsonValue, Value};
use serde::Serialize;

/// Metrics that get a ranked list: the two aggregates plus the
/// country/type combinations with communities large enough to fill one.
/// Deliberately enumerated rather than derived from the registry.
pub const TOP_METRICS: &[&str] = &[
    "soviet_origin_pct",
    "soviet_birth_pct",
    "russia_origin_pct",
    "russia_birth_pct",
    "ukraine_origin_pct",
    "ukraine_birth_pct",
    "ussr_origin_pct",
    "ussr_birth_pct",
    "belarus_origin_pct",
    "uzbekistan_origin_pct",
];

/// How many areas each ranked list keeps.
pub const TOP_COUNT: usize = 20;

/// Display-name properties tried in order; areas carrying neither get the
/// fallback label.
const NAME_PROPERTIES: [&str; 2] = ["SHEM_YISHUV", "SHEM_YISHUV_ENGLISH"];
const FALLBACK_NAME: &str = "Unknown";

/// One ranked area: display name, metric value (2 dp), centroid (6 dp,
/// lon/lat order as in the source coordinates).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopArea {
    pub name: String,
    pub value: f64,
    pub center: [f64; 2],
}

/// Ranked lists keyed by metric name.
pub type TopAreas = BTreeMap<String, Vec<TopArea>>;

/// Rank every metric in [`TOP_METRICS`] over the enriched collection.
///
/// Values are rounded before sorting, the sort is stable, so areas whose
/// rounded values tie keep their scan order.
pub fn rank_features(collection: &FeatureCollection) -> TopAreas {
    let mut top = TopAreas::new();
    for &metric in TOP_METRICS {
        let mut areas: Vec<TopArea> = collection
            .features
            .iter()
            .filter_map(|feature| {
                let value = feature.property(metric).and_then(JsonValue::as_f64)?;
                if value <= 0.0 {
                    return None;
                }
                let [lon, lat] = centroid(feature);
                Some(TopArea {
                    name: display_name(feature),
                    value: round2(value),
                    center: [round6(lon), round6(lat)],
                })
            })
            .collect();
        areas.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
        areas.truncate(TOP_COUNT);
        top.insert(metric.to_string(), areas);
    }
    top
}

/// Write the ranked lists as a single JSON document.
pub fn write_top_areas(path: &Path, top: &TopAreas) -> Result<()> {
    let json = serde_json::to_string(top).context("failed to serialize top areas")?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

fn display_name(feature: &Feature) -> String {
    NAME_PROPERTIES
        .iter()
        .find_map(|prop| {
            feature
                .property(prop)
                .and_then(JsonValue::as_str)
                .filter(|name| !name.is_empty())
        })
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

/// Unweighted arithmetic mean of the outer-ring coordinates, closing
/// duplicate included. A multi-polygon uses only its first polygon's outer
/// ring; the published rankings depend on that approximation, so it must
/// not change. Other geometry shapes (or none) map to `[0, 0]`.
fn centroid(feature: &Feature) -> [f64; 2] {
    let ring = match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::Polygon(rings)) => rings.first(),
        Some(Value::MultiPolygon(polygons)) => polygons.first().and_then(|rings| rings.first()),
        _ => None,
    };
    let Some(ring) = ring.filter(|ring| !ring.is_empty()) else {
        return [0.0, 0.0];
    };
    let n = ring.len() as f64;
    let (sum_lon, sum_lat) = ring.iter().fold((0.0, 0.0), |(lon, lat), position| {
        (
            lon + position.first().copied().unwrap_or(0.0),
            lat + position.get(1).copied().unwrap_or(0.0),
        )
    });
    [sum_lon / n, sum_lat / n]
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}
