//! Merge aggregated statistics into the boundary feature collection.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use census::StatsEntry;
use geojson::{Feature, FeatureCollection, JsonValue};

use crate::load::StatsByKey;

/// Property holding each feature's composite area key.
pub const KEY_PROPERTY: &str = "YISHUV_STA";

/// Render the lookup key the way the aggregation side renders keys:
/// strings pass through, numbers use their JSON literal, anything else
/// (including a missing property) becomes the empty string, which matches
/// no real key.
fn feature_key(feature: &Feature) -> String {
    match feature.property(KEY_PROPERTY) {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Copy each feature's matching entry, or the zero default, into its
/// properties, so every feature leaves with the complete metric set and
/// downstream consumers never see a missing field. Returns the number of
/// features that matched a census entry.
pub fn merge_features(collection: &mut FeatureCollection, stats: &StatsByKey) -> usize {
    let default = StatsEntry::default();
    let mut matched = 0;
    for feature in &mut collection.features {
        let entry = match stats.get(&feature_key(feature)) {
            Some(entry) => {
                matched += 1;
                entry
            }
            None => &default,
        };
        for (metric, value) in entry.iter() {
            feature.set_property(metric, value);
        }
    }
    matched
}

/// Read the boundary document. A missing file or anything that isn't a
/// feature collection is a structural failure and aborts the run.
pub fn read_collection(path: &Path) -> Result<FeatureCollection> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read boundary file {}", path.display()))?;
    raw.parse()
        .with_context(|| format!("{} is not a GeoJSON feature collection", path.display()))
}

/// Rewrite the boundary document in place. Called only once the merge pass
/// has fully completed, so a failed run never leaves a half-written file.
pub fn write_collection(path: &Path, collection: &FeatureCollection) -> Result<()> {
    let json = serde_json::to_string(collection).context("failed to serialize boundary file")?;
    fs::write(path, json).with_context(|| format!("failed to rewrite {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use census::{COUNTRIES, SOVIET_BIRTH_PCT, SOVIET_ORIGIN_PCT};
    use serde_json::json;

    fn feature_with_key(key: JsonValue) -> Feature {
        let mut feature = Feature {
            bbox: None,
            geometry: None,
            id: None,
            properties: None,
            foreign_members: None,
        };
        feature.set_property(KEY_PROPERTY, key);
        feature
    }

    fn collection(features: Vec<Feature>) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    fn stats_with(key: &str, metric: &str, value: f64) -> StatsByKey {
        let mut entry = StatsEntry::zeroed();
        entry.insert(metric.to_string(), value);
        entry.finalize();
        let mut stats = StatsByKey::new();
        stats.insert(key.to_string(), entry);
        stats
    }

    #[test]
    fn matched_feature_gets_entry_values() {
        let stats = stats_with("120003", "russia_origin_pct", 12.5);
        let mut fc = collection(vec![feature_with_key(json!("120003"))]);

        let matched = merge_features(&mut fc, &stats);
        assert_eq!(matched, 1);
        let props = fc.features[0].properties.as_ref().unwrap();
        assert_eq!(props["russia_origin_pct"], json!(12.5));
        assert_eq!(props[SOVIET_ORIGIN_PCT], json!(12.5));
    }

    #[test]
    fn numeric_key_property_matches_string_key() {
        let stats = stats_with("120003", "russia_origin_pct", 3.0);
        let mut fc = collection(vec![feature_with_key(json!(120003))]);

        assert_eq!(merge_features(&mut fc, &stats), 1);
    }

    #[test]
    fn unmatched_and_keyless_features_get_full_zero_fill() {
        let stats = stats_with("120003", "russia_origin_pct", 3.0);
        let mut fc = collection(vec![
            feature_with_key(json!("999999")),
            Feature {
                bbox: None,
                geometry: None,
                id: None,
                properties: None,
                foreign_members: None,
            },
        ]);

        let matched = merge_features(&mut fc, &stats);
        assert_eq!(matched, 0);

        for feature in &fc.features {
            let props = feature.properties.as_ref().unwrap();
            for country in COUNTRIES {
                assert_eq!(props[&format!("{}_origin_pct", country.id)], json!(0.0));
                assert_eq!(props[&format!("{}_birth_pct", country.id)], json!(0.0));
            }
            assert_eq!(props[SOVIET_ORIGIN_PCT], json!(0.0));
            assert_eq!(props[SOVIET_BIRTH_PCT], json!(0.0));
        }
    }

    #[test]
    fn existing_properties_survive_the_merge() {
        let stats = stats_with("120003", "russia_origin_pct", 3.0);
        let mut fc = collection(vec![feature_with_key(json!("120003"))]);
        fc.features[0].set_property("SHEM_YISHUV", "חיפה");

        merge_features(&mut fc, &stats);
        let props = fc.features[0].properties.as_ref().unwrap();
        assert_eq!(props["SHEM_YISHUV"], json!("חיפה"));
        assert_eq!(props[KEY_PROPERTY], json!("120003"));
    }
}
