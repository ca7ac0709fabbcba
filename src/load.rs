//! Census extract ingestion and aggregation.
//!
//! The extract is noisy real-world data: cells go missing and numbers
//! arrive as float text. Everything row-level degrades to "no
//! contribution" silently; only structural problems (missing file,
//! unreadable CSV) abort the run.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use census::{derive_key, match_country, metric_name, StatsEntry, BIRTH_SUFFIX, ORIGIN_SUFFIX};
use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::schema::{BIRTH_PAIRS, ORIGIN_PAIRS, SETTLEMENT_COL, STAT_AREA_COL};

/// Aggregated statistics keyed by composite area key.
pub type StatsByKey = HashMap<String, StatsEntry>;

/// Pull one `(metric, value)` pair out of a record, if the named columns
/// hold a recognized country and a parseable percentage. Out-of-bounds
/// columns, unmatched country text and unparseable numbers all yield
/// `None`.
pub fn extract_country_pct(
    record: &StringRecord,
    country_col: usize,
    pct_col: usize,
    suffix: &str,
) -> Option<(String, f64)> {
    let country = match_country(record.get(country_col)?)?;
    let pct: f64 = record.get(pct_col)?.trim().parse().ok()?;
    Some((metric_name(country.id, suffix), pct))
}

/// Turn one census record into a finalized `(key, entry)` pair, or `None`
/// when the record has no usable composite key.
pub fn process_record(record: &StringRecord) -> Option<(String, StatsEntry)> {
    let key = derive_key(record.get(SETTLEMENT_COL), record.get(STAT_AREA_COL))?;

    let mut entry = StatsEntry::zeroed();
    for (country_col, pct_col) in ORIGIN_PAIRS {
        if let Some((metric, value)) = extract_country_pct(record, country_col, pct_col, ORIGIN_SUFFIX)
        {
            entry.insert(metric, value);
        }
    }
    for (country_col, pct_col) in BIRTH_PAIRS {
        if let Some((metric, value)) = extract_country_pct(record, country_col, pct_col, BIRTH_SUFFIX)
        {
            entry.insert(metric, value);
        }
    }
    entry.finalize();

    Some((key, entry))
}

/// Load the whole extract into a key → entry map.
///
/// A key that recurs across records keeps only the later record's entry;
/// partial fields are never merged across rows.
pub fn load_census(path: &Path) -> Result<StatsByKey> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open census extract {}", path.display()))?;

    let stats = aggregate(reader);
    info!(areas = stats.len(), "aggregated census extract");
    Ok(stats)
}

fn aggregate<R: Read>(mut reader: csv::Reader<R>) -> StatsByKey {
    let mut stats = StatsByKey::new();
    let mut skipped = 0usize;
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                warn!(%err, "skipping unreadable census record");
                continue;
            }
        };
        match process_record(&record) {
            Some((key, entry)) => {
                stats.insert(key, entry);
            }
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!(skipped, "census records without a usable area key");
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use census::{SOVIET_BIRTH_PCT, SOVIET_ORIGIN_PCT};

    /// A record wide enough for the full schema, with the given cells
    /// placed at specific columns.
    fn record_with(cells: &[(usize, &str)]) -> StringRecord {
        let mut fields = vec![""; 80];
        for (col, value) in cells {
            fields[*col] = value;
        }
        StringRecord::from(fields)
    }

    fn reader_for(data: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data.as_bytes())
    }

    #[test]
    fn extracts_recognized_country_value() {
        let record = record_with(&[(61, "רוסיה"), (62, "12.5")]);
        let (metric, value) = extract_country_pct(&record, 61, 62, ORIGIN_SUFFIX).unwrap();
        assert_eq!(metric, "russia_origin_pct");
        assert_eq!(value, 12.5);
    }

    #[test]
    fn out_of_bounds_columns_yield_none() {
        let record = StringRecord::from(vec!["a", "b", "c"]);
        assert!(extract_country_pct(&record, 61, 62, ORIGIN_SUFFIX).is_none());
    }

    #[test]
    fn unmatched_country_or_bad_number_yield_none() {
        let unmatched = record_with(&[(61, "צרפת"), (62, "12.5")]);
        assert!(extract_country_pct(&unmatched, 61, 62, ORIGIN_SUFFIX).is_none());

        let bad_number = record_with(&[(61, "רוסיה"), (62, "abc")]);
        assert!(extract_country_pct(&bad_number, 61, 62, ORIGIN_SUFFIX).is_none());

        let empty_number = record_with(&[(61, "רוסיה"), (62, "")]);
        assert!(extract_country_pct(&empty_number, 61, 62, ORIGIN_SUFFIX).is_none());
    }

    #[test]
    fn record_without_key_is_dropped() {
        let record = record_with(&[(1, ""), (2, "3"), (61, "רוסיה"), (62, "12.5")]);
        assert!(process_record(&record).is_none());
    }

    #[test]
    fn short_record_still_aggregates_with_zeros() {
        // Key columns present, every stats column out of bounds: the area
        // still gets a complete zero entry.
        let record = StringRecord::from(vec!["x", "12", "3"]);
        let (key, entry) = process_record(&record).unwrap();
        assert_eq!(key, "120003");
        assert_eq!(entry.get(SOVIET_ORIGIN_PCT), 0.0);
        assert_eq!(entry.get("russia_origin_pct"), 0.0);
    }

    #[test]
    fn record_aggregates_origin_and_birth_pairs() {
        let record = record_with(&[
            (1, "7000"),
            (2, "62"),
            (61, "רוסיה"),
            (62, "10.5"),
            (63, "אוקראינה"),
            (64, "4.5"),
            (69, "רוסיה"),
            (70, "7.0"),
        ]);
        let (key, entry) = process_record(&record).unwrap();
        assert_eq!(key, "70000062");
        assert_eq!(entry.get("russia_origin_pct"), 10.5);
        assert_eq!(entry.get("ukraine_origin_pct"), 4.5);
        assert_eq!(entry.get(SOVIET_ORIGIN_PCT), 15.0);
        assert_eq!(entry.get("russia_birth_pct"), 7.0);
        assert_eq!(entry.get(SOVIET_BIRTH_PCT), 7.0);
    }

    #[test]
    fn later_record_replaces_earlier_on_duplicate_key() {
        let mut first = vec![""; 80];
        first[1] = "12";
        first[2] = "3";
        first[61] = "רוסיה";
        first[62] = "10.0";
        let mut second = vec![""; 80];
        second[1] = "12";
        second[2] = "3";
        second[63] = "אוקראינה";
        second[64] = "4.0";
        let data = format!("{}\n{}\n", first.join(","), second.join(","));

        let stats = aggregate(reader_for(&data));
        assert_eq!(stats.len(), 1);
        let entry = &stats["120003"];
        // The whole entry is replaced, not merged: russia's 10.0 is gone.
        assert_eq!(entry.get("russia_origin_pct"), 0.0);
        assert_eq!(entry.get("ukraine_origin_pct"), 4.0);
        assert_eq!(entry.get(SOVIET_ORIGIN_PCT), 4.0);
    }

    #[test]
    fn rows_without_keys_are_skipped_not_fatal() {
        let data = "x,12,3\nx,,\nx,abc,9\n";
        let stats = aggregate(reader_for(data));
        assert_eq!(stats.len(), 1);
        assert!(stats.contains_key("120003"));
    }
}
