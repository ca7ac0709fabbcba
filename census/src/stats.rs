use std::collections::BTreeMap;

use serde::Serialize;

use crate::registry::COUNTRIES;

/// Metric suffix for country-of-origin percentages.
pub const ORIGIN_SUFFIX: &str = "origin_pct";
/// Metric suffix for country-of-birth percentages.
pub const BIRTH_SUFFIX: &str = "birth_pct";
/// Aggregate: sum of all per-country origin percentages.
pub const SOVIET_ORIGIN_PCT: &str = "soviet_origin_pct";
/// Aggregate: sum of all per-country birth percentages.
pub const SOVIET_BIRTH_PCT: &str = "soviet_birth_pct";

/// Compose a metric name like `russia_origin_pct`.
pub fn metric_name(country_id: &str, suffix: &str) -> String {
    format!("{country_id}_{suffix}")
}

/// Percentage metrics for one statistical area.
///
/// An entry starts zero-filled for every registry country and both
/// suffixes, so downstream consumers always see the full metric set no
/// matter which columns a census row actually carried. Observed values
/// overwrite the zeros; [`StatsEntry::finalize`] then computes the two
/// `soviet_*` aggregates from whatever the per-country values are at that
/// point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StatsEntry {
    metrics: BTreeMap<String, f64>,
}

impl StatsEntry {
    /// A fresh entry with every per-country metric set to 0.0.
    ///
    /// Aggregates are not present until [`StatsEntry::finalize`] runs.
    pub fn zeroed() -> Self {
        let mut metrics = BTreeMap::new();
        for country in COUNTRIES {
            metrics.insert(metric_name(country.id, ORIGIN_SUFFIX), 0.0);
            metrics.insert(metric_name(country.id, BIRTH_SUFFIX), 0.0);
        }
        Self { metrics }
    }

    /// Record an observed value, overwriting the zero (or a previous value).
    pub fn insert(&mut self, metric: String, value: f64) {
        self.metrics.insert(metric, value);
    }

    /// Compute the `soviet_origin_pct` / `soviet_birth_pct` aggregates as
    /// the sums of the current per-country values. Idempotent: the sums
    /// only range over registry-derived metrics, never over the aggregates
    /// themselves.
    pub fn finalize(&mut self) {
        let origin: f64 = COUNTRIES
            .iter()
            .map(|c| self.get(&metric_name(c.id, ORIGIN_SUFFIX)))
            .sum();
        let birth: f64 = COUNTRIES
            .iter()
            .map(|c| self.get(&metric_name(c.id, BIRTH_SUFFIX)))
            .sum();
        self.metrics.insert(SOVIET_ORIGIN_PCT.to_string(), origin);
        self.metrics.insert(SOVIET_BIRTH_PCT.to_string(), birth);
    }

    /// Value for a metric, 0.0 when absent.
    pub fn get(&self, metric: &str) -> f64 {
        self.metrics.get(metric).copied().unwrap_or(0.0)
    }

    /// All metrics in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.metrics.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Number of metrics currently present.
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// The complete zero entry: zero-filled and finalized, so both aggregates
/// are present at 0.0. Written to features that match no census row.
impl Default for StatsEntry {
    fn default() -> Self {
        let mut entry = Self::zeroed();
        entry.finalize();
        entry
    }
}
