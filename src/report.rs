//! End-of-run console summary: per-country maxima across all loaded areas.

use census::{metric_name, Country, BIRTH_SUFFIX, COUNTRIES, ORIGIN_SUFFIX};

use crate::load::StatsByKey;

/// Maxima and area counts for one origin country.
#[derive(Debug, Clone, PartialEq)]
pub struct CountrySummary {
    pub country: &'static Country,
    pub origin_max: f64,
    pub origin_areas: usize,
    pub birth_max: f64,
    pub birth_areas: usize,
}

/// Summaries for every country with at least one non-zero value, in
/// registry order.
pub fn summarize(stats: &StatsByKey) -> Vec<CountrySummary> {
    COUNTRIES
        .iter()
        .filter_map(|country| {
            let (origin_max, origin_areas) =
                metric_extent(stats, &metric_name(country.id, ORIGIN_SUFFIX));
            let (birth_max, birth_areas) =
                metric_extent(stats, &metric_name(country.id, BIRTH_SUFFIX));
            if origin_max <= 0.0 && birth_max <= 0.0 {
                return None;
            }
            Some(CountrySummary {
                country,
                origin_max,
                origin_areas,
                birth_max,
                birth_areas,
            })
        })
        .collect()
}

/// Print the summary table to stdout.
pub fn print_country_stats(stats: &StatsByKey) {
    println!();
    println!("Country statistics (max values found):");
    for summary in summarize(stats) {
        println!(
            "  {} {:<15} origin: max={:5.1}% ({:4} areas)  birth: max={:5.1}% ({:4} areas)",
            summary.country.flag,
            summary.country.english,
            summary.origin_max,
            summary.origin_areas,
            summary.birth_max,
            summary.birth_areas,
        );
    }
}

fn metric_extent(stats: &StatsByKey, metric: &str) -> (f64, usize) {
    stats
        .values()
        .map(|entry| entry.get(metric))
        .filter(|&value| value > 0.0)
        .fold((0.0, 0), |(max, areas), value| (value.max(max), areas + 1))
}
