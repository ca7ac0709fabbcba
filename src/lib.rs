//! Census enrichment pipeline and map server for post-Soviet communities
//! in Israel.
//!
//! The `enrich` run loads the census extract, joins it into the
//! statistical-area GeoJSON by composite settlement/stat-area key, writes
//! the enriched collection back, and ranks the strongest areas per metric.
//! The `serve` run hosts the client and its data files with byte-range
//! support. Pure matching and aggregation primitives live in the
//! [`census`] crate.

pub mod cli;
pub mod enrich;
pub mod load;
pub mod rank;
pub mod report;
pub mod schema;
pub mod serve;
