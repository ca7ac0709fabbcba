//! Census-side domain model: the country registry, composite area keys,
//! and per-area statistics entries.
//!
//! Everything here is pure and I/O-free. Fallible derivations return
//! `Option` rather than errors: a census cell that fails to parse means
//! "no contribution", which is the documented tolerance policy for the
//! noisy source extracts, not a failure of the pipeline.

pub mod key;
pub mod registry;
pub mod stats;

pub use key::derive_key;
pub use registry::{match_country, Country, COUNTRIES};
pub use stats::{
    metric_name, StatsEntry, BIRTH_SUFFIX, ORIGIN_SUFFIX, SOVIET_BIRTH_PCT, SOVIET_ORIGIN_PCT,
};
