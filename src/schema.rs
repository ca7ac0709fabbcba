//! Positional layout of the census extract.
//!
//! The source file is headerless, so every offset below is a contract with
//! the published extract format rather than something discovered at
//! runtime. Keeping the offsets in one table makes schema drift a one-file
//! fix and keeps magic column numbers out of the loader.

/// 0-based column of the settlement code (SEMEL_YISHUV).
pub const SETTLEMENT_COL: usize = 1;

/// 0-based column of the statistical-area code within the settlement.
pub const STAT_AREA_COL: usize = 2;

/// (country name, percentage) column pairs carrying country-of-origin
/// figures. The extract has exactly four such pairs.
pub const ORIGIN_PAIRS: [(usize, usize); 4] = [(61, 62), (63, 64), (65, 66), (67, 68)];

/// (country name, percentage) column pairs carrying country-of-birth
/// figures. The extract has exactly three such pairs.
pub const BIRTH_PAIRS: [(usize, usize); 3] = [(69, 70), (71, 72), (73, 74)];
