/// Derive the composite settlement + statistical-area key.
///
/// The key matches the `YISHUV_STA` property carried by the boundary file:
/// the settlement code followed by the statistical-area code zero-padded to
/// four digits, e.g. settlement 7000 area 62 → `"70000062"`.
///
/// Census cells sometimes render the codes as float literals ("62.0");
/// those are truncated toward zero. A missing or unparseable code yields
/// `None` and the row is dropped from aggregation; bad keys are a data
/// quality condition, not an error.
pub fn derive_key(settlement: Option<&str>, stat_area: Option<&str>) -> Option<String> {
    let settlement = parse_code(settlement?)?;
    let stat_area = parse_code(stat_area?)?;
    Some(format!("{settlement}{stat_area:04}"))
}

fn parse_code(cell: &str) -> Option<i64> {
    let value: f64 = cell.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value as i64)
}
