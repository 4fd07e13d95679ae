//! Utility functions for metrics processing

/// Parse a human readable size such as `1.5 GB` into bytes
///
/// Accepts B, K/KB/KiB through E/EB/EiB in any case, with or without a space
/// between number and unit. Multiples are binary; fractional bytes are dropped.
pub fn parse_human_bytes(s: &str) -> Option<u64> {
    let s = s.trim();
    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);
    if number.is_empty() {
        return None;
    }
    let value: f64 = number.parse().ok()?;

    let unit = unit.trim().to_ascii_uppercase();
    let prefix = unit
        .strip_suffix("IB")
        .or_else(|| unit.strip_suffix('B'))
        .unwrap_or(&unit);
    let exponent = match prefix {
        "" => 0,
        "K" => 1,
        "M" => 2,
        "G" => 3,
        "T" => 4,
        "P" => 5,
        "E" => 6,
        _ => return None,
    };

    Some((value * 1024f64.powi(exponent)) as u64)
}
