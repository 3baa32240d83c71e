// src/config/duration.rs

use std::time::Duration;

/// Parse a duration string like `"100ms"`, `"1.5s"`, `"2m"` or `"0"`.
///
/// Supported units: `us`, `ms`, `s`, `m`, `h`. A unit is required unless the
/// value is exactly zero.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    // Find the boundary between the number and the unit suffix.
    let idx = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '.')
        .map(|(i, _)| i)
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    if num_part.is_empty() {
        return Err(format!("duration '{s}' has no number"));
    }
    let unit = unit_part.trim().to_lowercase();
    let nanos_per_unit: u64 = match unit.as_str() {
        "us" | "µs" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" => 60 * 1_000_000_000,
        "h" => 60 * 60 * 1_000_000_000,
        _ => {
            return Err(format!(
                "unsupported duration unit '{unit}'; expected us, ms, s, m, or h"
            ));
        }
    };

    if num_part.contains('.') {
        let value: f64 = num_part
            .parse()
            .map_err(|e| format!("invalid duration number '{num_part}': {e}"))?;
        let nanos = value * nanos_per_unit as f64;
        if !nanos.is_finite() || nanos > u64::MAX as f64 {
            return Err(format!("duration '{s}' is out of range"));
        }
        Ok(Duration::from_nanos(nanos.round() as u64))
    } else {
        let value: u64 = num_part
            .parse()
            .map_err(|e| format!("invalid duration number '{num_part}': {e}"))?;
        value
            .checked_mul(nanos_per_unit)
            .map(Duration::from_nanos)
            .ok_or_else(|| format!("duration '{s}' is out of range"))
    }
}
