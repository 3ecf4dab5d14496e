// =============================================================================
// Numeric formatting for market snapshots
// =============================================================================
//
// Every number leaving the market module goes through one of these helpers so
// the wire format is uniform: prices carry two decimals, large magnitudes are
// abbreviated (T/B/M), and missing ratios render as the "N/A" sentinel rather
// than being dropped from the payload.
// =============================================================================

/// Round a price-like value to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render a large magnitude (volume, market cap) as a human-readable string.
///
/// Suffix thresholds: `T` >= 1e12, `B` >= 1e9, `M` >= 1e6, each with two
/// decimals. Anything smaller is a thousands-separated integer.
///
/// # Edge cases
/// - `None` or a non-finite value stays `None` — the field is simply absent.
/// - `format_magnitude(Some(1_500_000_000.0))` => `"1.50B"`
/// - `format_magnitude(Some(999.0))` => `"999"`
pub fn format_magnitude(value: Option<f64>) -> Option<String> {
    let v = value?;
    if !v.is_finite() {
        return None;
    }

    let formatted = if v >= 1e12 {
        format!("{:.2}T", v / 1e12)
    } else if v >= 1e9 {
        format!("{:.2}B", v / 1e9)
    } else if v >= 1e6 {
        format!("{:.2}M", v / 1e6)
    } else {
        thousands(v.round() as u64)
    };

    Some(formatted)
}

/// Format a ratio (e.g. P/E) with two decimals, or the `"N/A"` sentinel when
/// the value is absent or non-finite.
pub fn format_ratio(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => "N/A".to_string(),
    }
}

/// Format a percentage (e.g. dividend yield) with two decimals and a trailing
/// `%`, or the `"N/A%"` sentinel when the value is absent or non-finite.
///
/// The input is expected in percent units already (1.23 means 1.23 %).
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}%"),
        _ => "N/A%".to_string(),
    }
}

/// Insert thousands separators into a non-negative integer.
fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    // ---- round2 ----------------------------------------------------------

    #[test]
    fn round2_truncates_to_two_places() {
        assert!((round2(123.456) - 123.46).abs() < 1e-10);
        assert!((round2(123.454) - 123.45).abs() < 1e-10);
        assert!((round2(100.0) - 100.0).abs() < 1e-10);
    }

    // ---- format_magnitude ------------------------------------------------

    #[test]
    fn magnitude_trillions() {
        assert_eq!(format_magnitude(Some(2.8e12)).unwrap(), "2.80T");
        assert_eq!(format_magnitude(Some(1e12)).unwrap(), "1.00T");
    }

    #[test]
    fn magnitude_billions() {
        assert_eq!(format_magnitude(Some(1_500_000_000.0)).unwrap(), "1.50B");
    }

    #[test]
    fn magnitude_millions() {
        assert_eq!(format_magnitude(Some(2_500_000.0)).unwrap(), "2.50M");
    }

    #[test]
    fn magnitude_small_values_use_thousands_separators() {
        assert_eq!(format_magnitude(Some(999.0)).unwrap(), "999");
        assert_eq!(format_magnitude(Some(1_500.0)).unwrap(), "1,500");
        assert_eq!(format_magnitude(Some(999_999.0)).unwrap(), "999,999");
    }

    #[test]
    fn magnitude_absent_stays_absent() {
        assert_eq!(format_magnitude(None), None);
        assert_eq!(format_magnitude(Some(f64::NAN)), None);
    }

    #[test]
    fn magnitude_boundary_just_below_suffix() {
        // 999,999,999 is still in the M band, not B.
        assert_eq!(format_magnitude(Some(999_999_999.0)).unwrap(), "1000.00M");
    }

    // ---- format_ratio / format_percent -----------------------------------

    #[test]
    fn ratio_two_decimals() {
        assert_eq!(format_ratio(Some(28.5)), "28.50");
        assert_eq!(format_ratio(Some(12.345)), "12.35");
    }

    #[test]
    fn ratio_sentinel_when_absent() {
        assert_eq!(format_ratio(None), "N/A");
        assert_eq!(format_ratio(Some(f64::INFINITY)), "N/A");
    }

    #[test]
    fn percent_two_decimals_with_suffix() {
        assert_eq!(format_percent(Some(1.234)), "1.23%");
        assert_eq!(format_percent(Some(0.5)), "0.50%");
    }

    #[test]
    fn percent_sentinel_when_absent() {
        assert_eq!(format_percent(None), "N/A%");
    }
}
