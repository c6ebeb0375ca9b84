//! Numeric parsing helpers shared by the readers and the normalizer.

/// Parses a string as f64, returning None for invalid or empty strings.
///
/// Footnote markers and other non-numeric cell content are tolerated and
/// yield `None` rather than an error.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Formats a floating-point number as a label, dropping a zero fraction.
///
/// Spreadsheet readers hand numeric headers back as floats, so a year header
/// arrives as `1990.0` and must render as `"1990"`.
pub fn format_numeric(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_f64_tolerates_markers() {
        assert_eq!(parse_f64(" 12.5 "), Some(12.5));
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("(a)"), None);
        assert_eq!(parse_f64("NaN"), None);
    }

    #[test]
    fn format_numeric_drops_zero_fraction() {
        assert_eq!(format_numeric(1990.0), "1990");
        assert_eq!(format_numeric(10.0), "10");
        assert_eq!(format_numeric(2.5), "2.5");
    }
}
