//! Date normalization for Norwegian source dates.

use chrono::NaiveDate;
use tracing::debug;

/// Normalize a `DD.MM.YYYY`-style date (also `/` or `-` separated) to ISO
/// `YYYY-MM-DD`.
///
/// Unparseable dates are passed through unchanged; the quality layer flags
/// them later rather than this function failing.
pub fn normalize_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => {
            debug!("date left unnormalized: {:?}", raw);
            raw.to_string()
        }
    }
}

/// Parse a `DD.MM.YYYY`-style date, tolerating `.`, `/` and `-` separators
/// and missing zero-padding.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.trim().replace([' '], "");
    let parts: Vec<&str> = cleaned.split(['.', '/', '-']).collect();
    if parts.len() != 3 {
        return None;
    }

    let day: u32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let year: i32 = parts[2].parse().ok()?;
    if parts[2].len() != 4 {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_dotted_date() {
        assert_eq!(normalize_date("15.01.2024"), "2024-01-15");
    }

    #[test]
    fn test_normalize_tolerates_separators_and_padding() {
        assert_eq!(normalize_date("1/2/2024"), "2024-02-01");
        assert_eq!(normalize_date("01-12-2023"), "2023-12-01");
    }

    #[test]
    fn test_unparseable_passed_through() {
        assert_eq!(normalize_date("31.02.2024"), "31.02.2024");
        assert_eq!(normalize_date("snarest"), "snarest");
        assert_eq!(normalize_date("15.01.24"), "15.01.24");
    }
}
