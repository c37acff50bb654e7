//! Publication dates as shown on rendered widgets.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a CMS timestamp into its calendar date.
///
/// Accepts RFC 3339 (`2024-03-05T10:00:00+02:00`), Directus datetimes
/// without offset (`2024-03-05T10:00:00`, optional fraction) and plain dates.
/// Offsets are kept as written: the date is the one the editor entered.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// `dd/mm/yyyy`, or an empty string when the timestamp is missing or invalid.
pub fn format_date(s: &str) -> String {
    parse_date(s)
        .map(|date| date.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rfc3339() {
        assert_eq!(format_date("2024-03-05T10:00:00Z"), "05/03/2024");
        assert_eq!(format_date("2024-12-31T23:30:00+02:00"), "31/12/2024");
    }

    #[test]
    fn test_format_without_offset() {
        assert_eq!(format_date("2023-01-09T08:15:00"), "09/01/2023");
        assert_eq!(format_date("2023-01-09T08:15:00.250"), "09/01/2023");
        assert_eq!(format_date("2023-01-09 08:15:00"), "09/01/2023");
    }

    #[test]
    fn test_format_plain_date() {
        assert_eq!(format_date("2020-02-29"), "29/02/2020");
    }

    #[test]
    fn test_invalid_dates() {
        assert_eq!(format_date(""), "");
        assert_eq!(format_date("yesterday"), "");
        assert_eq!(format_date("2021-02-29"), "");
    }
}
