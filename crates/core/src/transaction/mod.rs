//! Declaration/invoice currency records: input normalisation and list queries.

mod draft;
mod query;

pub use draft::{NormalizedTransaction, TransactionDraft};
pub use query::TransactionQuery;

use chrono::NaiveDate;

/// Parses a strict `YYYY-MM-DD` calendar date.
#[must_use]
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_iso_date("2025-01-15"),
            NaiveDate::from_ymd_opt(2025, 1, 15)
        );
        assert_eq!(
            parse_iso_date("2024-02-29"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[rstest]
    #[case("")]
    #[case("2025-1-15")]
    #[case("2025/01/15")]
    #[case("2025-02-30")]
    #[case("2023-02-29")]
    #[case("15-01-2025")]
    #[case("2025-01-15T00:00:00Z")]
    #[case("2025-13-01")]
    fn test_parse_iso_date_rejects(#[case] input: &str) {
        assert_eq!(parse_iso_date(input), None);
    }
}
