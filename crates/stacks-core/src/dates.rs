//! # Boundary Date Format
//!
//! Dates cross the console boundary as `MM/DD/YYYY`. Inside the store they
//! are ISO `YYYY-MM-DD` text, which sqlx handles for `NaiveDate` directly.

use chrono::NaiveDate;

use crate::error::ValidationError;

/// Format used for every date shown to or typed by a user.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Parses a `MM/DD/YYYY` date.
///
/// ## Example
/// ```rust
/// use stacks_core::dates::parse_date;
///
/// let d = parse_date("dob", "07/04/1990").unwrap();
/// assert_eq!(d.to_string(), "1990-07-04");
/// assert!(parse_date("dob", "1990-07-04").is_err());
/// ```
pub fn parse_date(field: &str, input: &str) -> Result<NaiveDate, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::required(field));
    }

    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|_| ValidationError::invalid_format(field, "expected MM/DD/YYYY"))
}

/// Formats a date as `MM/DD/YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_format() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(format_date(date), "02/29/2024");
        assert_eq!(parse_date("due", "02/29/2024").unwrap(), date);
    }

    #[test]
    fn test_rejects_impossible_and_foreign_dates() {
        assert!(parse_date("dob", "02/30/2024").is_err());
        assert!(parse_date("dob", "13/01/2024").is_err());
        assert!(parse_date("dob", "2024-01-13").is_err());
    }

    #[test]
    fn test_empty_is_required() {
        assert!(matches!(
            parse_date("dob", "  "),
            Err(ValidationError::Required { .. })
        ));
    }
}
