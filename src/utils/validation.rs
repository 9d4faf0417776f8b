//! Validation helpers
//! 
//! Field checks that the `validator` derive cannot express on its own:
//! clock times, date windows, Philippine contact numbers and route codes.

use chrono::{NaiveDate, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref ROUTE_CODE_REGEX: Regex = Regex::new(r"^[A-Z0-9][A-Z0-9-]{2,29}$").unwrap();
    static ref MOBILE_REGEX: Regex = Regex::new(r"^(09|\+639)\d{9}$").unwrap();
    static ref LANDLINE_REGEX: Regex = Regex::new(r"^\(?0\d{1,3}\)?[\s-]?\d{3,4}[\s-]?\d{4}$").unwrap();
}

/// Parse a `YYYY-MM-DD` date.
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Parse an `HH:MM` (or `HH:MM:SS`) clock time.
pub fn validate_time(value: &str) -> Result<NaiveTime, ValidationError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| {
            let mut error = ValidationError::new("time");
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &"HH:MM".to_string());
            error
        })
}

/// Mobile (`09XXXXXXXXX`, `+639XXXXXXXXX`) or landline number.
pub fn validate_contact_number(value: &str) -> Result<(), ValidationError> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    if MOBILE_REGEX.is_match(&compact) || LANDLINE_REGEX.is_match(value.trim()) {
        return Ok(());
    }
    let mut error = ValidationError::new("contact_number");
    error.add_param("value".into(), &value.to_string());
    Err(error)
}

/// Uppercase letters, digits and dashes, 3 to 30 characters.
pub fn validate_route_code(value: &str) -> Result<(), ValidationError> {
    if !ROUTE_CODE_REGEX.is_match(value) {
        let mut error = ValidationError::new("route_code");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// `end` must not be earlier than `start` when both are present.
pub fn validate_date_window(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            let mut error = ValidationError::new("date_window");
            error.add_param("start".into(), &start.to_string());
            error.add_param("end".into(), &end.to_string());
            return Err(error);
        }
    }
    Ok(())
}

/// Trim and drop empty strings so blank form fields behave like absent ones.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-01-15").is_ok());
        assert!(validate_date("2024/01/15").is_err());
    }

    #[test]
    fn test_validate_time() {
        assert_eq!(
            validate_time("05:30").unwrap(),
            NaiveTime::from_hms_opt(5, 30, 0).unwrap()
        );
        assert!(validate_time("21:00:00").is_ok());
        assert!(validate_time("25:00").is_err());
        assert!(validate_time("morning").is_err());
    }

    #[test]
    fn test_validate_contact_number() {
        assert!(validate_contact_number("09171234567").is_ok());
        assert!(validate_contact_number("+639171234567").is_ok());
        assert!(validate_contact_number("0917-123-4567").is_ok());
        assert!(validate_contact_number("(02) 8123 4567").is_ok());
        assert!(validate_contact_number("12345").is_err());
    }

    #[test]
    fn test_validate_route_code() {
        assert!(validate_route_code("RT-20240115-0A1B").is_ok());
        assert!(validate_route_code("BRGY1").is_ok());
        assert!(validate_route_code("rt-1").is_err());
        assert!(validate_route_code("AB").is_err());
    }

    #[test]
    fn test_validate_date_window() {
        let jan = NaiveDate::from_ymd_opt(2024, 1, 1);
        let dec = NaiveDate::from_ymd_opt(2024, 12, 31);
        assert!(validate_date_window(jan, dec).is_ok());
        assert!(validate_date_window(dec, jan).is_err());
        assert!(validate_date_window(None, jan).is_ok());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(Some(" A ".to_string())), Some("A".to_string()));
        assert_eq!(non_blank(None), None);
    }
}
