//! # Validation Module
//!
//! Whole-value validators for Grocer fields.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Keystrokes (field.rs)                                        │
//! │  ├── Digit filtering, separators, 12-digit cap                         │
//! │  └── Calls into THIS MODULE once a field is syntactically complete     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Submit (form.rs)                                             │
//! │  ├── Required fields, units, numbers                                   │
//! │  └── Re-checks date / SKU / UPC with THIS MODULE                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── Column types only                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use chrono::NaiveDate;
//! use grocer_core::validation::{validate_date, validate_upc};
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
//! assert!(validate_date("2024-01-15", today).is_ok());
//! assert!(validate_date("2021-12-31", today).is_err());
//!
//! assert!(validate_upc("036000291452").is_ok());
//! assert!(validate_upc("036000291453").is_err());
//! ```

use chrono::NaiveDate;

use crate::error::{ValidationError, ValidationResult};
use crate::{MAX_CODE_DIGITS, MIN_PURCHASE_YEAR};

/// Digits in a complete date (`YYYYMMDD`).
pub const DATE_DIGITS: usize = 8;

/// Length of a formatted date (`YYYY-MM-DD`).
pub const DATE_TEXT_LEN: usize = 10;

/// Digits in a UPC-A code.
pub const UPC_DIGITS: usize = 12;

// =============================================================================
// Date
// =============================================================================

/// Inserts date separators into up to eight digits.
///
/// A separator follows the year once four digits exist and the month once
/// six exist, so partial input renders as `2024-`, `2024-0`, `2024-05-`...
/// Digits beyond the eighth are ignored.
///
/// ```rust
/// use grocer_core::validation::format_date_digits;
///
/// assert_eq!(format_date_digits("202"), "202");
/// assert_eq!(format_date_digits("2024"), "2024-");
/// assert_eq!(format_date_digits("20240"), "2024-0");
/// assert_eq!(format_date_digits("202405"), "2024-05-");
/// assert_eq!(format_date_digits("20240517"), "2024-05-17");
/// ```
pub fn format_date_digits(digits: &str) -> String {
    let digits: String = digits
        .chars()
        .filter(char::is_ascii_digit)
        .take(DATE_DIGITS)
        .collect();

    let mut formatted = String::with_capacity(DATE_TEXT_LEN);
    if digits.len() < 4 {
        formatted.push_str(&digits);
        return formatted;
    }

    formatted.push_str(&digits[..4]);
    formatted.push('-');
    if digits.len() < 6 {
        formatted.push_str(&digits[4..]);
        return formatted;
    }

    formatted.push_str(&digits[4..6]);
    formatted.push('-');
    formatted.push_str(&digits[6..]);
    formatted
}

/// Validates a complete `YYYY-MM-DD` purchase date.
///
/// ## Rules
/// - year >= [`MIN_PURCHASE_YEAR`]
/// - month and day form a real calendar date
/// - not after `today`
///
/// Checks run in that order, so `2021-02-30` reports the year.
pub fn validate_date(text: &str, today: NaiveDate) -> ValidationResult<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::required("date"));
    }

    let (year, month, day) = split_date(text)?;

    if year < MIN_PURCHASE_YEAR {
        return Err(ValidationError::YearTooEarly {
            year,
            min: MIN_PURCHASE_YEAR,
        });
    }

    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(ValidationError::InvalidCalendarDate { year, month, day })?;

    if date > today {
        return Err(ValidationError::FutureDate {
            date: text.to_string(),
        });
    }

    Ok(date)
}

fn split_date(text: &str) -> ValidationResult<(i32, u32, u32)> {
    let bad = || ValidationError::invalid_format("date", "expected YYYY-MM-DD");

    let mut parts = text.split('-');
    let (Some(y), Some(m), Some(d), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(bad());
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if y.len() != 4 || m.len() != 2 || d.len() != 2 || ![y, m, d].into_iter().all(all_digits) {
        return Err(bad());
    }

    Ok((
        y.parse().map_err(|_| bad())?,
        m.parse().map_err(|_| bad())?,
        d.parse().map_err(|_| bad())?,
    ))
}

// =============================================================================
// Codes
// =============================================================================

/// Computes the UPC-A check digit for the first eleven digits.
///
/// Digits at even 0-based positions are weighted by three.
///
/// ```rust
/// use grocer_core::validation::upc_check_digit;
///
/// assert_eq!(upc_check_digit(&[0, 3, 6, 0, 0, 0, 2, 9, 1, 4, 5]), 2);
/// ```
pub fn upc_check_digit(digits: &[u8; 11]) -> u8 {
    let odd_sum: u32 = digits.iter().step_by(2).map(|&d| u32::from(d)).sum();
    let even_sum: u32 = digits.iter().skip(1).step_by(2).map(|&d| u32::from(d)).sum();
    let total = odd_sum * 3 + even_sum;
    ((10 - total % 10) % 10) as u8
}

/// Validates a UPC-A code.
///
/// ## Rules
/// - digits only
/// - exactly 12 digits
/// - last digit equals [`upc_check_digit`] of the first eleven
pub fn validate_upc(code: &str) -> ValidationResult<()> {
    if !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::invalid_format(
            "upc",
            "must contain only digits",
        ));
    }

    if code.len() != UPC_DIGITS {
        return Err(ValidationError::WrongLength {
            field: "upc".to_string(),
            expected: UPC_DIGITS,
            actual: code.len(),
        });
    }

    let mut digits = [0u8; UPC_DIGITS];
    for (slot, b) in digits.iter_mut().zip(code.bytes()) {
        *slot = b - b'0';
    }

    let mut body = [0u8; 11];
    body.copy_from_slice(&digits[..11]);
    let expected = upc_check_digit(&body);
    let found = digits[11];

    if expected != found {
        return Err(ValidationError::ChecksumMismatch { expected, found });
    }

    Ok(())
}

/// Validates a SKU.
///
/// ## Rules
/// - must not be empty
/// - digits only
/// - at most [`MAX_CODE_DIGITS`] digits
pub fn validate_sku(code: &str) -> ValidationResult<()> {
    if code.is_empty() {
        return Err(ValidationError::required("sku"));
    }

    if !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::invalid_format(
            "sku",
            "must contain only digits",
        ));
    }

    if code.len() > MAX_CODE_DIGITS {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_CODE_DIGITS,
        });
    }

    Ok(())
}

// =============================================================================
// Text and Numbers
// =============================================================================

/// Validates an item name. Returns the trimmed name.
pub fn validate_item_name(name: &str) -> ValidationResult<String> {
    required_text("name", name)
}

/// Validates a store name. Returns the trimmed name.
pub fn validate_store(store: &str) -> ValidationResult<String> {
    required_text("store", store)
}

fn required_text(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    Ok(value.to_string())
}

/// Parses a decimal field typed by the user.
pub fn parse_decimal(field: &str, text: &str) -> ValidationResult<f64> {
    let text = text.trim();

    if text.is_empty() {
        return Err(ValidationError::required(field));
    }

    let value: f64 = text
        .parse()
        .map_err(|_| ValidationError::invalid_format(field, "must be a number"))?;

    if !value.is_finite() {
        return Err(ValidationError::invalid_format(field, "must be a number"));
    }

    Ok(value)
}

/// Validates a package quantity or count per package.
///
/// ## Rules
/// - must be positive (> 0)
///
/// ```rust
/// use grocer_core::validation::validate_quantity;
///
/// assert!(validate_quantity("package quantity", 2.5).is_ok());
/// assert!(validate_quantity("package quantity", 0.0).is_err());
/// ```
pub fn validate_quantity(field: &str, qty: f64) -> ValidationResult<()> {
    if !(qty > 0.0) {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a price.
///
/// ## Rules
/// - must be non-negative (>= 0)
/// - zero is allowed (free items)
pub fn validate_price(price: f64) -> ValidationResult<()> {
    if !(price >= 0.0) {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_partial_dates() {
        assert_eq!(format_date_digits(""), "");
        assert_eq!(format_date_digits("2"), "2");
        assert_eq!(format_date_digits("202"), "202");
        assert_eq!(format_date_digits("20231"), "2023-1");
        assert_eq!(format_date_digits("2023121"), "2023-12-1");
        assert_eq!(format_date_digits("2023-12-1"), "2023-12-1");
        assert_eq!(format_date_digits("202312011"), "2023-12-01");
    }

    #[test]
    fn test_validate_date_accepts_past_and_today() {
        let today = day(2024, 5, 17);
        assert_eq!(validate_date("2022-01-01", today).unwrap(), day(2022, 1, 1));
        assert_eq!(validate_date("2024-02-29", today).unwrap(), day(2024, 2, 29));
        assert_eq!(validate_date("2024-05-17", today).unwrap(), today);
    }

    #[test]
    fn test_validate_date_rejections() {
        let today = day(2024, 5, 17);

        assert_eq!(
            validate_date("2021-12-31", today),
            Err(ValidationError::YearTooEarly {
                year: 2021,
                min: 2022
            })
        );
        assert_eq!(
            validate_date("2023-02-30", today),
            Err(ValidationError::InvalidCalendarDate {
                year: 2023,
                month: 2,
                day: 30
            })
        );
        assert!(matches!(
            validate_date("2023-13-01", today),
            Err(ValidationError::InvalidCalendarDate { .. })
        ));
        assert!(matches!(
            validate_date("2024-05-18", today),
            Err(ValidationError::FutureDate { .. })
        ));
        assert!(matches!(
            validate_date("2024-5-17", today),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            validate_date("", today),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_upc_check_digit() {
        assert_eq!(upc_check_digit(&[0, 3, 6, 0, 0, 0, 2, 9, 1, 4, 5]), 2);
        assert_eq!(upc_check_digit(&[0; 11]), 0);
    }

    #[test]
    fn test_validate_upc() {
        assert!(validate_upc("036000291452").is_ok());
        assert!(validate_upc("000000000000").is_ok());

        assert_eq!(
            validate_upc("036000291453"),
            Err(ValidationError::ChecksumMismatch {
                expected: 2,
                found: 3
            })
        );
        assert!(matches!(
            validate_upc("03600029145"),
            Err(ValidationError::WrongLength { actual: 11, .. })
        ));
        assert!(matches!(
            validate_upc("03600029145a"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("1").is_ok());
        assert!(validate_sku("123456789012").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("12a").is_err());
        assert!(validate_sku("1234567890123").is_err());
    }

    #[test]
    fn test_text_fields_are_trimmed() {
        assert_eq!(validate_item_name("  Eggs ").unwrap(), "Eggs");
        assert!(validate_store("   ").is_err());
    }

    #[test]
    fn test_long_text_is_accepted() {
        let name = "A".repeat(300);
        assert_eq!(validate_item_name(&name).unwrap(), name);
        assert_eq!(validate_store(&"B".repeat(201)).unwrap().len(), 201);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(parse_decimal("price", " 3.50 ").unwrap(), 3.5);
        assert!(parse_decimal("price", "three").is_err());
        assert!(parse_decimal("price", "NaN").is_err());
        assert!(parse_decimal("price", "").is_err());

        assert!(validate_quantity("count", 12.0).is_ok());
        assert!(validate_quantity("count", -1.0).is_err());

        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(-0.01).is_err());
    }
}
