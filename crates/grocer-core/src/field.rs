//! # Incremental Field Input
//!
//! Keystroke-level formatting and validation for date, SKU and UPC fields.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  (buffer, input) ──► FieldInput::apply ──► FieldUpdate                 │
//! │                                            ├── buffer (canonical text)  │
//! │                                            └── status                   │
//! │                                                ├── Pending              │
//! │                                                ├── Complete             │
//! │                                                └── Rejected(err) ─► ""  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Formatting happens on every step; the semantic check (calendar, check
//! digit) only runs once the buffer is syntactically complete. A rejected
//! field comes back empty and the user starts over.
//!
//! ```rust
//! use grocer_core::field::{FieldInput, UpcInput};
//!
//! let update = UpcInput.apply("03600029145", "2");
//! assert_eq!(update.buffer, "036000291452");
//! assert!(update.is_complete() && update.is_valid());
//!
//! let update = UpcInput.apply("03600029145", "3");
//! assert_eq!(update.buffer, "");
//! assert!(!update.is_valid());
//! ```

use chrono::{Local, NaiveDate};

use crate::error::ValidationError;
use crate::validation::{format_date_digits, validate_date, validate_upc, DATE_TEXT_LEN, UPC_DIGITS};
use crate::MAX_CODE_DIGITS;

/// Where a field stands after the latest input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldStatus {
    /// Not yet complete; nothing to report.
    #[default]
    Pending,
    /// Complete and valid.
    Complete,
    /// Complete but invalid. The buffer has been cleared.
    Rejected(ValidationError),
}

/// Result of feeding input into a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate {
    /// Canonical buffer after this step.
    pub buffer: String,
    pub status: FieldStatus,
}

impl FieldUpdate {
    fn pending(buffer: String) -> Self {
        FieldUpdate {
            buffer,
            status: FieldStatus::Pending,
        }
    }

    fn complete(buffer: String) -> Self {
        FieldUpdate {
            buffer,
            status: FieldStatus::Complete,
        }
    }

    fn rejected(err: ValidationError) -> Self {
        FieldUpdate {
            buffer: String::new(),
            status: FieldStatus::Rejected(err),
        }
    }

    /// Whether the field reached its full syntactic form on this step.
    pub fn is_complete(&self) -> bool {
        !matches!(self.status, FieldStatus::Pending)
    }

    /// False only when this step rejected the value.
    pub fn is_valid(&self) -> bool {
        !matches!(self.status, FieldStatus::Rejected(_))
    }

    /// The rejection reason, if any.
    pub fn error(&self) -> Option<&ValidationError> {
        match &self.status {
            FieldStatus::Rejected(err) => Some(err),
            _ => None,
        }
    }
}

/// A validator that folds newly typed text into a field buffer.
pub trait FieldInput {
    /// Applies `input` to `buffer` and returns the new canonical buffer.
    fn apply(&self, buffer: &str, input: &str) -> FieldUpdate;
}

/// Appends the digits of `input` to `buffer`, keeping at most
/// [`MAX_CODE_DIGITS`]. Excess digits are dropped, so the first twelve win.
fn append_capped_digits(buffer: &str, input: &str) -> String {
    buffer
        .chars()
        .chain(input.chars())
        .filter(char::is_ascii_digit)
        .take(MAX_CODE_DIGITS)
        .collect()
}

// =============================================================================
// Date
// =============================================================================

/// `YYYY-MM-DD` purchase date field.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateInput {
    today: Option<NaiveDate>,
}

impl DateInput {
    /// Validates against the local calendar date at the time of each check.
    pub fn new() -> Self {
        DateInput { today: None }
    }

    /// Validates against a fixed "today".
    pub fn with_today(today: NaiveDate) -> Self {
        DateInput { today: Some(today) }
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

impl FieldInput for DateInput {
    fn apply(&self, buffer: &str, input: &str) -> FieldUpdate {
        let digits: String = buffer
            .chars()
            .chain(input.chars())
            .filter(char::is_ascii_digit)
            .collect();
        let formatted = format_date_digits(&digits);

        if formatted.len() != DATE_TEXT_LEN {
            return FieldUpdate::pending(formatted);
        }

        match validate_date(&formatted, self.today()) {
            Ok(_) => FieldUpdate::complete(formatted),
            Err(err) => FieldUpdate::rejected(err),
        }
    }
}

// =============================================================================
// SKU
// =============================================================================

/// Up to twelve digits, no checksum.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkuInput;

impl FieldInput for SkuInput {
    fn apply(&self, buffer: &str, input: &str) -> FieldUpdate {
        let digits = append_capped_digits(buffer, input);
        if digits.len() == MAX_CODE_DIGITS {
            FieldUpdate::complete(digits)
        } else {
            FieldUpdate::pending(digits)
        }
    }
}

// =============================================================================
// UPC
// =============================================================================

/// Twelve-digit UPC-A code, checked once the twelfth digit arrives.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpcInput;

impl FieldInput for UpcInput {
    fn apply(&self, buffer: &str, input: &str) -> FieldUpdate {
        let digits = append_capped_digits(buffer, input);

        // Length of the canonical buffer decides, however much was pasted.
        if digits.len() != UPC_DIGITS {
            return FieldUpdate::pending(digits);
        }

        match validate_upc(&digits) {
            Ok(()) => FieldUpdate::complete(digits),
            Err(err) => FieldUpdate::rejected(err),
        }
    }
}

// =============================================================================
// Text Field
// =============================================================================

/// A field that owns its buffer.
///
/// ## Usage
/// ```rust
/// use grocer_core::field::{FieldStatus, SkuInput, TextField};
///
/// let mut sku = TextField::new(SkuInput);
/// sku.insert("40-11");
/// assert_eq!(sku.text(), "4011");
/// assert_eq!(sku.status(), &FieldStatus::Pending);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextField<I> {
    input: I,
    buffer: String,
    status: FieldStatus,
}

impl<I: FieldInput> TextField<I> {
    /// Creates an empty field.
    pub fn new(input: I) -> Self {
        TextField {
            input,
            buffer: String::new(),
            status: FieldStatus::Pending,
        }
    }

    /// Feeds typed or pasted text into the field.
    pub fn insert(&mut self, text: &str) -> &FieldStatus {
        let update = self.input.apply(&self.buffer, text);
        self.buffer = update.buffer;
        self.status = update.status;
        &self.status
    }

    /// Current canonical text.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Status after the last insert.
    pub fn status(&self) -> &FieldStatus {
        &self.status
    }

    /// Empties the field, e.g. after a successful submit.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.status = FieldStatus::Pending;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
    }

    fn type_chars<I: FieldInput>(field: &mut TextField<I>, text: &str) {
        for ch in text.chars() {
            field.insert(&ch.to_string());
        }
    }

    #[test]
    fn test_partial_dates_are_only_formatted() {
        let input = DateInput::with_today(today());
        let cases = [
            ("1", "1"),
            ("19", "19"),
            ("199", "199"),
            ("1999", "1999-"),
            ("19991", "1999-1"),
            ("199913", "1999-13-"),
            ("1999133", "1999-13-3"),
        ];

        for (digits, expected) in cases {
            let update = input.apply("", digits);
            assert_eq!(update.buffer, expected, "digits {digits}");
            assert_eq!(update.status, FieldStatus::Pending);
        }
    }

    #[test]
    fn test_typing_a_valid_date() {
        let mut field = TextField::new(DateInput::with_today(today()));
        type_chars(&mut field, "2023051");
        assert_eq!(field.text(), "2023-05-1");
        assert_eq!(field.status(), &FieldStatus::Pending);

        field.insert("9");
        assert_eq!(field.text(), "2023-05-19");
        assert_eq!(field.status(), &FieldStatus::Complete);
    }

    #[test]
    fn test_non_digits_are_discarded() {
        let input = DateInput::with_today(today());
        let update = input.apply("2023-", "/0a5");
        assert_eq!(update.buffer, "2023-05-");
    }

    #[test]
    fn test_today_is_accepted() {
        let input = DateInput::with_today(today());
        let update = input.apply("", "20240517");
        assert_eq!(update.buffer, "2024-05-17");
        assert!(update.is_complete() && update.is_valid());
    }

    #[test]
    fn test_invalid_dates_clear_the_buffer() {
        let input = DateInput::with_today(today());
        for bad in ["20211231", "20230230", "20231301", "20240518"] {
            let update = input.apply("", bad);
            assert_eq!(update.buffer, "", "date {bad}");
            assert!(update.is_complete());
            assert!(!update.is_valid());
        }

        let update = input.apply("2021-12-3", "1");
        assert!(matches!(
            update.error(),
            Some(ValidationError::YearTooEarly { year: 2021, .. })
        ));
    }

    #[test]
    fn test_tomorrow_is_rejected_with_local_clock() {
        let tomorrow = Local::now().date_naive().succ_opt().unwrap();
        let update = DateInput::new().apply("", &tomorrow.format("%Y%m%d").to_string());
        assert_eq!(update.buffer, "");
        assert!(matches!(
            update.error(),
            Some(ValidationError::FutureDate { .. })
        ));
    }

    #[test]
    fn test_extra_date_digits_are_ignored() {
        let input = DateInput::with_today(today());
        let update = input.apply("2023-05-19", "7");
        assert_eq!(update.buffer, "2023-05-19");
        assert_eq!(update.status, FieldStatus::Complete);
    }

    #[test]
    fn test_sku_keeps_first_twelve_digits() {
        let mut field = TextField::new(SkuInput);
        type_chars(&mut field, "123456789012345");
        assert_eq!(field.text(), "123456789012");
        assert_eq!(field.status(), &FieldStatus::Complete);
    }

    #[test]
    fn test_sku_is_never_cleared() {
        let mut field = TextField::new(SkuInput);
        field.insert("00x7");
        assert_eq!(field.text(), "007");
        assert_eq!(field.status(), &FieldStatus::Pending);

        let update = SkuInput.apply("99999999999", "99999");
        assert_eq!(update.buffer, "999999999999");
        assert!(update.is_valid());
    }

    #[test]
    fn test_upc_typed_one_digit_at_a_time() {
        let mut field = TextField::new(UpcInput);
        type_chars(&mut field, "03600029145");
        assert_eq!(field.status(), &FieldStatus::Pending);

        field.insert("2");
        assert_eq!(field.text(), "036000291452");
        assert_eq!(field.status(), &FieldStatus::Complete);
    }

    #[test]
    fn test_upc_mismatch_clears() {
        let mut field = TextField::new(UpcInput);
        type_chars(&mut field, "036000291453");
        assert_eq!(field.text(), "");
        assert_eq!(
            field.status(),
            &FieldStatus::Rejected(ValidationError::ChecksumMismatch {
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn test_upc_validates_pasted_input() {
        let update = UpcInput.apply("", "0360-0029-1452");
        assert_eq!(update.buffer, "036000291452");
        assert_eq!(update.status, FieldStatus::Complete);

        // Paste that overflows the cap is truncated before the check.
        let update = UpcInput.apply("0360002", "9145209");
        assert_eq!(update.buffer, "036000291452");
        assert_eq!(update.status, FieldStatus::Complete);

        let update = UpcInput.apply("0360002", "914539");
        assert_eq!(update.buffer, "");
        assert!(!update.is_valid());
    }

    #[test]
    fn test_clear_resets_field() {
        let mut field = TextField::new(UpcInput);
        field.insert("036000291452");
        field.clear();
        assert_eq!(field.text(), "");
        assert_eq!(field.status(), &FieldStatus::Pending);
    }
}
