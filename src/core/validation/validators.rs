//! Reusable field validators
//!
//! Each validator takes the field name and the value and returns a
//! human-readable message on failure.

use regex::Regex;
use std::sync::OnceLock;

/// Validator: text must contain something other than whitespace
pub fn required_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("'{}' is required", field))
    } else {
        Ok(())
    }
}

/// Validator: optional text, when present, must not be blank
pub fn optional_text(field: &str, value: Option<&str>) -> Result<(), String> {
    match value {
        Some(v) if v.trim().is_empty() => Err(format!("'{}' must not be blank when present", field)),
        _ => Ok(()),
    }
}

/// Validator: quantity must be a positive integer that fits the stored width
pub fn positive_quantity(field: &str, value: i64) -> Result<(), String> {
    if value <= 0 {
        Err(format!(
            "'{}' must be a positive integer (value: {})",
            field, value
        ))
    } else if value > u32::MAX as i64 {
        Err(format!("'{}' must not exceed {} (value: {})", field, u32::MAX, value))
    } else {
        Ok(())
    }
}

/// Validator: amount must be a finite, non-negative number
pub fn non_negative_amount(field: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() {
        Err(format!("'{}' must be a finite number", field))
    } else if value < 0.0 {
        Err(format!("'{}' must not be negative (value: {})", field, value))
    } else {
        Ok(())
    }
}

/// Validator: international or local phone number (7 to 15 digits)
pub fn phone_format(field: &str, value: &str) -> Result<(), String> {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^\+?[0-9][0-9 \-]{5,18}[0-9]$").expect("phone regex is valid")
    });

    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if regex.is_match(value.trim()) && (7..=15).contains(&digits) {
        Ok(())
    } else {
        Err(format!("'{}' is not a valid phone number (value: {})", field, value))
    }
}

/// Validator: postal code of 3 to 10 letters, digits, spaces or dashes
pub fn postal_code_format(field: &str, value: &str) -> Result<(), String> {
    static POSTAL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = POSTAL_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 \-]{1,8}[A-Za-z0-9]$").expect("postal regex is valid")
    });

    if regex.is_match(value.trim()) {
        Ok(())
    } else {
        Err(format!("'{}' is not a valid postal code (value: {})", field, value))
    }
}
