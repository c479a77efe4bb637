//! Shared string checks used by the validated newtypes.
//!
//! Lengths count Unicode scalar values, not bytes.

use crate::DomainValidationError;

/// Checks that `s` has between `min` and `max` characters.
pub(crate) fn check_len(
    field: &'static str,
    s: &str,
    min: usize,
    max: usize,
) -> Result<(), DomainValidationError> {
    let actual = s.chars().count();
    if actual < min || actual > max {
        return Err(DomainValidationError::InvalidLength {
            field,
            min,
            max,
            actual,
        });
    }
    Ok(())
}

/// Rejects strings containing control characters.
pub(crate) fn check_no_control(field: &'static str, s: &str) -> Result<(), DomainValidationError> {
    if s.chars().any(char::is_control) {
        return Err(DomainValidationError::InvalidFormat {
            field,
            reason: "must not contain control characters",
        });
    }
    Ok(())
}

/// Checks a human-facing label: bounded, no control characters, not blank.
pub(crate) fn check_label(
    field: &'static str,
    s: &str,
    max: usize,
) -> Result<(), DomainValidationError> {
    check_len(field, s, 1, max)?;
    check_no_control(field, s)?;
    if s.trim().is_empty() {
        return Err(DomainValidationError::InvalidFormat {
            field,
            reason: "must not be blank",
        });
    }
    Ok(())
}

/// Checks that every byte is printable ASCII (`!` through `~`).
pub(crate) fn check_printable_ascii(
    field: &'static str,
    s: &str,
    min: usize,
    max: usize,
) -> Result<(), DomainValidationError> {
    check_len(field, s, min, max)?;
    if !s.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(DomainValidationError::InvalidFormat {
            field,
            reason: "must contain only printable ASCII",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_len_counts_chars() {
        assert!(check_len("f", "ééé", 3, 3).is_ok());
        assert!(check_len("f", "ab", 3, 5).is_err());
    }

    #[test]
    fn test_check_len_reports_char_count_for_long_multibyte_input() {
        // 300 chars, 600 bytes.
        let huge = "é".repeat(300);
        let err = check_len("f", &huge, 1, 64).unwrap_err();
        assert!(matches!(
            err,
            DomainValidationError::InvalidLength {
                actual: 300,
                max: 64,
                ..
            }
        ));
    }

    #[test]
    fn test_check_label() {
        assert!(check_label("name", "general", 64).is_ok());
        assert!(check_label("name", "   ", 64).is_err());
        assert!(check_label("name", "bad\u{0007}", 64).is_err());
        assert!(check_label("name", "", 64).is_err());
    }

    #[test]
    fn test_check_printable_ascii() {
        assert!(check_printable_ascii("token", "abc.DEF-123_~", 1, 64).is_ok());
        assert!(check_printable_ascii("token", "has space", 1, 64).is_err());
        assert!(check_printable_ascii("token", "tab\there", 1, 64).is_err());
    }
}
