use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::{ValidationError, ValidationErrors};

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| {
            errs.iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn invalid(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

// --- Student numbers ---

pub static STUDENT_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("valid student number pattern"));

/// Trims and upper-cases a student number after checking its shape:
/// 3–20 characters from `[A-Za-z0-9-]`, with at least one letter and one digit.
pub fn normalize_student_number(raw: &str) -> Result<String, String> {
    let value = raw.trim();
    if !(3..=20).contains(&value.len()) {
        return Err("Student ID must be between 3 and 20 characters".into());
    }
    if !STUDENT_NUMBER_REGEX.is_match(value) {
        return Err("Student ID can only contain letters, numbers, and hyphens".into());
    }
    if !value.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err("Student ID must contain at least one letter".into());
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Err("Student ID must contain at least one number".into());
    }
    Ok(value.to_ascii_uppercase())
}

pub fn validate_student_number(value: &str) -> Result<(), ValidationError> {
    normalize_student_number(value)
        .map(|_| ())
        .map_err(|m| invalid("student_number", m))
}

// --- Passwords ---

pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < 8 {
        return Err(invalid(
            "password_length",
            "Password must be at least 8 characters",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(invalid(
            "password_digit",
            "Password must contain at least one digit",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(invalid(
            "password_upper",
            "Password must contain at least one uppercase letter",
        ));
    }
    Ok(())
}

// --- SSG positions ---

pub const SSG_POSITIONS: [&str; 8] = [
    "President",
    "Vice President",
    "Secretary",
    "Treasurer",
    "Auditor",
    "Public Information Officer",
    "Representative",
    "Other",
];

/// Title-cases a position and resolves the common abbreviations.
/// Returns `None` for anything outside [`SSG_POSITIONS`].
pub fn normalize_position(raw: &str) -> Option<String> {
    let compact = raw.trim();
    let alias = match compact.to_ascii_uppercase().as_str() {
        "VP" | "V.P." => Some("Vice President"),
        "PRO" | "P.R.O." => Some("Public Information Officer"),
        _ => None,
    };
    if let Some(a) = alias {
        return Some(a.to_string());
    }

    let titled = compact
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    SSG_POSITIONS
        .iter()
        .find(|p| **p == titled)
        .map(|p| p.to_string())
}

pub fn validate_position(value: &str) -> Result<(), ValidationError> {
    match normalize_position(value) {
        Some(_) => Ok(()),
        None => Err(invalid(
            "position",
            format!("Position must be one of: {}", SSG_POSITIONS.join(", ")),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_number_is_uppercased_and_checked() {
        assert_eq!(normalize_student_number(" cs-2023-001 ").unwrap(), "CS-2023-001");
        assert!(normalize_student_number("ab").is_err());
        assert!(normalize_student_number("ABCDEF").is_err());
        assert!(normalize_student_number("123456").is_err());
        assert!(normalize_student_number("CS_2023").is_err());
        assert!(normalize_student_number(&"A1".repeat(11)).is_err());
    }

    #[test]
    fn password_strength_requires_digit_and_upper() {
        assert!(validate_password_strength("short1A").is_err());
        assert!(validate_password_strength("alllowercase1").is_err());
        assert!(validate_password_strength("NoDigitsHere").is_err());
        assert!(validate_password_strength("Passw0rdOk").is_ok());
    }

    #[test]
    fn positions_are_title_cased_and_aliased() {
        assert_eq!(normalize_position("vice president").as_deref(), Some("Vice President"));
        assert_eq!(normalize_position("V.P.").as_deref(), Some("Vice President"));
        assert_eq!(
            normalize_position("p.r.o.").as_deref(),
            Some("Public Information Officer")
        );
        assert_eq!(normalize_position("treasurer").as_deref(), Some("Treasurer"));
        assert!(normalize_position("Mascot").is_none());
    }

    #[test]
    fn validation_errors_carry_messages() {
        let err = validate_student_number("!!").unwrap_err();
        assert!(err.message.is_some());
    }
}
