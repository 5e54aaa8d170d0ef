//! Field-shape validation for registration and login input.
//!
//! Produces field-level messages; the flow returns them verbatim in its
//! `ValidationFailed` outcome and performs no store access when any are
//! present.

use regex::Regex;

use super::flow::{LoginCredentials, RegisterFields};
use super::types::FieldError;

const PASSWORD_MIN_LEN: usize = 8;
const PASSWORD_MAX_LEN: usize = 128;

/// Normalize an email for lookup/uniqueness checks.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
pub(crate) fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

fn password_policy_error(password: &str) -> Option<&'static str> {
    if password.len() < PASSWORD_MIN_LEN {
        return Some("Password must be at least 8 characters long");
    }
    if password.len() > PASSWORD_MAX_LEN {
        return Some("Password must be at most 128 characters long");
    }
    None
}

fn field_error(field: &str, message: &str) -> FieldError {
    FieldError {
        field: field.to_string(),
        message: message.to_string(),
    }
}

pub(crate) fn register_fields(fields: &RegisterFields) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if fields.first_name.trim().is_empty() {
        errors.push(field_error("first_name", "First name is required"));
    }
    if fields.last_name.trim().is_empty() {
        errors.push(field_error("last_name", "Last name is required"));
    }
    if !valid_email(&normalize_email(&fields.email)) {
        errors.push(field_error("email", "Invalid email"));
    }
    if let Some(message) = password_policy_error(&fields.password) {
        errors.push(field_error("password", message));
    }
    errors
}

pub(crate) fn login_fields(credentials: &LoginCredentials) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if !valid_email(&normalize_email(&credentials.email)) {
        errors.push(field_error("email", "Invalid email"));
    }
    if credentials.password.is_empty() {
        errors.push(field_error("password", "Password is required"));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> RegisterFields {
        RegisterFields {
            first_name: "Alice".to_string(),
            last_name: "Vance".to_string(),
            email: "alice@example.com".to_string(),
            password: "CorrectHorse1".to_string(),
        }
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@example.com"));
        assert!(valid_email("name.surname@example.co"));
    }

    #[test]
    fn valid_email_rejects_missing_parts() {
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("missing-at.example.com"));
        assert!(!valid_email("missing-domain@"));
    }

    #[test]
    fn register_fields_accepts_valid_input() {
        assert!(register_fields(&fields()).is_empty());
    }

    #[test]
    fn register_fields_requires_names() {
        let mut invalid = fields();
        invalid.first_name = "  ".to_string();
        invalid.last_name = String::new();
        let errors = register_fields(&invalid);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["first_name", "last_name"]);
    }

    #[test]
    fn register_fields_enforces_password_policy() {
        let mut invalid = fields();
        invalid.password = "short".to_string();
        let errors = register_fields(&invalid);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "password");

        invalid.password = "x".repeat(129);
        let errors = register_fields(&invalid);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "password");
    }

    #[test]
    fn login_fields_flags_both_fields() {
        let credentials = LoginCredentials {
            email: "not-an-email".to_string(),
            password: String::new(),
        };
        let errors = login_fields(&credentials);
        assert_eq!(errors.len(), 2);
    }
}
