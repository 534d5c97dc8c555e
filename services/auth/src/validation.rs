//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

/// Validate an email address before asking for a magic link
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate the token taken from a magic link
pub fn validate_verification_token(token: &str) -> Result<(), String> {
    if token.trim().is_empty() {
        return Err("Missing token. Please request a new magic link.".to_string());
    }

    Ok(())
}
