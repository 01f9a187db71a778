// src/validate.rs

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ApiError, ApiResult};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid"));

/// Trims `value` and rejects it if nothing is left.
pub fn required(value: &str, message: &str) -> ApiResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(message));
    }
    Ok(trimmed.to_string())
}

/// Emails are compared case-insensitively, so they are stored lowercase.
pub fn email(value: &str) -> ApiResult<String> {
    let email = required(value, "Email is required")?.to_lowercase();
    if !EMAIL_PATTERN.is_match(&email) {
        return Err(ApiError::validation("Please enter a valid email address"));
    }
    Ok(email)
}
