//! Registration form checks run before anything is sent.
//!
//! Account policy (username charset, password strength) belongs to the
//! backend; the form only rejects what can never succeed.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::RegisterRequest;

fn required(value: &str, label: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", label));
    }
    Ok(())
}

/// Email must look like `local@domain.tld`
pub fn validate_email(email: &str) -> Result<(), String> {
    required(email, "Email")?;

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email regex")
    });

    if !regex.is_match(email.trim()) {
        return Err("Please enter a valid email address".to_string());
    }

    Ok(())
}

/// Check a registration form, reporting the first problem in form order
pub fn validate_registration(request: &RegisterRequest) -> Result<(), String> {
    required(&request.username, "Username")?;
    validate_email(&request.email)?;
    required(&request.password, "Password")?;
    required(&request.first_name, "First name")?;
    required(&request.last_name, "Last name")?;
    Ok(())
}
