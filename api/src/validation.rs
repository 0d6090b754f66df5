use anyhow::{bail, Result};
use regex::Regex;
use std::sync::OnceLock;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap())
}

pub fn validate_email(email: &str) -> Result<()> {
    if email.trim().is_empty() {
        bail!("Email cannot be empty");
    }
    if email.len() > 255 {
        bail!("Email is too long (max 255 characters)");
    }
    if !email_regex().is_match(email) {
        bail!("Invalid email format");
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < 6 {
        bail!("Password must be at least 6 characters");
    }
    if password.len() > 128 {
        bail!("Password is too long (max 128 characters)");
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        bail!("Title cannot be empty");
    }
    if title.len() > 200 {
        bail!("Title is too long (max 200 characters)");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_emails() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("a.b+tag@sub.example.co").is_ok());
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("x@no-tld").is_err());
    }

    #[test]
    fn password_length_bounds() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn title_bounds() {
        assert!(validate_title("Sunny flat").is_ok());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"x".repeat(201)).is_err());
    }
}
