//! Field rules shared by the HTTP handlers and the auth form state machine.
//!
//! Each rule returns `Some(message)` when the value is rejected.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_]+$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[\d\-()]{10,15}$").unwrap();
    static ref HEX_COLOR_RE: Regex =
        Regex::new(r"^#?([0-9a-fA-F]{3}|[0-9a-fA-F]{4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap();
}

pub const MIN_LEN: usize = 3;
pub const MAX_LEN: usize = 100;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_LINK_LEN: usize = 255;
pub const MAX_URL_LEN: usize = 2048;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// `None` if `value` is between `min` and `max` characters.
pub fn length(label: &str, value: &str, min: usize, max: usize) -> Option<String> {
    let n = value.chars().count();
    if n < min || n > max {
        Some(format!("{label} has to be between {min} and {max} characters"))
    } else {
        None
    }
}

pub fn max_length(label: &str, value: &str, max: usize) -> Option<String> {
    (value.chars().count() > max).then(|| format!("{label} must be at most {max} characters"))
}

pub fn full_name(value: &str) -> Option<String> {
    let v = value.trim();
    if v.is_empty() {
        return Some("Full name is required".into());
    }
    if v.chars().count() < MIN_LEN {
        return Some("Full name must be at least 3 characters".into());
    }
    if !v.chars().all(|c| c.is_alphabetic() || c.is_whitespace()) {
        return Some("Full name can only contain letters and spaces".into());
    }
    length("Full name", v, MIN_LEN, MAX_LEN)
}

pub fn role_name(value: &str) -> Option<String> {
    let v = value.trim();
    if v.is_empty() {
        return Some("Role name is required".into());
    }
    if v.chars().count() < MIN_LEN {
        return Some("Role name must be at least 3 characters".into());
    }
    length("Role name", v, MIN_LEN, MAX_LEN)
}

pub fn phone(value: &str) -> Option<String> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Some("Phone number is required".into());
    }
    if !PHONE_RE.is_match(&compact) {
        return Some("Please enter a valid phone number".into());
    }
    None
}

pub fn username(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some("Username is required".into());
    }
    if value.chars().count() < MIN_LEN {
        return Some("Username must be at least 3 characters".into());
    }
    if !USERNAME_RE.is_match(value) {
        return Some("Username can only contain letters, numbers, and underscores".into());
    }
    length("Username", value, MIN_LEN, MAX_LEN)
}

pub fn email(value: &str) -> Option<String> {
    let v = value.trim();
    if v.is_empty() {
        return Some("Email is required".into());
    }
    if !is_valid_email(v) {
        return Some("Please enter a valid email address".into());
    }
    length("Email", v, MIN_LEN, MAX_LEN)
}

pub fn password(value: &str) -> Option<String> {
    if value.is_empty() {
        return Some("Password is required".into());
    }
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Some("Password must be at least 8 characters".into());
    }
    let lower = value.chars().any(|c| c.is_lowercase());
    let upper = value.chars().any(|c| c.is_uppercase());
    let digit = value.chars().any(|c| c.is_ascii_digit());
    if !(lower && upper && digit) {
        return Some(
            "Password must contain at least one uppercase letter, one lowercase letter, and one number"
                .into(),
        );
    }
    length("Password", value, MIN_PASSWORD_LEN, MAX_LEN)
}

pub fn confirm_password(value: &str, password: &str) -> Option<String> {
    if value.is_empty() {
        return Some("Please confirm your password".into());
    }
    (value != password).then(|| "Passwords do not match".into())
}

pub fn hex_color(label: &str, value: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{label} is required"));
    }
    (!HEX_COLOR_RE.is_match(value.trim()))
        .then(|| format!("{label} must be a hex color such as #ffffff"))
}

/// Collects rule failures into the newline-joined body of a 400 response.
#[derive(Debug, Default)]
pub struct Errors(Vec<String>);

impl Errors {
    pub fn check(&mut self, outcome: Option<String>) -> &mut Self {
        if let Some(msg) = outcome {
            self.0.push(msg);
        }
        self
    }

    pub fn into_result(self) -> Result<(), String> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self.0.join("\n"))
        }
    }
}
