//! Field-level constraints checked before rows reach the database.

use std::fmt;
use std::net::{IpAddr, Ipv6Addr};

use once_cell::sync::Lazy;
use regex::Regex;

pub const NAME_MAX_LEN: usize = 255;
pub const EMAIL_MAX_LEN: usize = 254;
pub const PHONE_MAX_LEN: usize = 20;
pub const IMAGE_MAX_LEN: usize = 100;
pub const USERNAME_MAX_LEN: usize = 150;

static EMAIL_USER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)^(?:[-!#$%&'*+/=?^_`{}|~0-9a-z]+(?:\.[-!#$%&'*+/=?^_`{}|~0-9a-z]+)*|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f!#-\[\]-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")$"#,
    )
    .expect("email user pattern compiles")
});

static EMAIL_DOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+(?:[a-z0-9-]{1,62}[a-z0-9])$")
        .expect("email domain pattern compiles")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for FieldError {}

/// Length is counted in characters, not bytes.
pub fn max_length(field: &'static str, value: &str, max: usize) -> Result<(), FieldError> {
    let len = value.chars().count();
    if len > max {
        return Err(FieldError::new(
            field,
            format!("ensure this value has at most {max} characters (it has {len})"),
        ));
    }
    Ok(())
}

pub fn not_blank(field: &'static str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::new(field, "this field may not be blank"));
    }
    Ok(())
}

/// Required text column: non-blank and within `max` characters.
pub fn required_text(field: &'static str, value: &str, max: usize) -> Result<(), FieldError> {
    not_blank(field, value)?;
    max_length(field, value, max)
}

pub fn email(field: &'static str, value: &str) -> Result<(), FieldError> {
    max_length(field, value, EMAIL_MAX_LEN)?;
    if is_valid_email(value) {
        Ok(())
    } else {
        Err(FieldError::new(field, "enter a valid email address"))
    }
}

pub fn is_valid_email(value: &str) -> bool {
    let Some((user, domain)) = value.rsplit_once('@') else {
        return false;
    };
    if user.is_empty() || domain.is_empty() || !EMAIL_USER.is_match(user) {
        return false;
    }
    if domain.eq_ignore_ascii_case("localhost") || EMAIL_DOMAIN.is_match(domain) {
        return true;
    }
    is_domain_literal(domain)
}

// `[192.0.2.1]` or `[IPv6:2001:db8::1]`
fn is_domain_literal(domain: &str) -> bool {
    let Some(inner) = domain
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    else {
        return false;
    };
    if let Some(v6) = inner
        .strip_prefix("IPv6:")
        .or_else(|| inner.strip_prefix("ipv6:"))
    {
        return v6.parse::<Ipv6Addr>().is_ok();
    }
    matches!(inner.parse::<IpAddr>(), Ok(IpAddr::V4(_)))
}
