//! Credential Verifier
//! Mission: Validate signup fields and handle password hashing

use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};
use std::fmt;

pub const NAME_MIN: usize = 20;
pub const NAME_MAX: usize = 60;
pub const ADDRESS_MAX: usize = 400;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 16;

/// Symbols accepted as the special character in passwords.
pub const SPECIAL_CHARS: &str = "!@#$%^&*";

/// Client-correctable input failures, all mapped to 400.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    FieldMissing(&'static str),
    NameLength,
    InvalidEmail,
    AddressTooLong,
    WeakPassword,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldMissing(field) => write!(f, "{} is required", field),
            ValidationError::NameLength => {
                write!(f, "Name must be {}-{} characters", NAME_MIN, NAME_MAX)
            }
            ValidationError::InvalidEmail => write!(f, "Invalid email format"),
            ValidationError::AddressTooLong => {
                write!(f, "Address must be under {} characters", ADDRESS_MAX)
            }
            ValidationError::WeakPassword => write!(
                f,
                "Password must be {}-{} chars, include uppercase & special char",
                PASSWORD_MIN, PASSWORD_MAX
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Unwrap a required field, rejecting absent or empty values.
pub fn require<'a>(
    value: Option<&'a str>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::FieldMissing(field)),
    }
}

/// Name length check, boundaries inclusive.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.chars().count();
    if !(NAME_MIN..=NAME_MAX).contains(&len) {
        return Err(ValidationError::NameLength);
    }
    Ok(())
}

/// Shape check for `local@domain.tld`: no whitespace, exactly one `@`,
/// and a dot-separated domain with a non-empty tld.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail);
    };
    if local.is_empty() || domain.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return Err(ValidationError::InvalidEmail);
    };
    if host.is_empty() || tld.is_empty() {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_address(address: &str) -> Result<(), ValidationError> {
    if address.chars().count() > ADDRESS_MAX {
        return Err(ValidationError::AddressTooLong);
    }
    Ok(())
}

/// Passwords are 8-16 chars with at least one uppercase letter and one
/// symbol from [`SPECIAL_CHARS`].
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
        return Err(ValidationError::WeakPassword);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::WeakPassword);
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(ValidationError::WeakPassword);
    }
    Ok(())
}

/// Full signup validation. Checks run in field order and the first failure
/// wins, before any state is touched.
pub fn validate_signup(
    name: &str,
    email: &str,
    password: &str,
    address: &str,
) -> Result<(), ValidationError> {
    validate_name(name)?;
    validate_email(email)?;
    validate_password(password)?;
    validate_address(address)?;
    Ok(())
}

/// Store creation shares the name/email/address rules with signup.
pub fn validate_store_fields(
    name: &str,
    email: &str,
    address: &str,
) -> Result<(), ValidationError> {
    validate_name(name)?;
    validate_email(email)?;
    validate_address(address)?;
    Ok(())
}

/// One-way salted, cost-factored hash.
pub fn hash_password(plaintext: &str) -> Result<String> {
    hash(plaintext, DEFAULT_COST).context("Failed to hash password")
}

/// Comparison goes through bcrypt's own verify routine.
pub fn verify_password(plaintext: &str, hashed: &str) -> Result<bool> {
    verify(plaintext, hashed).context("Failed to verify password")
}
