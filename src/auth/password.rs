use crate::error::AppError;
use bcrypt::{hash, verify};

/// bcrypt only reads this many bytes of input and ignores the rest.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hashes `password` with a fresh salt at the given bcrypt cost.
///
/// Passwords longer than [`MAX_PASSWORD_BYTES`] are refused rather than truncated.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(password_too_long());
    }
    hash(password, cost)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

/// Checks `password` against a stored bcrypt hash. The digest comparison is constant time.
///
/// An over-long password never matches, since no stored hash can have come from it.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Ok(false);
    }
    verify(password, hashed_password)
        .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
}

fn password_too_long() -> AppError {
    AppError::BadRequest(format!(
        "Password must be at most {} bytes",
        MAX_PASSWORD_BYTES
    ))
}
