use thiserror::Error;

/// Error type for password operations.
///
/// Verification never fails with an error: a wrong password or a malformed
/// stored hash both verify as `false`.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}
