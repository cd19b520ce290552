use std::sync::OnceLock;

use chrono::DateTime;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::IssuedToken;
use crate::jwt::JwtError;
use crate::jwt::TokenService;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Plaintext behind the placeholder hash verified for unknown usernames.
const PLACEHOLDER_PASSWORD: &str = "placeholder-password-for-unknown-users";

/// Authentication coordinator combining password verification and token issuance.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_service: TokenService,
    placeholder_hash: OnceLock<Option<String>>,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token error: {0}")]
    Token(#[from] JwtError),
}

impl Authenticator {
    pub fn new(token_service: TokenService) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_service,
            placeholder_hash: OnceLock::new(),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token for `subject`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Principal id written into the token
    /// * `username` - Username carried alongside the subject
    /// * `now` - Issue time
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match or the stored hash is unusable
    /// * `Token` - Token signing failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.token_service.issue(subject, Some(username), now)?)
    }

    /// Fail a login for a username that does not exist.
    ///
    /// Runs the same Argon2 verification as `authenticate` against a
    /// placeholder hash, so an unknown username costs as much as a wrong
    /// password. Always returns `InvalidCredentials`.
    pub fn reject_unknown_user(&self, password: &str) -> AuthenticationError {
        if let Some(hash) = self.placeholder_hash() {
            let _ = self.password_hasher.verify(password, hash);
        }
        AuthenticationError::InvalidCredentials
    }

    fn placeholder_hash(&self) -> Option<&str> {
        self.placeholder_hash
            .get_or_init(|| match self.password_hasher.hash(PLACEHOLDER_PASSWORD) {
                Ok(hash) => Some(hash),
                Err(e) => {
                    tracing::warn!(error = %e, "Could not build placeholder password hash");
                    None
                }
            })
            .as_deref()
    }

    /// Validate a bearer token at `now` and return its claims.
    ///
    /// # Errors
    /// * `Malformed` - Signature or shape is wrong
    /// * `Expired` - Token is past its expiry
    pub fn validate_token(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        self.token_service.validate(token, now)
    }

    pub fn token_service(&self) -> &TokenService {
        &self.token_service
    }
}
