use chrono::DateTime;
use chrono::Duration;
use chrono::SubsecRound;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

/// A freshly signed token together with its validity window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates HS256 tokens with a fixed time-to-live.
///
/// Validation is stateless: a token is good if its signature checks out and
/// `now < exp`. Nothing is looked up, so a token cannot be revoked before it
/// expires.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenService {
    /// Default lifetime of an issued token.
    pub const DEFAULT_TTL_HOURS: i64 = 24;

    /// Create a token service from the process-wide signing secret.
    ///
    /// # Arguments
    /// * `secret` - Symmetric signing key (at least 32 bytes recommended)
    /// * `ttl` - Lifetime of every issued token
    ///
    /// # Errors
    /// * `MissingSecret` - The secret is empty
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::MissingSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            ttl,
        })
    }

    /// Sign a token for `subject`, valid from `now` until `now + ttl`.
    ///
    /// `now` is truncated to whole seconds first, so the reported window
    /// matches the `iat`/`exp` claims exactly.
    ///
    /// # Errors
    /// * `SigningFailed` - Claims could not be serialized or signed
    pub fn issue(
        &self,
        subject: &str,
        username: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, JwtError> {
        let now = now.trunc_subsecs(0);
        let claims = Claims::for_principal(subject, username.map(str::to_string), now, self.ttl);
        let header = Header::new(self.algorithm);

        let token = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| JwtError::SigningFailed(e.to_string()))?;

        Ok(IssuedToken {
            token,
            issued_at: now,
            expires_at: now + self.ttl,
        })
    }

    /// Verify the signature of `token`, then check it has not expired at `now`.
    ///
    /// # Errors
    /// * `Malformed` - Wrong shape, wrong algorithm, bad signature or bad payload
    /// * `Expired` - Signature is valid but `now >= exp`
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked against the caller's clock below.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| JwtError::Malformed(e.to_string()))?
            .claims;

        if claims.is_expired_at(now) {
            return Err(JwtError::Expired);
        }

        Ok(claims)
    }
}
