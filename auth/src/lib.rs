//! Authentication utilities library
//!
//! Provides the credential and token primitives used by the service:
//! - Password hashing (Argon2id)
//! - Signed, time-bounded tokens (HS256 JWT)
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("other_password", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::TokenService;
//! use chrono::{Duration, Utc};
//!
//! let service = TokenService::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24)).unwrap();
//! let now = Utc::now();
//! let issued = service.issue("user123", Some("alice"), now).unwrap();
//! let claims = service.validate(&issued.token, now).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, TokenService};
//! use chrono::{Duration, Utc};
//!
//! let tokens = TokenService::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24)).unwrap();
//! let auth = Authenticator::new(tokens);
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let now = Utc::now();
//! let issued = auth.authenticate("password123", &hash, "user123", "alice", now).unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&issued.token, now).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::IssuedToken;
pub use jwt::JwtError;
pub use jwt::TokenService;
pub use password::PasswordError;
pub use password::PasswordHasher;
