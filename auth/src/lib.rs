//! Authentication utilities library
//!
//! Provides the stateless token-authentication primitives of the account service:
//! - Password hashing (Argon2id)
//! - Bearer token minting and verification (HS256, strict expiry)
//! - A trusted clock abstraction for expiry checks
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_params(8, 1, 1).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use auth::JwtHandler;
//! use chrono::Duration;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24)).unwrap();
//! let token = handler.mint("alice@example.com").unwrap();
//! let claims = handler.verify(&token).unwrap();
//! assert_eq!(claims.sub, "alice@example.com");
//! assert!(!handler.is_valid_for(&token, "bob@example.com"));
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, JwtHandler, PasswordHasher};
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(
//!     PasswordHasher::with_params(8, 1, 1).unwrap(),
//!     JwtHandler::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24)).unwrap(),
//! );
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and mint token
//! let result = auth.authenticate("password123", &hash, "alice@example.com").unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.sub, "alice@example.com");
//! ```

pub mod authenticator;
pub mod clock;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::CredentialHasher;
pub use password::PasswordError;
pub use password::PasswordHasher;
