use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::CredentialHasher;
use crate::password::PasswordError;

const DECOY_PASSWORD: &str = "decoy-password-for-unknown-subjects";

/// Authentication coordinator combining password verification and token minting.
///
/// Shared read-only by every request handler; holds the signing key through
/// its [`JwtHandler`].
pub struct Authenticator {
    password_hasher: Box<dyn CredentialHasher>,
    jwt_handler: JwtHandler,
    /// Hash checked when the claimed subject has no credential.
    decoy_hash: Option<String>,
}

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Signed bearer token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator from its two collaborators.
    ///
    /// Hashes a decoy password once, at the configured cost, for
    /// [`Authenticator::verify_unknown_subject`].
    pub fn new(password_hasher: impl CredentialHasher, jwt_handler: JwtHandler) -> Self {
        let decoy_hash = password_hasher.hash(DECOY_PASSWORD).ok();

        Self {
            password_hasher: Box::new(password_hasher),
            jwt_handler,
            decoy_hash,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and mint a token for `subject`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Identity the token will assert
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash could not be parsed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.jwt_handler.mint(subject)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Spend one password verification for a subject that has no credential.
    ///
    /// A lookup miss then costs as much as a wrong password, so login timing
    /// does not reveal which identities are registered. The outcome is
    /// always a rejection and is discarded.
    pub fn verify_unknown_subject(&self, password: &str) {
        let _ = match &self.decoy_hash {
            Some(hash) => self.password_hasher.verify(password, hash),
            None => self.password_hasher.hash(password).map(|_| false),
        };
    }

    /// Mint a token without password verification.
    ///
    /// Used when the caller is already authenticated, e.g. to re-issue a
    /// token after the identity changed.
    pub fn issue_token(&self, subject: &str) -> Result<String, JwtError> {
        self.jwt_handler.mint(subject)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    /// * `JwtError` - Token is malformed, forged or expired
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.verify(token)
    }

    /// Check that `token` is valid and asserts `subject`.
    pub fn is_token_valid_for(&self, token: &str, subject: &str) -> bool {
        self.jwt_handler.is_valid_for(token, subject)
    }

    pub fn token_lifetime(&self) -> Duration {
        self.jwt_handler.lifetime()
    }
}
