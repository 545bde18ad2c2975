pub mod argon2;
pub mod errors;

pub use self::argon2::PasswordHasher;
pub use errors::PasswordError;

/// One-way password hashing as consumed by the [`Authenticator`](crate::Authenticator).
pub trait CredentialHasher: Send + Sync + 'static {
    /// Hash a plaintext password into a PHC string.
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Check a plaintext password against a stored PHC string.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError>;
}

impl CredentialHasher for PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        PasswordHasher::hash(self, password)
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        PasswordHasher::verify(self, password, hash)
    }
}
