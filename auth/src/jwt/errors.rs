use thiserror::Error;

/// Error type for token minting and verification.
///
/// Verification failures (`MalformedToken`, `SignatureMismatch`, `Expired`) are
/// meant for logs only; callers at the HTTP boundary collapse them into
/// "unauthenticated".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Token signature does not match")]
    SignatureMismatch,

    #[error("Token is expired")]
    Expired,

    #[error("Token subject must not be empty")]
    MissingSubject,

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Signing key too short: at least {min_bytes} bytes required, got {actual_bytes}")]
    WeakKey {
        min_bytes: usize,
        actual_bytes: usize,
    },

    #[error("Token lifetime must be positive, got {0} seconds")]
    InvalidLifetime(i64),
}
