use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by a bearer token.
///
/// Timestamps are Unix seconds. A token is only meaningful once its
/// signature has been verified; these values are never read otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (the credential identity the token asserts)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for `subject` issued at `issued_at`, expiring after `lifetime`.
    ///
    /// # Arguments
    /// * `subject` - Credential identity
    /// * `issued_at` - Minting time taken from the trusted clock
    /// * `lifetime` - Time to live of the token
    ///
    /// # Returns
    /// Claims with sub, iat and exp set
    pub fn new(subject: impl ToString, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub: subject.to_string(),
            iat,
            exp: iat + lifetime.num_seconds(),
        }
    }

    /// Check if the token is expired at `now`.
    ///
    /// A token expiring exactly at `now` is expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}
