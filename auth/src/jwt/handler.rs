use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;
use crate::clock::Clock;
use crate::clock::SystemClock;

/// Minimum HS256 key length (256 bits).
pub const MIN_SECRET_BYTES: usize = 32;

/// Token codec: mints and verifies HS256 bearer tokens.
///
/// The only component holding the signing secret. Tokens declaring any other
/// algorithm are rejected, and expiry is evaluated against the injected
/// [`Clock`] with strict semantics (`now < exp`) and no leeway.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtHandler {
    /// Create a new JWT handler using the system clock.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (at least 32 bytes)
    /// * `lifetime` - Time to live of minted tokens
    ///
    /// # Errors
    /// * `WeakKey` - Secret shorter than 256 bits
    /// * `InvalidLifetime` - Lifetime is zero or negative
    ///
    /// # Security Notes
    /// - Store secrets in environment variables or secure vaults, never in code
    /// - Rotating the secret invalidates every outstanding token
    pub fn new(secret: &[u8], lifetime: Duration) -> Result<Self, JwtError> {
        Self::with_clock(secret, lifetime, Arc::new(SystemClock))
    }

    /// Create a new JWT handler with an explicit clock.
    pub fn with_clock(
        secret: &[u8],
        lifetime: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, JwtError> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(JwtError::WeakKey {
                min_bytes: MIN_SECRET_BYTES,
                actual_bytes: secret.len(),
            });
        }

        if lifetime <= Duration::zero() {
            return Err(JwtError::InvalidLifetime(lifetime.num_seconds()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against our own clock after the signature verified.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            lifetime,
            clock,
        })
    }

    /// Mint a token asserting `subject`.
    ///
    /// # Returns
    /// Compact token string with `{sub, iat = now, exp = now + lifetime}`
    ///
    /// # Errors
    /// * `MissingSubject` - Subject is empty
    /// * `EncodingFailed` - Token encoding failed
    pub fn mint(&self, subject: &str) -> Result<String, JwtError> {
        if subject.is_empty() {
            return Err(JwtError::MissingSubject);
        }

        let claims = Claims::new(subject, self.clock.now(), self.lifetime);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a token's signature and expiry, then return its claims.
    ///
    /// # Errors
    /// * `MalformedToken` - Structure, encoding or required claims are invalid
    /// * `SignatureMismatch` - Wrong key, tampering, or a foreign algorithm
    /// * `Expired` - `now >= exp` (only checked once the signature verified)
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(classify)?
            .claims;

        if claims.is_expired(self.clock.now()) {
            return Err(JwtError::Expired);
        }

        Ok(claims)
    }

    /// Check that `token` verifies and asserts `expected_subject`.
    ///
    /// Never fails: any verification error yields `false`.
    pub fn is_valid_for(&self, token: &str, expected_subject: &str) -> bool {
        self.verify(token)
            .map(|claims| claims.sub == expected_subject)
            .unwrap_or(false)
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> JwtError {
    match err.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => JwtError::SignatureMismatch,
        ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::MalformedToken(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use chrono::Utc;
    use serde::Serialize;

    use super::*;
    use crate::clock::ManualClock;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn handler_at(clock: Arc<ManualClock>) -> JwtHandler {
        JwtHandler::with_clock(SECRET, Duration::hours(24), clock).expect("valid handler")
    }

    #[test]
    fn test_mint_and_verify() {
        let handler = handler_at(Arc::new(ManualClock::new(start())));

        for subject in ["alice@x.com", "bob@example.org", "a"] {
            let token = handler.mint(subject).expect("Failed to mint token");
            assert_eq!(token.split('.').count(), 3);

            let claims = handler.verify(&token).expect("Failed to verify token");
            assert_eq!(claims.sub, subject);
            assert_eq!(claims.iat, start().timestamp());
            assert_eq!(claims.exp, start().timestamp() + 24 * 60 * 60);
        }
    }

    #[test]
    fn test_mint_rejects_empty_subject() {
        let handler = JwtHandler::new(SECRET, Duration::hours(24)).unwrap();
        assert_eq!(handler.mint(""), Err(JwtError::MissingSubject));
    }

    #[test]
    fn test_expiry_boundary() {
        let clock = Arc::new(ManualClock::new(start()));
        let handler = handler_at(clock.clone());
        let token = handler.mint("alice@x.com").unwrap();

        clock.set(start() + Duration::hours(24) - Duration::seconds(1));
        assert!(handler.verify(&token).is_ok());

        clock.set(start() + Duration::hours(24));
        assert_eq!(handler.verify(&token), Err(JwtError::Expired));

        clock.set(start() + Duration::hours(24) + Duration::seconds(1));
        assert_eq!(handler.verify(&token), Err(JwtError::Expired));
    }

    #[test]
    fn test_tampering_is_never_accepted() {
        let handler = handler_at(Arc::new(ManualClock::new(start())));
        let token = handler.mint("alice@x.com").unwrap();

        // Claims and signature segments start after the header.
        let header_len = token.find('.').unwrap() + 1;

        for (index, original) in token.char_indices().skip(header_len) {
            if original == '.' {
                continue;
            }
            let replacement = if original == 'A' { 'B' } else { 'A' };
            let mut tampered = token.clone();
            tampered.replace_range(index..index + 1, &replacement.to_string());

            let result = handler.verify(&tampered);
            assert!(
                matches!(
                    result,
                    Err(JwtError::SignatureMismatch) | Err(JwtError::MalformedToken(_))
                ),
                "tampered byte {} was accepted: {:?}",
                index,
                result
            );
        }
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let clock = Arc::new(ManualClock::new(start()));
        let handler1 = handler_at(clock.clone());
        let handler2 = JwtHandler::with_clock(
            b"secret2_at_least_32_bytes_long_key!",
            Duration::hours(24),
            clock,
        )
        .unwrap();

        let token = handler1.mint("alice@x.com").unwrap();

        assert_eq!(handler2.verify(&token), Err(JwtError::SignatureMismatch));
    }

    #[test]
    fn test_signature_is_checked_before_expiry() {
        let clock = Arc::new(ManualClock::new(start()));
        let handler1 = handler_at(clock.clone());
        let handler2 = JwtHandler::with_clock(
            b"secret2_at_least_32_bytes_long_key!",
            Duration::hours(24),
            clock.clone(),
        )
        .unwrap();

        let token = handler1.mint("alice@x.com").unwrap();
        clock.advance(Duration::days(30));

        assert_eq!(handler2.verify(&token), Err(JwtError::SignatureMismatch));
        assert_eq!(handler1.verify(&token), Err(JwtError::Expired));
    }

    #[test]
    fn test_foreign_algorithm_is_rejected() {
        let handler = handler_at(Arc::new(ManualClock::new(start())));
        let claims = Claims::new("alice@x.com", start(), Duration::hours(1));

        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(handler.verify(&token), Err(JwtError::SignatureMismatch));
    }

    #[test]
    fn test_unsigned_token_is_rejected() {
        let handler = handler_at(Arc::new(ManualClock::new(start())));
        let token = handler.mint("alice@x.com").unwrap();
        let claims_segment = token.split('.').nth(1).unwrap();

        // {"alg":"none","typ":"JWT"}
        let unsigned = format!("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.{}.", claims_segment);

        assert!(matches!(
            handler.verify(&unsigned),
            Err(JwtError::MalformedToken(_))
        ));
    }

    #[test]
    fn test_missing_subject_claim_is_malformed() {
        #[derive(Serialize)]
        struct NoSubject {
            iat: i64,
            exp: i64,
        }

        let handler = handler_at(Arc::new(ManualClock::new(start())));
        let token = encode(
            &Header::new(Algorithm::HS256),
            &NoSubject {
                iat: start().timestamp(),
                exp: start().timestamp() + 60,
            },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(
            handler.verify(&token),
            Err(JwtError::MalformedToken(_))
        ));
    }

    #[test]
    fn test_verify_garbage() {
        let handler = handler_at(Arc::new(ManualClock::new(start())));

        for garbage in ["", "garbage", "invalid.token.here", "a.b", "...."] {
            assert!(matches!(
                handler.verify(garbage),
                Err(JwtError::MalformedToken(_)) | Err(JwtError::SignatureMismatch)
            ));
        }
    }

    #[test]
    fn test_is_valid_for() {
        let clock = Arc::new(ManualClock::new(start()));
        let handler = handler_at(clock.clone());
        let token = handler.mint("alice@x.com").unwrap();

        assert!(handler.is_valid_for(&token, "alice@x.com"));
        assert!(!handler.is_valid_for(&token, "bob@x.com"));
        assert!(!handler.is_valid_for("garbage", "alice@x.com"));

        clock.advance(Duration::hours(24));
        assert!(!handler.is_valid_for(&token, "alice@x.com"));
    }

    #[test]
    fn test_weak_key_is_rejected() {
        let result = JwtHandler::new(b"too_short", Duration::hours(24));
        assert!(matches!(
            result,
            Err(JwtError::WeakKey {
                min_bytes: 32,
                actual_bytes: 9
            })
        ));

        assert!(JwtHandler::new(&[7u8; 32], Duration::hours(24)).is_ok());
    }

    #[test]
    fn test_non_positive_lifetime_is_rejected() {
        assert!(matches!(
            JwtHandler::new(SECRET, Duration::zero()),
            Err(JwtError::InvalidLifetime(0))
        ));
    }
}
