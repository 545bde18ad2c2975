use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::JwtError;
use thiserror::Error;

use crate::account::errors::AccountError;
use crate::account::identity::AuthenticatedIdentity;
use crate::account::models::EmailAddress;
use crate::account::ports::CredentialStore;
use crate::account::ports::IdentityResolver;

/// Reasons a bearer token does not yield an identity.
///
/// Only ever logged; callers of the gate see an anonymous request.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("token rejected: {0}")]
    Token(#[from] JwtError),

    #[error("token subject is not an email address")]
    InvalidSubject,

    #[error("token subject no longer has an account")]
    SubjectNotFound,

    #[error("credential lookup failed: {0}")]
    Store(#[from] AccountError),
}

/// Turns a bearer token into a request identity.
///
/// The token is verified before the store is consulted, and the account is
/// read exactly once, so the identity reflects its current roles.
pub struct AuthenticationGate<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    authenticator: Arc<Authenticator>,
}

impl<S> AuthenticationGate<S>
where
    S: CredentialStore,
{
    pub fn new(store: Arc<S>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            store,
            authenticator,
        }
    }

    /// Verify `token` and load the identity it asserts.
    ///
    /// # Errors
    /// * `Token` - Malformed, forged or expired token
    /// * `InvalidSubject` - Subject cannot be an account identity
    /// * `SubjectNotFound` - No account holds the subject's email
    /// * `Store` - Credential lookup failed
    pub async fn authenticate_token(
        &self,
        token: &str,
    ) -> Result<AuthenticatedIdentity, GateError> {
        let claims = self.authenticator.validate_token(token)?;

        let email = EmailAddress::new(claims.sub).map_err(|_| GateError::InvalidSubject)?;

        let account = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(GateError::SubjectNotFound)?;

        Ok(AuthenticatedIdentity::from_account(&account))
    }
}

#[async_trait]
impl<S> IdentityResolver for AuthenticationGate<S>
where
    S: CredentialStore,
{
    async fn resolve(&self, token: &str) -> Option<AuthenticatedIdentity> {
        match self.authenticate_token(token).await {
            Ok(identity) => Some(identity),
            Err(GateError::Store(e)) => {
                tracing::warn!(error = %e, "Credential lookup failed while authenticating");
                None
            }
            Err(e) => {
                tracing::debug!(reason = %e, "Bearer token ignored");
                None
            }
        }
    }
}
