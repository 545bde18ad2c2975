use crate::account::models::Account;
use crate::account::models::EmailAddress;
use crate::account::models::Role;

/// Marker prepended to a role name to form its authority string.
pub const AUTHORITY_PREFIX: &str = "ROLE_";

/// Map a role to the authority string consulted by route policy.
///
/// `ADMIN` becomes `ROLE_ADMIN`.
pub fn authority_for(role: &Role) -> String {
    format!("{}{}", AUTHORITY_PREFIX, role.as_str())
}

/// Identity established for a single request from a verified bearer token.
///
/// Built fresh by the authentication gate for every request and stored in
/// that request's extensions; it is never persisted or shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    email: EmailAddress,
    authorities: Vec<String>,
}

impl AuthenticatedIdentity {
    /// Derive the identity from the credential's current roles.
    pub fn from_account(account: &Account) -> Self {
        Self {
            email: account.email.clone(),
            authorities: account.roles.iter().map(authority_for).collect(),
        }
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn authorities(&self) -> &[String] {
        &self.authorities
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}
