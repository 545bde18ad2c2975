use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::account::errors::EmailError;
use crate::account::errors::PasswordError;

/// Account aggregate entity.
///
/// The credential record behind an identity: the email is the token subject,
/// the roles feed the authorities of an authenticated request.
#[derive(Clone)]
pub struct Account {
    pub id: AccountId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account holding the default role.
    pub fn register(email: EmailAddress, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: AccountId::new(),
            email,
            password_hash,
            roles: vec![Role::user()],
            created_at: now,
            updated_at: now,
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("roles", &self.roles)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type, the credential identity.
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Arguments
    /// * `email` - Raw email string
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password as submitted by a client.
///
/// Never printed; the Debug output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MAX_LENGTH: usize = 1024;

    /// Create a new plaintext password.
    ///
    /// # Errors
    /// * `Blank` - Password is empty or whitespace only
    /// * `TooLong` - Password exceeds 1024 bytes
    pub fn new(password: String) -> Result<Self, PasswordError> {
        if password.trim().is_empty() {
            return Err(PasswordError::Blank);
        }
        if password.len() > Self::MAX_LENGTH {
            return Err(PasswordError::TooLong {
                max: Self::MAX_LENGTH,
                actual: password.len(),
            });
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Named authority held by an account, e.g. `USER` or `ADMIN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Role(String);

impl Role {
    pub const USER: &'static str = "USER";
    pub const ADMIN: &'static str = "ADMIN";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The role assigned at registration.
    pub fn user() -> Self {
        Self::new(Self::USER)
    }

    pub fn admin() -> Self {
        Self::new(Self::ADMIN)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to register a new account with domain types
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: Password,
}

impl RegisterCommand {
    pub fn new(email: EmailAddress, password: Password) -> Self {
        Self { email, password }
    }
}

/// Command to exchange credentials for a bearer token.
///
/// Kept as raw strings: a malformed email at login is an invalid credential,
/// not a validation error.
#[derive(Debug)]
pub struct LoginCommand {
    pub email: String,
    pub password: Password,
}

/// Command to update the authenticated account.
///
/// All fields are optional to support partial updates.
/// Only provided fields will be updated.
#[derive(Debug, Default)]
pub struct UpdateAccountCommand {
    pub email: Option<EmailAddress>,
    pub password: Option<Password>,
}

/// Outcome of a self-service update.
#[derive(Debug, Clone)]
pub struct AccountUpdate {
    pub account: Account,
    /// Fresh token for the new identity, present when the email changed.
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(EmailAddress::new("alice@x.com".to_string()).is_ok());
        assert!(matches!(
            EmailAddress::new("not-an-email".to_string()),
            Err(EmailError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_password_validation() {
        assert!(Password::new("pw1".to_string()).is_ok());
        assert_eq!(Password::new("   ".to_string()), Err(PasswordError::Blank));
        assert_eq!(
            Password::new("x".repeat(1025)),
            Err(PasswordError::TooLong {
                max: 1024,
                actual: 1025
            })
        );
    }

    #[test]
    fn test_register_assigns_default_role() {
        let account = Account::register(
            EmailAddress::new("alice@x.com".to_string()).unwrap(),
            "$argon2id$hash".to_string(),
            Utc::now(),
        );

        assert_eq!(account.roles, vec![Role::user()]);
        assert_eq!(account.created_at, account.updated_at);
    }

    #[test]
    fn test_secrets_are_redacted_in_debug_output() {
        let account = Account::register(
            EmailAddress::new("alice@x.com".to_string()).unwrap(),
            "$argon2id$secret_hash".to_string(),
            Utc::now(),
        );
        let password = Password::new("hunter2".to_string()).unwrap();

        assert!(!format!("{:?}", account).contains("secret_hash"));
        assert!(!format!("{:?}", password).contains("hunter2"));
    }
}
