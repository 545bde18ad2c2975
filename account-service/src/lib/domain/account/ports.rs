use async_trait::async_trait;

use crate::account::errors::AccountError;
use crate::account::identity::AuthenticatedIdentity;
use crate::account::models::Account;
use crate::account::models::AccountUpdate;
use crate::account::models::EmailAddress;
use crate::account::models::LoginCommand;
use crate::account::models::RegisterCommand;
use crate::account::models::UpdateAccountCommand;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account with the default role.
    ///
    /// # Arguments
    /// * `command` - Validated command containing email and password
    ///
    /// # Returns
    /// Created account entity
    ///
    /// # Errors
    /// * `AlreadyExists` - Email is already registered
    /// * `HashingFailed` - Password could not be hashed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Account, AccountError>;

    /// Exchange credentials for a signed bearer token.
    ///
    /// # Returns
    /// Bearer token asserting the account's email
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<String, AccountError>;

    /// Retrieve the account behind the request's identity.
    ///
    /// # Errors
    /// * `Unauthenticated` - The identity no longer resolves to an account
    /// * `DatabaseError` - Database operation failed
    async fn current_account(
        &self,
        identity: &AuthenticatedIdentity,
    ) -> Result<Account, AccountError>;

    /// Update email and/or password of the account behind the request's identity.
    ///
    /// # Returns
    /// Updated account, plus a fresh token when the email changed
    ///
    /// # Errors
    /// * `Unauthenticated` - The identity no longer resolves to an account
    /// * `EmailInUse` - New email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn update_current_account(
        &self,
        identity: &AuthenticatedIdentity,
        command: UpdateAccountCommand,
    ) -> Result<AccountUpdate, AccountError>;
}

/// Persistence operations for credential records.
///
/// Implementations own identity uniqueness: `create` and `update` must reject
/// a duplicate email atomically, not through a separate existence check.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Retrieve an account by its identity.
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError>;

    /// Check whether an identity is registered.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, AccountError>;

    /// Persist a new account together with its roles.
    ///
    /// # Errors
    /// * `AlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, account: Account) -> Result<Account, AccountError>;

    /// Persist changes to an existing account (email, password hash).
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `EmailInUse` - New email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, account: Account) -> Result<Account, AccountError>;
}

/// Resolves a raw bearer token into a request identity.
///
/// Infallible by contract: every failure collapses into `None`.
#[async_trait]
pub trait IdentityResolver: Send + Sync + 'static {
    async fn resolve(&self, token: &str) -> Option<AuthenticatedIdentity>;
}
