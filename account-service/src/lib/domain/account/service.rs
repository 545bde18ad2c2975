use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::Utc;

use crate::account::errors::AccountError;
use crate::account::identity::AuthenticatedIdentity;
use crate::account::models::Account;
use crate::account::models::AccountUpdate;
use crate::account::models::EmailAddress;
use crate::account::models::LoginCommand;
use crate::account::models::RegisterCommand;
use crate::account::models::UpdateAccountCommand;
use crate::account::ports::AccountServicePort;
use crate::account::ports::CredentialStore;

/// Domain service implementation for account operations.
///
/// Concrete implementation of AccountServicePort with dependency injection.
pub struct AccountService<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    authenticator: Arc<Authenticator>,
}

impl<S> AccountService<S>
where
    S: CredentialStore,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    /// * `authenticator` - Password hashing and token minting
    pub fn new(store: Arc<S>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            store,
            authenticator,
        }
    }
}

#[async_trait]
impl<S> AccountServicePort for AccountService<S>
where
    S: CredentialStore,
{
    async fn register(&self, command: RegisterCommand) -> Result<Account, AccountError> {
        if self.store.exists_by_email(&command.email).await? {
            return Err(AccountError::AlreadyExists(command.email.to_string()));
        }

        let password_hash = self
            .authenticator
            .hash_password(command.password.expose())?;

        let account = Account::register(command.email, password_hash, Utc::now());

        // The store's uniqueness constraint decides a concurrent duplicate.
        let created = self.store.create(account).await?;

        tracing::info!(account_id = %created.id, "Account registered");

        Ok(created)
    }

    async fn login(&self, command: LoginCommand) -> Result<String, AccountError> {
        let account = match EmailAddress::new(command.email) {
            Ok(email) => self.store.find_by_email(&email).await?,
            Err(_) => None,
        };

        // A miss must cost as much as a wrong password.
        let Some(account) = account else {
            self.authenticator.verify_unknown_subject(command.password.expose());
            return Err(AccountError::InvalidCredentials);
        };

        let result = self
            .authenticator
            .authenticate(
                command.password.expose(),
                &account.password_hash,
                account.email.as_str(),
            )
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => AccountError::InvalidCredentials,
                AuthenticationError::PasswordError(err) => {
                    AccountError::HashingFailed(err.to_string())
                }
                AuthenticationError::JwtError(err) => AccountError::Token(err),
            })?;

        tracing::info!(account_id = %account.id, "Bearer token issued");

        Ok(result.access_token)
    }

    async fn current_account(
        &self,
        identity: &AuthenticatedIdentity,
    ) -> Result<Account, AccountError> {
        self.store
            .find_by_email(identity.email())
            .await?
            .ok_or(AccountError::Unauthenticated)
    }

    async fn update_current_account(
        &self,
        identity: &AuthenticatedIdentity,
        command: UpdateAccountCommand,
    ) -> Result<AccountUpdate, AccountError> {
        let mut account = self
            .store
            .find_by_email(identity.email())
            .await?
            .ok_or(AccountError::Unauthenticated)?;

        let mut email_changed = false;

        if let Some(new_email) = command.email {
            if new_email != account.email {
                if self.store.exists_by_email(&new_email).await? {
                    return Err(AccountError::EmailInUse(new_email.to_string()));
                }
                account.email = new_email;
                email_changed = true;
            }
        }

        if let Some(new_password) = command.password {
            account.password_hash = self.authenticator.hash_password(new_password.expose())?;
        }

        account.updated_at = Utc::now();

        let updated = self.store.update(account).await.map_err(|e| match e {
            AccountError::NotFound(_) => AccountError::Unauthenticated,
            other => other,
        })?;

        // Tokens bearing the old email stop resolving; hand out one for the new identity.
        let token = if email_changed {
            tracing::info!(account_id = %updated.id, "Email changed, re-issuing bearer token");
            Some(self.authenticator.issue_token(updated.email.as_str())?)
        } else {
            None
        };

        Ok(AccountUpdate {
            account: updated,
            token,
        })
    }
}
