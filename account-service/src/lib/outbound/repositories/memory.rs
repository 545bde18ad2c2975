use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::EmailAddress;
use crate::account::ports::CredentialStore;

/// Credential store kept in process memory, keyed by email.
///
/// Used when no database is configured and by the API tests. Every write
/// holds the lock for its whole check-and-insert, so uniqueness is atomic.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError> {
        Ok(self.accounts.read().await.get(email.as_str()).cloned())
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, AccountError> {
        Ok(self.accounts.read().await.contains_key(email.as_str()))
    }

    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.write().await;

        if accounts.contains_key(account.email.as_str()) {
            return Err(AccountError::AlreadyExists(account.email.to_string()));
        }

        accounts.insert(account.email.as_str().to_string(), account.clone());
        Ok(account)
    }

    async fn update(&self, account: Account) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.write().await;

        let current_key = accounts
            .iter()
            .find(|(_, stored)| stored.id == account.id)
            .map(|(key, _)| key.clone())
            .ok_or_else(|| AccountError::NotFound(account.id.to_string()))?;

        if current_key != account.email.as_str() {
            if accounts.contains_key(account.email.as_str()) {
                return Err(AccountError::EmailInUse(account.email.to_string()));
            }
            accounts.remove(&current_key);
        }

        accounts.insert(account.email.as_str().to_string(), account.clone());
        Ok(account)
    }
}
