use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::EmailAddress;
use crate::account::models::Role;
use crate::account::ports::CredentialStore;

const EMAIL_CONSTRAINT: &str = "accounts_email_key";

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    password_hash: String,
    roles: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AccountError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: AccountId(row.id),
            email: EmailAddress::new(row.email)?,
            password_hash: row.password_hash,
            roles: row.roles.into_iter().map(Role::new).collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn is_email_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db_err| {
            db_err.is_unique_violation() && db_err.constraint() == Some(EMAIL_CONSTRAINT)
        })
        .unwrap_or(false)
}

fn database_error(e: sqlx::Error) -> AccountError {
    AccountError::DatabaseError(e.to_string())
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT a.id, a.email, a.password_hash, a.created_at, a.updated_at,
                   COALESCE(
                       array_agg(r.name ORDER BY r.id) FILTER (WHERE r.name IS NOT NULL),
                       '{}'
                   ) AS roles
            FROM accounts a
            LEFT JOIN account_roles ar ON ar.account_id = a.id
            LEFT JOIN roles r ON r.id = ar.role_id
            WHERE a.email = $1
            GROUP BY a.id
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(Account::try_from).transpose()
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, AccountError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM accounts WHERE email = $1)")
            .bind(email.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(database_error)
    }

    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(account.id.0)
        .bind(account.email.as_str())
        .bind(&account.password_hash)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_email_violation(&e) {
                return AccountError::AlreadyExists(account.email.to_string());
            }
            database_error(e)
        })?;

        let role_names: Vec<String> = account
            .roles
            .iter()
            .map(|role| role.as_str().to_string())
            .collect();

        sqlx::query(
            r#"
            INSERT INTO roles (name)
            SELECT unnest($1::text[])
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(&role_names)
        .execute(&mut *tx)
        .await
        .map_err(database_error)?;

        sqlx::query(
            r#"
            INSERT INTO account_roles (account_id, role_id)
            SELECT $1, id FROM roles WHERE name = ANY($2)
            "#,
        )
        .bind(account.id.0)
        .bind(&role_names)
        .execute(&mut *tx)
        .await
        .map_err(database_error)?;

        tx.commit().await.map_err(database_error)?;

        tracing::debug!(account_id = %account.id, "Account persisted");

        Ok(account)
    }

    async fn update(&self, account: Account) -> Result<Account, AccountError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET email = $2, password_hash = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(account.id.0)
        .bind(account.email.as_str())
        .bind(&account.password_hash)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_email_violation(&e) {
                return AccountError::EmailInUse(account.email.to_string());
            }
            database_error(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound(account.id.to_string()));
        }

        Ok(account)
    }
}
