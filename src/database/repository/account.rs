use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Account, AccountChanges, NewAccount};

use super::unique_violation;

const ACCOUNT_COLUMNS: &str = "id, username, password, name, email, ktp_number, phone_number, dob, \
                               created_at, updated_at, deleted_at";

/// Columns that must be unique among live accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountField {
    Username,
    Email,
    KtpNumber,
    PhoneNumber,
}

impl AccountField {
    pub fn column(&self) -> &'static str {
        match self {
            AccountField::Username => "username",
            AccountField::Email => "email",
            AccountField::KtpNumber => "ktp_number",
            AccountField::PhoneNumber => "phone_number",
        }
    }
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn insert(&self, account: NewAccount) -> Result<Account, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, DatabaseError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DatabaseError>;

    /// Whether a live account other than `exclude_id` already holds `value`
    async fn is_taken(
        &self,
        field: AccountField,
        value: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, DatabaseError>;

    /// Returns false when no live account has `id`
    async fn update(&self, id: i64, changes: AccountChanges) -> Result<bool, DatabaseError>;

    async fn update_password(&self, username: &str, password_hash: &str) -> Result<bool, DatabaseError>;

    async fn soft_delete(&self, id: i64) -> Result<bool, DatabaseError>;
}

pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn insert(&self, account: NewAccount) -> Result<Account, DatabaseError> {
        let sql = format!(
            "INSERT INTO accounts (username, password, name, email, ktp_number, phone_number, dob)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            ACCOUNT_COLUMNS
        );

        let row = sqlx::query_as::<_, Account>(&sql)
            .bind(&account.username)
            .bind(&account.password_hash)
            .bind(&account.name)
            .bind(&account.email)
            .bind(&account.ktp_number)
            .bind(&account.phone_number)
            .bind(account.dob)
            .fetch_one(&self.pool)
            .await
            .map_err(unique_violation)?;

        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM accounts WHERE id = $1 AND deleted_at IS NULL",
            ACCOUNT_COLUMNS
        );

        let row = sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM accounts WHERE username = $1 AND deleted_at IS NULL",
            ACCOUNT_COLUMNS
        );

        let row = sqlx::query_as::<_, Account>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn is_taken(
        &self,
        field: AccountField,
        value: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, DatabaseError> {
        let sql = format!(
            "SELECT EXISTS (
                 SELECT 1 FROM accounts
                 WHERE {} = $1 AND deleted_at IS NULL AND ($2::BIGINT IS NULL OR id <> $2)
             )",
            field.column()
        );

        let taken = sqlx::query_scalar::<_, bool>(&sql)
            .bind(value)
            .bind(exclude_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(taken)
    }

    async fn update(&self, id: i64, changes: AccountChanges) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE accounts SET
                 username = COALESCE($2, username),
                 password = COALESCE($3, password),
                 name = COALESCE($4, name),
                 email = COALESCE($5, email),
                 ktp_number = COALESCE($6, ktp_number),
                 phone_number = COALESCE($7, phone_number),
                 dob = COALESCE($8, dob),
                 updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(changes.username)
        .bind(changes.password_hash)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.ktp_number)
        .bind(changes.phone_number)
        .bind(changes.dob)
        .execute(&self.pool)
        .await
        .map_err(unique_violation)?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_password(&self, username: &str, password_hash: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE accounts SET password = $2, updated_at = NOW()
             WHERE username = $1 AND deleted_at IS NULL",
        )
        .bind(username)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE accounts SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
