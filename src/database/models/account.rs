use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
    /// bcrypt hash
    #[serde(skip_serializing, default)]
    pub password: String,
    pub name: String,
    pub email: String,
    pub ktp_number: String,
    pub phone_number: String,
    pub dob: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing, default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub email: String,
    pub ktp_number: String,
    pub phone_number: String,
    pub dob: NaiveDate,
}

/// Columns to overwrite; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub ktp_number: Option<String>,
    pub phone_number: Option<String>,
    pub dob: Option<NaiveDate>,
}
