use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Attendance, AttendanceKind, NewAttendance};
use crate::rest::Pagination;

const ATTENDANCE_COLUMNS: &str = "id, account_id, location_id, kind, note, created_at";

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Inserts only while the account's most recent kind is still `expected`.
    /// `None` means another entry was recorded since `expected` was read.
    async fn insert_if_latest(
        &self,
        attendance: NewAttendance,
        expected: Option<AttendanceKind>,
    ) -> Result<Option<Attendance>, DatabaseError>;

    /// Most recent entry for the account, if any
    async fn latest_for_account(&self, account_id: i64) -> Result<Option<Attendance>, DatabaseError>;

    /// Newest first
    async fn list_by_account(
        &self,
        account_id: i64,
        pagination: Pagination,
    ) -> Result<(Vec<Attendance>, i64), DatabaseError>;

    /// Newest first
    async fn list_by_location(
        &self,
        location_id: i64,
        pagination: Pagination,
    ) -> Result<(Vec<Attendance>, i64), DatabaseError>;
}

pub struct PgAttendanceRepository {
    pool: PgPool,
}

impl PgAttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list_where(
        &self,
        column: &'static str,
        value: i64,
        pagination: Pagination,
    ) -> Result<(Vec<Attendance>, i64), DatabaseError> {
        let sql = format!(
            "SELECT {} FROM attendances WHERE {} = $1 ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
            ATTENDANCE_COLUMNS, column
        );

        let rows = sqlx::query_as::<_, Attendance>(&sql)
            .bind(value)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM attendances WHERE {} = $1", column);
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(value)
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }
}

#[async_trait]
impl AttendanceRepository for PgAttendanceRepository {
    async fn insert_if_latest(
        &self,
        attendance: NewAttendance,
        expected: Option<AttendanceKind>,
    ) -> Result<Option<Attendance>, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        // Serializes writers for one account until commit
        sqlx::query("SELECT id FROM accounts WHERE id = $1 FOR UPDATE")
            .bind(attendance.account_id)
            .execute(&mut *tx)
            .await?;

        let latest = sqlx::query_scalar::<_, String>(
            "SELECT kind FROM attendances WHERE account_id = $1 ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .bind(attendance.account_id)
        .fetch_optional(&mut *tx)
        .await?;

        if latest.as_deref() != expected.map(|kind| kind.as_str()) {
            tx.rollback().await?;
            return Ok(None);
        }

        let sql = format!(
            "INSERT INTO attendances (account_id, location_id, kind, note)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            ATTENDANCE_COLUMNS
        );

        let row = sqlx::query_as::<_, Attendance>(&sql)
            .bind(attendance.account_id)
            .bind(attendance.location_id)
            .bind(attendance.kind.as_str())
            .bind(&attendance.note)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(row))
    }

    async fn latest_for_account(&self, account_id: i64) -> Result<Option<Attendance>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM attendances WHERE account_id = $1 ORDER BY created_at DESC, id DESC LIMIT 1",
            ATTENDANCE_COLUMNS
        );

        let row = sqlx::query_as::<_, Attendance>(&sql)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn list_by_account(
        &self,
        account_id: i64,
        pagination: Pagination,
    ) -> Result<(Vec<Attendance>, i64), DatabaseError> {
        self.list_where("account_id", account_id, pagination).await
    }

    async fn list_by_location(
        &self,
        location_id: i64,
        pagination: Pagination,
    ) -> Result<(Vec<Attendance>, i64), DatabaseError> {
        self.list_where("location_id", location_id, pagination).await
    }
}
