use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Location, LocationChanges, NewLocation};
use crate::rest::Pagination;

use super::unique_violation;

const LOCATION_COLUMNS: &str =
    "id, name, address, latitude, longitude, radius_meters, created_at, updated_at, deleted_at";

#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// One page ordered by id, plus the total number of live locations
    async fn list(&self, pagination: Pagination) -> Result<(Vec<Location>, i64), DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Location>, DatabaseError>;

    async fn name_taken(&self, name: &str, exclude_id: Option<i64>) -> Result<bool, DatabaseError>;

    async fn insert(&self, location: NewLocation) -> Result<Location, DatabaseError>;

    async fn update(&self, id: i64, changes: LocationChanges) -> Result<bool, DatabaseError>;

    async fn soft_delete(&self, id: i64) -> Result<bool, DatabaseError>;
}

pub struct PgLocationRepository {
    pool: PgPool,
}

impl PgLocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationRepository for PgLocationRepository {
    async fn list(&self, pagination: Pagination) -> Result<(Vec<Location>, i64), DatabaseError> {
        let sql = format!(
            "SELECT {} FROM locations WHERE deleted_at IS NULL ORDER BY id LIMIT $1 OFFSET $2",
            LOCATION_COLUMNS
        );

        let rows = sqlx::query_as::<_, Location>(&sql)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM locations WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Location>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM locations WHERE id = $1 AND deleted_at IS NULL",
            LOCATION_COLUMNS
        );

        let row = sqlx::query_as::<_, Location>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn name_taken(&self, name: &str, exclude_id: Option<i64>) -> Result<bool, DatabaseError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                 SELECT 1 FROM locations
                 WHERE name = $1 AND deleted_at IS NULL AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn insert(&self, location: NewLocation) -> Result<Location, DatabaseError> {
        let sql = format!(
            "INSERT INTO locations (name, address, latitude, longitude, radius_meters)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            LOCATION_COLUMNS
        );

        let row = sqlx::query_as::<_, Location>(&sql)
            .bind(&location.name)
            .bind(&location.address)
            .bind(location.latitude)
            .bind(location.longitude)
            .bind(location.radius_meters)
            .fetch_one(&self.pool)
            .await
            .map_err(unique_violation)?;

        Ok(row)
    }

    async fn update(&self, id: i64, changes: LocationChanges) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE locations SET
                 name = COALESCE($2, name),
                 address = COALESCE($3, address),
                 latitude = COALESCE($4, latitude),
                 longitude = COALESCE($5, longitude),
                 radius_meters = COALESCE($6, radius_meters),
                 updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.address)
        .bind(changes.latitude)
        .bind(changes.longitude)
        .bind(changes.radius_meters)
        .execute(&self.pool)
        .await
        .map_err(unique_violation)?;

        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE locations SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
