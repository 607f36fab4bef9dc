use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::api::{CreateLocation, UpdateLocation};
use crate::database::models::{Location, LocationChanges, NewLocation};
use crate::database::{DatabaseError, LocationRepository, UniqueKey};
use crate::error::{ServiceError, ServiceResult};
use crate::rest::Pagination;

use super::LocationServicer;

pub struct LocationService {
    repo: Arc<dyn LocationRepository>,
}

impl LocationService {
    pub fn new(repo: Arc<dyn LocationRepository>) -> Self {
        Self { repo }
    }
}

/// A write that lost a race against the name check
fn write_conflict(err: DatabaseError) -> ServiceError {
    match err {
        DatabaseError::Conflict(UniqueKey::LocationName) => ServiceError::LocationAlreadyExist,
        other => other.into(),
    }
}

#[async_trait]
impl LocationServicer for LocationService {
    async fn list(&self, pagination: Pagination) -> ServiceResult<(Vec<Location>, i64)> {
        Ok(self.repo.list(pagination).await?)
    }

    async fn take(&self, id: i64) -> ServiceResult<Location> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::LocationNotFound)
    }

    async fn create(&self, request: CreateLocation) -> ServiceResult<Location> {
        let name = request.name.trim().to_string();
        if self.repo.name_taken(&name, None).await? {
            return Err(ServiceError::LocationAlreadyExist);
        }

        let location = self
            .repo
            .insert(NewLocation {
                name,
                address: request.address,
                latitude: request.latitude,
                longitude: request.longitude,
                radius_meters: request.radius_meters,
            })
            .await
            .map_err(write_conflict)?;

        info!("Created location {} ({})", location.id, location.name);
        Ok(location)
    }

    async fn update(&self, id: i64, request: UpdateLocation) -> ServiceResult<Location> {
        let name = request.name.map(|n| n.trim().to_string());
        if let Some(name) = &name {
            if self.repo.name_taken(name, Some(id)).await? {
                return Err(ServiceError::LocationAlreadyExist);
            }
        }

        let changes = LocationChanges {
            name,
            address: request.address,
            latitude: request.latitude,
            longitude: request.longitude,
            radius_meters: request.radius_meters,
        };

        if !self.repo.update(id, changes).await.map_err(write_conflict)? {
            return Err(ServiceError::LocationNotFound);
        }

        info!("Updated location {}", id);
        self.take(id).await
    }

    async fn delete(&self, id: i64) -> ServiceResult<()> {
        if !self.repo.soft_delete(id).await? {
            return Err(ServiceError::LocationNotFound);
        }

        info!("Deleted location {}", id);
        Ok(())
    }
}
