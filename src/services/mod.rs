// Business rules between the HTTP handlers and the repositories. Handlers hold
// `Arc<dyn ...Servicer>` so tests can substitute repositories underneath.

pub mod account_service;
pub mod attendance_service;
pub mod location_service;

use async_trait::async_trait;

use crate::api::{AddAttendance, CreateLocation, RegisterAccount, UpdateAccount, UpdateLocation};
use crate::database::models::{Account, Attendance, Location};
use crate::error::ServiceResult;
use crate::rest::Pagination;

pub use account_service::AccountService;
pub use attendance_service::AttendanceService;
pub use location_service::LocationService;

#[async_trait]
pub trait AccountServicer: Send + Sync {
    async fn create(&self, request: RegisterAccount) -> ServiceResult<Account>;

    /// Username lookup plus bcrypt check
    async fn authenticate(&self, username: &str, password: &str) -> ServiceResult<Account>;

    async fn take_account_by_username(&self, username: &str) -> ServiceResult<Account>;

    async fn take_account_by_id(&self, id: i64) -> ServiceResult<Account>;

    async fn update(&self, id: i64, request: UpdateAccount) -> ServiceResult<Account>;

    async fn update_password(&self, username: &str, password: &str) -> ServiceResult<()>;

    async fn delete(&self, id: i64) -> ServiceResult<()>;
}

#[async_trait]
pub trait LocationServicer: Send + Sync {
    async fn list(&self, pagination: Pagination) -> ServiceResult<(Vec<Location>, i64)>;

    async fn take(&self, id: i64) -> ServiceResult<Location>;

    async fn create(&self, request: CreateLocation) -> ServiceResult<Location>;

    async fn update(&self, id: i64, request: UpdateLocation) -> ServiceResult<Location>;

    async fn delete(&self, id: i64) -> ServiceResult<()>;
}

#[async_trait]
pub trait AttendanceServicer: Send + Sync {
    async fn history(&self, account_id: i64, pagination: Pagination) -> ServiceResult<(Vec<Attendance>, i64)>;

    async fn by_location(&self, location_id: i64, pagination: Pagination) -> ServiceResult<(Vec<Attendance>, i64)>;

    async fn add(&self, account_id: i64, request: AddAttendance) -> ServiceResult<Attendance>;
}

/// Stored usernames are trimmed and lower-cased
pub(crate) fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}
