use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::config::AppConfig;
use crate::database::{
    Database, HealthCheck, PgAccountRepository, PgAttendanceRepository, PgLocationRepository,
};
use crate::rest::{Pagination, PaginationQuery, Responder};
use crate::services::{
    AccountService, AccountServicer, AttendanceService, AttendanceServicer, LocationService,
    LocationServicer,
};

/// Page size bounds applied to `?page=&limit=`
#[derive(Debug, Clone, Copy)]
pub struct PageLimits {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl PageLimits {
    pub fn resolve(&self, query: PaginationQuery) -> Pagination {
        query.resolve(self.default_limit, self.max_limit)
    }
}

/// Shared by every handler through axum's `State`
#[derive(Clone)]
pub struct AppState {
    pub responder: Responder,
    pub jwt: JwtKeys,
    pub accounts: Arc<dyn AccountServicer>,
    pub locations: Arc<dyn LocationServicer>,
    pub attendance: Arc<dyn AttendanceServicer>,
    pub health: Arc<dyn HealthCheck>,
    pub limits: PageLimits,
}

impl AppState {
    /// Production wiring over a Postgres pool
    pub fn from_database(db: Database, jwt: JwtKeys, config: &AppConfig) -> Self {
        let pool = db.pool().clone();

        let accounts: Arc<dyn AccountServicer> = Arc::new(AccountService::new(
            Arc::new(PgAccountRepository::new(pool.clone())),
            config.security.bcrypt_cost,
        ));
        let locations: Arc<dyn LocationServicer> =
            Arc::new(LocationService::new(Arc::new(PgLocationRepository::new(pool.clone()))));
        let attendance: Arc<dyn AttendanceServicer> = Arc::new(AttendanceService::new(
            Arc::new(PgAttendanceRepository::new(pool)),
            accounts.clone(),
            locations.clone(),
        ));

        Self {
            responder: Responder::default(),
            jwt,
            accounts,
            locations,
            attendance,
            health: Arc::new(db),
            limits: PageLimits {
                default_limit: config.api.default_page_limit,
                max_limit: config.api.max_page_limit,
            },
        }
    }
}
