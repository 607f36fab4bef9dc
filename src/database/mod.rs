pub mod manager;
pub mod models;
pub mod repository;

pub use manager::{Database, DatabaseError, HealthCheck};
pub use repository::{
    AccountField, AccountRepository, AttendanceRepository, LocationRepository, PgAccountRepository,
    PgAttendanceRepository, PgLocationRepository, UniqueKey,
};
