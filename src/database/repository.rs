// Persistence seams. Services depend on these traits; the Pg* types are the
// production implementations over a shared `PgPool`.

mod account;
mod attendance;
mod location;

pub use account::{AccountField, AccountRepository, PgAccountRepository};
pub use attendance::{AttendanceRepository, PgAttendanceRepository};
pub use location::{LocationRepository, PgLocationRepository};

use crate::database::manager::DatabaseError;

/// Value guarded by one of the partial unique indexes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    Account(AccountField),
    LocationName,
}

impl UniqueKey {
    /// Index names as created by the migrations
    pub fn from_constraint(name: &str) -> Option<Self> {
        match name {
            "accounts_username_key" => Some(UniqueKey::Account(AccountField::Username)),
            "accounts_email_key" => Some(UniqueKey::Account(AccountField::Email)),
            "accounts_ktp_number_key" => Some(UniqueKey::Account(AccountField::KtpNumber)),
            "accounts_phone_number_key" => Some(UniqueKey::Account(AccountField::PhoneNumber)),
            "locations_name_key" => Some(UniqueKey::LocationName),
            _ => None,
        }
    }
}

/// Unique-index violations on a known index become `DatabaseError::Conflict`;
/// everything else stays a plain sqlx error.
pub(crate) fn unique_violation(err: sqlx::Error) -> DatabaseError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            if let Some(key) = db.constraint().and_then(UniqueKey::from_constraint) {
                return DatabaseError::Conflict(key);
            }
        }
    }
    DatabaseError::Sqlx(err)
}
