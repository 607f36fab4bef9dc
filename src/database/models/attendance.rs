use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceKind {
    CheckIn,
    CheckOut,
}

#[derive(Debug, Error)]
#[error("unknown attendance kind: {0}")]
pub struct UnknownKind(pub String);

impl AttendanceKind {
    pub const ALL: [&'static str; 2] = ["check_in", "check_out"];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceKind::CheckIn => "check_in",
            AttendanceKind::CheckOut => "check_out",
        }
    }
}

impl TryFrom<String> for AttendanceKind {
    type Error = UnknownKind;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "check_in" => Ok(AttendanceKind::CheckIn),
            "check_out" => Ok(AttendanceKind::CheckOut),
            _ => Err(UnknownKind(value)),
        }
    }
}

impl fmt::Display for AttendanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attendance {
    pub id: i64,
    pub account_id: i64,
    pub location_id: i64,
    #[sqlx(try_from = "String")]
    pub kind: AttendanceKind,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub account_id: i64,
    pub location_id: i64,
    pub kind: AttendanceKind,
    pub note: Option<String>,
}
