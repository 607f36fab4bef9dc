use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::database::models::AttendanceKind;
use crate::validation::required;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct AddAttendance {
    #[validate(range(min = 1, code = "required"))]
    pub location_id: i64,
    /// `check_in` or `check_out`
    #[validate(custom(function = "attendance_kind"))]
    pub kind: String,
    pub note: Option<String>,
}

fn attendance_kind(value: &str) -> Result<(), ValidationError> {
    required(value)?;
    if AttendanceKind::ALL.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new("oneof"))
    }
}

/// `?location_id=` selector for per-location listings
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LocationFilter {
    #[validate(range(min = 1, code = "required"))]
    pub location_id: i64,
}
