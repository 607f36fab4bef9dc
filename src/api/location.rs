use serde::Deserialize;
use validator::Validate;

use crate::validation::required;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateLocation {
    #[validate(custom(function = "required"), length(max = 100))]
    pub name: String,
    #[validate(custom(function = "required"))]
    pub address: String,
    #[validate(range(min = -90.0, max = 90.0, code = "latitude"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, code = "longitude"))]
    pub longitude: f64,
    #[validate(range(min = 1, code = "gt"))]
    pub radius_meters: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateLocation {
    #[validate(custom(function = "required"), length(max = 100))]
    pub name: Option<String>,
    pub address: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, code = "latitude"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, code = "longitude"))]
    pub longitude: Option<f64>,
    #[validate(range(min = 1, code = "gt"))]
    pub radius_meters: Option<i32>,
}

/// `?id=` selector for location updates and deletes
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
#[serde(default)]
pub struct IdQuery {
    #[validate(range(min = 1, code = "required"))]
    pub id: i64,
}
