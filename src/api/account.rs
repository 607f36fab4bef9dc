use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError};

use crate::validation::{digits, required};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterAccount {
    #[validate(custom(function = "required"), length(max = 50))]
    pub username: String,
    #[validate(custom(function = "required"), length(min = 6))]
    pub password: String,
    #[validate(custom(function = "required"))]
    pub name: String,
    #[validate(custom(function = "required"), email(code = "email"))]
    pub email: String,
    #[validate(custom(function = "digits"), length(equal = 16))]
    pub ktp_number: String,
    #[validate(custom(function = "digits"), length(min = 8, max = 15))]
    pub phone_number: String,
    /// `YYYY-MM-DD`
    #[validate(custom(function = "required"))]
    pub dob: String,
}

/// Partial update. Empty email, KTP and phone members decode as absent; empty
/// username and password are rejected by the account service.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateAccount {
    #[validate(length(max = 50))]
    pub username: Option<String>,
    #[validate(custom(function = "new_password"))]
    pub password: Option<String>,
    pub name: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    #[validate(email(code = "email"))]
    pub email: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    #[validate(custom(function = "digits"), length(equal = 16))]
    pub ktp_number: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    #[validate(custom(function = "digits"), length(min = 8, max = 15))]
    pub phone_number: Option<String>,
    pub dob: Option<String>,
}

fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.filter(|value| !value.is_empty()))
}

fn new_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.chars().count() >= 6 {
        Ok(())
    } else {
        Err(ValidationError::new("min"))
    }
}
