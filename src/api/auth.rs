use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::required;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(custom(function = "required"))]
    pub username: String,
    #[validate(custom(function = "required"))]
    pub password: String,
}

/// New password for an existing username. An empty password is a
/// service-level outcome, so only the username is checked here.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ForgotPasswordRequest {
    #[validate(custom(function = "required"))]
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Ready to paste into an Authorization header
    pub token: String,
}

impl TokenResponse {
    pub fn bearer(jwt: String) -> Self {
        Self { token: format!("Bearer {}", jwt) }
    }
}
