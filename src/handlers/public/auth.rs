// handlers/public/auth.rs - POST /v1/auth, PATCH /v1/auth/forgot

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::api::{ForgotPasswordRequest, LoginRequest, TokenResponse};
use crate::error::ServiceError;
use crate::handlers::{bind, service_failure, HandlerResult};
use crate::state::AppState;

/// POST /v1/auth - exchange username and password for a bearer token
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> HandlerResult {
    let responder = &state.responder;
    let request = bind(responder, payload)?;

    let account = state
        .accounts
        .authenticate(&request.username, &request.password)
        .await
        .map_err(|e| service_failure(responder, e))?;

    let token = state
        .jwt
        .generate(account.id)
        .map_err(|e| service_failure(responder, ServiceError::from(e)))?;

    Ok(responder.data(StatusCode::OK, TokenResponse::bearer(token), &[]))
}

/// PATCH /v1/auth/forgot - overwrite the password of a registered username
pub async fn forgot_password(
    State(state): State<AppState>,
    payload: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> HandlerResult {
    let responder = &state.responder;
    let request = bind(responder, payload)?;

    state
        .accounts
        .update_password(&request.username, &request.password)
        .await
        .map_err(|e| service_failure(responder, e))?;

    Ok(responder.message(StatusCode::OK, &["password updated"]))
}
