// handlers/protected/account.rs - GET/PATCH/DELETE /v1/accounts

use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    http::StatusCode,
    Json,
};

use crate::api::UpdateAccount;
use crate::handlers::{bind, service_failure, HandlerResult};
use crate::middleware::AuthAccount;
use crate::state::AppState;

/// GET /v1/accounts - the caller's own account
pub async fn get(State(state): State<AppState>, Extension(auth): Extension<AuthAccount>) -> HandlerResult {
    let responder = &state.responder;

    let account = state
        .accounts
        .take_account_by_id(auth.account_id)
        .await
        .map_err(|e| service_failure(responder, e))?;

    Ok(responder.data(StatusCode::OK, account, &[]))
}

/// PATCH /v1/accounts - partial update of the caller's account
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    payload: Result<Json<UpdateAccount>, JsonRejection>,
) -> HandlerResult {
    let responder = &state.responder;
    let request = bind(responder, payload)?;

    let account = state
        .accounts
        .update(auth.account_id, request)
        .await
        .map_err(|e| service_failure(responder, e))?;

    Ok(responder.data(StatusCode::OK, account, &[]))
}

/// DELETE /v1/accounts - soft delete; the token stops resolving afterwards
pub async fn delete(State(state): State<AppState>, Extension(auth): Extension<AuthAccount>) -> HandlerResult {
    let responder = &state.responder;

    state
        .accounts
        .delete(auth.account_id)
        .await
        .map_err(|e| service_failure(responder, e))?;

    Ok(responder.message(StatusCode::OK, &[]))
}
