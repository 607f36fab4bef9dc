// handlers/public/account.rs - POST /v1/accounts/register

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::api::RegisterAccount;
use crate::handlers::{bind, service_failure, HandlerResult};
use crate::rest::Detail;
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterAccount>, JsonRejection>,
) -> HandlerResult {
    let responder = &state.responder;
    let request = bind(responder, payload)?;

    if request.username.trim().is_empty() {
        return Err(responder.error(
            StatusCode::BAD_REQUEST,
            Detail::field("username", "invalid format"),
            &[],
        ));
    }

    state
        .accounts
        .create(request)
        .await
        .map_err(|e| service_failure(responder, e))?;

    Ok(responder.message(StatusCode::CREATED, &[]))
}
