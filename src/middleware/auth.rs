use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::state::AppState;

/// Account the bearer token was issued for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthAccount {
    pub account_id: i64,
}

/// Rejects requests without a valid `Authorization: Bearer <jwt>` header and
/// makes `AuthAccount` available to downstream handlers.
pub async fn require_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match state.jwt.extract_id(header) {
        Ok(account_id) => {
            request.extensions_mut().insert(AuthAccount { account_id });
            next.run(request).await
        }
        Err(e) => {
            debug!("Rejected bearer token: {}", e);
            state
                .responder
                .message(StatusCode::UNAUTHORIZED, &[])
                .into_response()
        }
    }
}
