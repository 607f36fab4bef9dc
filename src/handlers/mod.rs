// handlers/mod.rs - two security tiers
//
// Public (no auth) → Protected (bearer JWT, see middleware::require_auth)

pub mod protected;
pub mod public;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Json, Query,
    },
    http::StatusCode,
};
use tracing::{debug, error};
use validator::Validate;

use crate::error::ServiceError;
use crate::rest::{Detail, Reply, Responder};

/// Both arms are complete responses; `Err` is only a shorthand for early exit.
pub type HandlerResult = Result<Reply, Reply>;

const INVALID_FORMAT: &str = "invalid format";

/// Decodes and validates a JSON body
pub(crate) fn bind<T: Validate>(
    responder: &Responder,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Reply> {
    match payload {
        Ok(Json(value)) => validated(responder, value),
        Err(rejection) => {
            debug!("Rejected request body: {}", rejection.body_text());
            Err(responder.error(
                StatusCode::BAD_REQUEST,
                Detail::field("body", INVALID_FORMAT),
                &[],
            ))
        }
    }
}

/// Decodes a query string without validating it
pub(crate) fn query<T>(
    responder: &Responder,
    params: Result<Query<T>, QueryRejection>,
) -> Result<T, Reply> {
    params.map(|Query(value)| value).map_err(|rejection| {
        debug!("Rejected query string: {}", rejection.body_text());
        responder.error(
            StatusCode::BAD_REQUEST,
            Detail::field("query", INVALID_FORMAT),
            &[],
        )
    })
}

pub(crate) fn validated<T: Validate>(responder: &Responder, value: T) -> Result<T, Reply> {
    match value.validate() {
        Ok(()) => Ok(value),
        Err(errors) => Err(responder.error(StatusCode::BAD_REQUEST, errors, &[])),
    }
}

/// Known service errors become their field-keyed rejection; anything else is
/// a 500 whose details only reach the server log, joined by correlation id.
pub(crate) fn service_failure(responder: &Responder, err: ServiceError) -> Reply {
    match err.rejection() {
        Some(rejection) => responder.error(
            rejection.status,
            Detail::field(rejection.key, err.to_string()),
            &[],
        ),
        None => {
            let reply = responder.message(StatusCode::INTERNAL_SERVER_ERROR, &[]);
            error!(
                correlation_id = reply.correlation_id().unwrap_or_default(),
                "Unhandled service error: {}", err
            );
            reply
        }
    }
}
