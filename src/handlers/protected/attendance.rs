// handlers/protected/attendance.rs - /v1/attendance

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Query, State,
    },
    http::StatusCode,
    Json,
};

use crate::api::{AddAttendance, LocationFilter};
use crate::handlers::{bind, query, service_failure, validated, HandlerResult};
use crate::middleware::AuthAccount;
use crate::rest::{PaginationParams, PaginationQuery};
use crate::state::AppState;

/// GET /v1/attendance/history - caller's entries, newest first
pub async fn history(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    page: Result<Query<PaginationQuery>, QueryRejection>,
) -> HandlerResult {
    let responder = &state.responder;
    let pagination = state.limits.resolve(query(responder, page)?);

    let (data, total_data) = state
        .attendance
        .history(auth.account_id, pagination)
        .await
        .map_err(|e| service_failure(responder, e))?;

    Ok(responder.pagination(
        StatusCode::OK,
        PaginationParams { data, total_data, pagination: Some(pagination) },
    ))
}

/// GET /v1/attendance/locations?location_id= - everyone's entries at one location
pub async fn by_location(
    State(state): State<AppState>,
    filter: Result<Query<LocationFilter>, QueryRejection>,
    page: Result<Query<PaginationQuery>, QueryRejection>,
) -> HandlerResult {
    let responder = &state.responder;
    let filter = validated(responder, query(responder, filter)?)?;
    let pagination = state.limits.resolve(query(responder, page)?);

    let (data, total_data) = state
        .attendance
        .by_location(filter.location_id, pagination)
        .await
        .map_err(|e| service_failure(responder, e))?;

    Ok(responder.pagination(
        StatusCode::OK,
        PaginationParams { data, total_data, pagination: Some(pagination) },
    ))
}

/// POST /v1/attendance - record a check-in or check-out
pub async fn add(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    payload: Result<Json<AddAttendance>, JsonRejection>,
) -> HandlerResult {
    let responder = &state.responder;
    let request = bind(responder, payload)?;

    let attendance = state
        .attendance
        .add(auth.account_id, request)
        .await
        .map_err(|e| service_failure(responder, e))?;

    Ok(responder.data(StatusCode::CREATED, attendance, &[]))
}
