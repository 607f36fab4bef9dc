// handlers/protected/location.rs - /v1/locations

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};

use crate::api::{CreateLocation, IdQuery, UpdateLocation};
use crate::handlers::{bind, query, service_failure, validated, HandlerResult};
use crate::rest::{PaginationParams, PaginationQuery};
use crate::state::AppState;

/// GET /v1/locations
pub async fn list(
    State(state): State<AppState>,
    page: Result<Query<PaginationQuery>, QueryRejection>,
) -> HandlerResult {
    let responder = &state.responder;
    let pagination = state.limits.resolve(query(responder, page)?);

    let (data, total_data) = state
        .locations
        .list(pagination)
        .await
        .map_err(|e| service_failure(responder, e))?;

    Ok(responder.pagination(
        StatusCode::OK,
        PaginationParams { data, total_data, pagination: Some(pagination) },
    ))
}

/// POST /v1/locations
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateLocation>, JsonRejection>,
) -> HandlerResult {
    let responder = &state.responder;
    let request = bind(responder, payload)?;

    let location = state
        .locations
        .create(request)
        .await
        .map_err(|e| service_failure(responder, e))?;

    Ok(responder.data(StatusCode::CREATED, location, &[]))
}

/// PATCH /v1/locations?id=
pub async fn update(
    State(state): State<AppState>,
    id: Result<Query<IdQuery>, QueryRejection>,
    payload: Result<Json<UpdateLocation>, JsonRejection>,
) -> HandlerResult {
    let responder = &state.responder;
    let id = validated(responder, query(responder, id)?)?;
    let request = bind(responder, payload)?;

    let location = state
        .locations
        .update(id.id, request)
        .await
        .map_err(|e| service_failure(responder, e))?;

    Ok(responder.data(StatusCode::OK, location, &[]))
}

/// DELETE /v1/locations?id=
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Query<IdQuery>, QueryRejection>,
) -> HandlerResult {
    let responder = &state.responder;
    let id = validated(responder, query(responder, id)?)?;

    state
        .locations
        .delete(id.id)
        .await
        .map_err(|e| service_failure(responder, e))?;

    Ok(responder.message(StatusCode::OK, &[]))
}
