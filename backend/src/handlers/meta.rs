use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderName, StatusCode, header},
};
use std::sync::Arc;

use crate::AppState;
use crate::models::{MetaDto, MetaPatch, SortParams};
use crate::utils::ApiResult;

// List all metas
#[utoipa::path(
    get,
    path = "/api/metas",
    params(SortParams),
    responses(
        (status = 200, description = "List of metas", body = Vec<MetaDto>),
        (status = 400, description = "Unsupported sort")
    ),
    tag = "Metas"
)]
pub async fn list_metas(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SortParams>,
) -> ApiResult<Json<Vec<MetaDto>>> {
    tracing::debug!("Listing all metas (sort: {:?})", params.sort);

    let metas = state.meta_service.list_metas(params.sort.as_deref()).await?;

    tracing::debug!("Retrieved {} metas", metas.len());
    Ok(Json(metas))
}

// Get meta by ID
#[utoipa::path(
    get,
    path = "/api/metas/{id}",
    responses(
        (status = 200, description = "Meta details", body = MetaDto),
        (status = 404, description = "Meta not found")
    ),
    tag = "Metas"
)]
pub async fn get_meta(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MetaDto>> {
    tracing::debug!("Getting meta: ID={}", id);

    let meta = state.meta_service.get_meta(id).await?;
    Ok(Json(meta))
}

// Create a new meta
#[utoipa::path(
    post,
    path = "/api/metas",
    request_body = MetaDto,
    responses(
        (status = 201, description = "Meta created successfully", body = MetaDto),
        (status = 400, description = "Bad request")
    ),
    tag = "Metas"
)]
pub async fn create_meta(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MetaDto>,
) -> ApiResult<(StatusCode, [(HeaderName, String); 1], Json<MetaDto>)> {
    tracing::info!(
        "Meta creation request: area={:?}, aluno={:?}",
        req.area,
        req.aluno.map(|aluno| aluno.id)
    );

    let meta = state.meta_service.create_meta(req).await?;
    let location = format!("/api/metas/{}", meta.id.unwrap_or_default());

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(meta)))
}

// Update meta
#[utoipa::path(
    put,
    path = "/api/metas/{id}",
    request_body = MetaDto,
    responses(
        (status = 200, description = "Meta updated successfully", body = MetaDto),
        (status = 400, description = "Bad request")
    ),
    tag = "Metas"
)]
pub async fn update_meta(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<MetaDto>,
) -> ApiResult<Json<MetaDto>> {
    tracing::info!("Meta update request: ID={}", id);
    tracing::debug!("Meta update details: {:?}", req);

    let meta = state.meta_service.update_meta(id, req).await?;
    Ok(Json(meta))
}

// Partially update meta (merge patch)
#[utoipa::path(
    patch,
    path = "/api/metas/{id}",
    request_body(content = MetaPatch, content_type = "application/merge-patch+json"),
    responses(
        (status = 200, description = "Meta updated successfully", body = MetaDto),
        (status = 400, description = "Bad request")
    ),
    tag = "Metas"
)]
pub async fn partial_update_meta(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<MetaPatch>,
) -> ApiResult<Json<MetaDto>> {
    tracing::info!("Meta partial update request: ID={}", id);

    let meta = state.meta_service.partial_update_meta(id, req).await?;
    Ok(Json(meta))
}

// Delete meta
#[utoipa::path(
    delete,
    path = "/api/metas/{id}",
    responses(
        (status = 204, description = "Meta deleted")
    ),
    tag = "Metas"
)]
pub async fn delete_meta(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    tracing::info!("Meta deletion request: ID={}", id);

    state.meta_service.delete_meta(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
