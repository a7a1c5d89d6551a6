use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderName, StatusCode, header},
};
use std::sync::Arc;

use crate::AppState;
use crate::models::{AlunoDto, AlunoPatch, SortParams};
use crate::utils::ApiResult;

// List all alunos
#[utoipa::path(
    get,
    path = "/api/alunos",
    params(SortParams),
    responses(
        (status = 200, description = "List of alunos", body = Vec<AlunoDto>),
        (status = 400, description = "Unsupported sort")
    ),
    tag = "Alunos"
)]
pub async fn list_alunos(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SortParams>,
) -> ApiResult<Json<Vec<AlunoDto>>> {
    tracing::debug!("Listing all alunos (sort: {:?})", params.sort);

    let alunos = state.aluno_service.list_alunos(params.sort.as_deref()).await?;

    tracing::debug!("Retrieved {} alunos", alunos.len());
    Ok(Json(alunos))
}

// Get aluno by ID
#[utoipa::path(
    get,
    path = "/api/alunos/{id}",
    responses(
        (status = 200, description = "Aluno details", body = AlunoDto),
        (status = 404, description = "Aluno not found")
    ),
    tag = "Alunos"
)]
pub async fn get_aluno(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<AlunoDto>> {
    tracing::debug!("Getting aluno: ID={}", id);

    let aluno = state.aluno_service.get_aluno(id).await?;
    Ok(Json(aluno))
}

// Create a new aluno
#[utoipa::path(
    post,
    path = "/api/alunos",
    request_body = AlunoDto,
    responses(
        (status = 201, description = "Aluno created successfully", body = AlunoDto),
        (status = 400, description = "Bad request")
    ),
    tag = "Alunos"
)]
pub async fn create_aluno(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AlunoDto>,
) -> ApiResult<(StatusCode, [(HeaderName, String); 1], Json<AlunoDto>)> {
    tracing::info!("Aluno creation request: nome={:?}", req.nome);

    let aluno = state.aluno_service.create_aluno(req).await?;
    let location = format!("/api/alunos/{}", aluno.id.unwrap_or_default());

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(aluno)))
}

// Update aluno
#[utoipa::path(
    put,
    path = "/api/alunos/{id}",
    request_body = AlunoDto,
    responses(
        (status = 200, description = "Aluno updated successfully", body = AlunoDto),
        (status = 400, description = "Bad request")
    ),
    tag = "Alunos"
)]
pub async fn update_aluno(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<AlunoDto>,
) -> ApiResult<Json<AlunoDto>> {
    tracing::info!("Aluno update request: ID={}", id);
    tracing::debug!("Aluno update details: {:?}", req);

    let aluno = state.aluno_service.update_aluno(id, req).await?;
    Ok(Json(aluno))
}

// Partially update aluno (merge patch)
#[utoipa::path(
    patch,
    path = "/api/alunos/{id}",
    request_body(content = AlunoPatch, content_type = "application/merge-patch+json"),
    responses(
        (status = 200, description = "Aluno updated successfully", body = AlunoDto),
        (status = 400, description = "Bad request")
    ),
    tag = "Alunos"
)]
pub async fn partial_update_aluno(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<AlunoPatch>,
) -> ApiResult<Json<AlunoDto>> {
    tracing::info!("Aluno partial update request: ID={}", id);

    let aluno = state.aluno_service.partial_update_aluno(id, req).await?;
    Ok(Json(aluno))
}

// Delete aluno
#[utoipa::path(
    delete,
    path = "/api/alunos/{id}",
    responses(
        (status = 204, description = "Aluno deleted")
    ),
    tag = "Alunos"
)]
pub async fn delete_aluno(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    tracing::info!("Aluno deletion request: ID={}", id);

    state.aluno_service.delete_aluno(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
