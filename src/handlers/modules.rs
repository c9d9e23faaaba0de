// src/handlers/modules.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{AdminRoles, RequireRoles},
    models::modules::{
        CreateModulePayload, CreateVersionPayload, SaveMatrixPayload, UpdateModulePayload,
    },
};

// GET /api/modules — visão administrativa (inclui inativos e arquivados)
#[utoipa::path(
    get,
    path = "/api/modules",
    responses((status = 200, description = "Catálogo de módulos", body = [crate::models::modules::Module])),
    security(("bearer_auth" = []))
)]
pub async fn list_modules(
    State(app_state): State<AppState>,
    _guard: RequireRoles<AdminRoles>,
) -> Result<impl IntoResponse, AppError> {
    let modules = app_state.module_service.list_modules().await?;

    Ok(Json(modules))
}

// POST /api/modules
#[utoipa::path(
    post,
    path = "/api/modules",
    request_body = CreateModulePayload,
    responses((status = 201, description = "Módulo criado", body = crate::models::modules::Module)),
    security(("bearer_auth" = []))
)]
pub async fn create_module(
    State(app_state): State<AppState>,
    _guard: RequireRoles<AdminRoles>,
    Json(payload): Json<CreateModulePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let module = app_state.module_service.create_module(payload).await?;

    Ok((StatusCode::CREATED, Json(module)))
}

// GET /api/modules/{id}
#[utoipa::path(
    get,
    path = "/api/modules/{id}",
    responses(
        (status = 200, description = "Detalhe do módulo", body = crate::models::modules::Module),
        (status = 404, description = "Módulo não encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_module(
    State(app_state): State<AppState>,
    _guard: RequireRoles<AdminRoles>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let module = app_state.module_service.get_module(id).await?;

    Ok(Json(module))
}

// PATCH /api/modules/{id}
#[utoipa::path(
    patch,
    path = "/api/modules/{id}",
    request_body = UpdateModulePayload,
    responses((status = 200, description = "Módulo atualizado", body = crate::models::modules::Module)),
    security(("bearer_auth" = []))
)]
pub async fn update_module(
    State(app_state): State<AppState>,
    _guard: RequireRoles<AdminRoles>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateModulePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let module = app_state.module_service.update_module(id, payload).await?;

    Ok(Json(module))
}

// POST /api/modules/{id}/archive — módulos em uso não são removidos
#[utoipa::path(
    post,
    path = "/api/modules/{id}/archive",
    responses((status = 200, description = "Módulo arquivado", body = crate::models::modules::Module)),
    security(("bearer_auth" = []))
)]
pub async fn archive_module(
    State(app_state): State<AppState>,
    _guard: RequireRoles<AdminRoles>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let module = app_state.module_service.archive_module(id).await?;

    Ok(Json(module))
}

// GET /api/modules/{id}/permissions — matriz completa gravada
#[utoipa::path(
    get,
    path = "/api/modules/{id}/permissions",
    responses((status = 200, description = "Matriz de permissões do módulo", body = [crate::models::modules::ModulePermissionEntry])),
    security(("bearer_auth" = []))
)]
pub async fn get_module_matrix(
    State(app_state): State<AppState>,
    _guard: RequireRoles<AdminRoles>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let entries = app_state.module_service.get_matrix(id).await?;

    Ok(Json(entries))
}

// PUT /api/modules/{id}/permissions — sempre a matriz completa, nunca linhas avulsas
#[utoipa::path(
    put,
    path = "/api/modules/{id}/permissions",
    request_body = SaveMatrixPayload,
    responses((status = 200, description = "Matriz gravada e relida", body = [crate::models::modules::ModulePermissionEntry])),
    security(("bearer_auth" = []))
)]
pub async fn save_module_matrix(
    State(app_state): State<AppState>,
    _guard: RequireRoles<AdminRoles>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaveMatrixPayload>,
) -> Result<impl IntoResponse, AppError> {
    let entries = app_state.module_service.save_matrix(id, payload.entries).await?;

    Ok(Json(entries))
}

// GET /api/modules/{id}/versions
#[utoipa::path(
    get,
    path = "/api/modules/{id}/versions",
    responses((status = 200, description = "Histórico de versões", body = [crate::models::modules::ModuleVersion])),
    security(("bearer_auth" = []))
)]
pub async fn list_versions(
    State(app_state): State<AppState>,
    _guard: RequireRoles<AdminRoles>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let versions = app_state.module_service.list_versions(id).await?;

    Ok(Json(versions))
}

// POST /api/modules/{id}/versions
#[utoipa::path(
    post,
    path = "/api/modules/{id}/versions",
    request_body = CreateVersionPayload,
    responses((status = 201, description = "Versão registrada", body = crate::models::modules::ModuleVersion)),
    security(("bearer_auth" = []))
)]
pub async fn create_version(
    State(app_state): State<AppState>,
    _guard: RequireRoles<AdminRoles>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateVersionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let version = app_state.module_service.create_version(id, payload).await?;

    Ok((StatusCode::CREATED, Json(version)))
}

// POST /api/modules/{id}/versions/{version_id}/stable
#[utoipa::path(
    post,
    path = "/api/modules/{id}/versions/{version_id}/stable",
    responses((status = 200, description = "Versão marcada como estável", body = crate::models::modules::ModuleVersion)),
    security(("bearer_auth" = []))
)]
pub async fn mark_version_stable(
    State(app_state): State<AppState>,
    _guard: RequireRoles<AdminRoles>,
    Path((id, version_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let version = app_state
        .module_service
        .mark_version_stable(id, version_id)
        .await?;

    Ok(Json(version))
}
