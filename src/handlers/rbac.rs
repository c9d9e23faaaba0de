// src/handlers/rbac.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{AdminRoles, RequireRoles},
    models::rbac::{CreateRolePayload, ReplacePermissionsPayload, UpdateRolePayload},
};

// POST /api/roles
#[utoipa::path(
    post,
    path = "/api/roles",
    request_body = CreateRolePayload,
    responses((status = 201, description = "Cargo criado com seu checklist", body = crate::models::rbac::RoleResponse)),
    security(("bearer_auth" = []))
)]
pub async fn create_role(
    State(app_state): State<AppState>,
    _guard: RequireRoles<AdminRoles>,
    Json(payload): Json<CreateRolePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let response = app_state
        .rbac_service
        .create_role_with_permissions(
            payload.name,
            payload.display_name,
            payload.description,
            payload.color,
            payload.permissions,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

// GET /api/roles
#[utoipa::path(
    get,
    path = "/api/roles",
    responses((status = 200, description = "Todos os cargos", body = [crate::models::rbac::Role])),
    security(("bearer_auth" = []))
)]
pub async fn list_roles(
    State(app_state): State<AppState>,
    _guard: RequireRoles<AdminRoles>,
) -> Result<impl IntoResponse, AppError> {
    let roles = app_state.rbac_service.list_roles().await?;

    Ok(Json(roles))
}

// GET /api/roles/{name}
#[utoipa::path(
    get,
    path = "/api/roles/{name}",
    responses((status = 200, description = "Cargo com seu checklist", body = crate::models::rbac::RoleResponse)),
    security(("bearer_auth" = []))
)]
pub async fn get_role(
    State(app_state): State<AppState>,
    _guard: RequireRoles<AdminRoles>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let response = app_state.rbac_service.get_role(&name).await?;

    Ok(Json(response))
}

// PATCH /api/roles/{name}
#[utoipa::path(
    patch,
    path = "/api/roles/{name}",
    request_body = UpdateRolePayload,
    responses((status = 200, description = "Cargo atualizado", body = crate::models::rbac::Role)),
    security(("bearer_auth" = []))
)]
pub async fn update_role(
    State(app_state): State<AppState>,
    _guard: RequireRoles<AdminRoles>,
    Path(name): Path<String>,
    Json(payload): Json<UpdateRolePayload>,
) -> Result<impl IntoResponse, AppError> {
    let role = app_state
        .rbac_service
        .update_role(&name, payload.display_name, payload.description, payload.color)
        .await?;

    Ok(Json(role))
}

// DELETE /api/roles/{name} — cargos de sistema são protegidos
#[utoipa::path(
    delete,
    path = "/api/roles/{name}",
    responses((status = 204, description = "Cargo removido")),
    security(("bearer_auth" = []))
)]
pub async fn delete_role(
    State(app_state): State<AppState>,
    _guard: RequireRoles<AdminRoles>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.rbac_service.delete_role(&name).await?;

    Ok(StatusCode::NO_CONTENT)
}

// PUT /api/roles/{name}/permissions — substitui o checklist inteiro
#[utoipa::path(
    put,
    path = "/api/roles/{name}/permissions",
    request_body = ReplacePermissionsPayload,
    responses((status = 200, description = "Checklist atualizado", body = crate::models::rbac::RoleResponse)),
    security(("bearer_auth" = []))
)]
pub async fn replace_role_permissions(
    State(app_state): State<AppState>,
    _guard: RequireRoles<AdminRoles>,
    Path(name): Path<String>,
    Json(payload): Json<ReplacePermissionsPayload>,
) -> Result<impl IntoResponse, AppError> {
    let response = app_state
        .rbac_service
        .replace_role_permissions(&name, payload.permissions)
        .await?;

    Ok(Json(response))
}

// GET /api/permissions (para o frontend montar o checklist de criação)
#[utoipa::path(
    get,
    path = "/api/permissions",
    responses((status = 200, description = "Catálogo de permissões", body = [crate::models::rbac::Permission])),
    security(("bearer_auth" = []))
)]
pub async fn list_permissions(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let permissions = app_state.rbac_service.list_system_permissions().await?;

    Ok(Json(permissions))
}
