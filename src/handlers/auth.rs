// src/handlers/auth.rs

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
    middleware::{
        auth::AuthenticatedUser,
        rbac::{AdminMasterOnly, RequireRoles},
    },
    models::auth::{AuthResponse, ChangeRolePayload, LoginUserPayload, RegisterUserPayload, User},
};

// Handler de registro
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterUserPayload,
    responses((status = 200, description = "Usuário criado, retorna o token", body = AuthResponse))
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state
        .auth_service
        .register_user(&payload.name, &payload.email, &payload.password, payload.company_id)
        .await?;

    Ok(Json(AuthResponse { token }))
}

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginUserPayload,
    responses((status = 200, description = "Autenticado, retorna o token", body = AuthResponse))
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await?;

    Ok(Json(AuthResponse { token }))
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses((status = 200, description = "Perfil do usuário autenticado", body = User)),
    security(("bearer_auth" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}

// PATCH /api/users/{id}/role — troca de cargo (só admin_master)
#[utoipa::path(
    patch,
    path = "/api/users/{id}/role",
    request_body = ChangeRolePayload,
    responses((status = 200, description = "Usuário com o novo cargo", body = User)),
    security(("bearer_auth" = []))
)]
pub async fn change_role(
    State(app_state): State<AppState>,
    _guard: RequireRoles<AdminMasterOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChangeRolePayload>,
) -> Result<impl IntoResponse, AppError> {
    // O cargo alvo precisa existir no catálogo
    app_state.rbac_service.get_role(&payload.role).await?;

    let user = app_state.user_repo.update_role(id, &payload.role).await?;

    Ok((StatusCode::OK, Json(user)))
}

// DELETE /api/users/{id} — desativação, nunca remoção física
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    responses((status = 200, description = "Usuário desativado", body = User)),
    security(("bearer_auth" = []))
)]
pub async fn deactivate_user(
    State(app_state): State<AppState>,
    _guard: RequireRoles<AdminMasterOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.user_repo.deactivate(id).await?;

    tracing::info!("Usuário '{}' desativado", user.email);
    Ok((StatusCode::OK, Json(user)))
}
