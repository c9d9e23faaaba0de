// src/handlers/navigation.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{AnyAuthenticated, RequireRoles},
    },
    services::navigation::compose_navigation,
};

// GET /api/users/me/modules — módulos com "view" permitido para o usuário.
// Falha de leitura vira lista vazia (fail-closed), nunca erro 500.
#[utoipa::path(
    get,
    path = "/api/users/me/modules",
    responses((status = 200, description = "Módulos permitidos", body = [crate::models::modules::AllowedModule])),
    security(("bearer_auth" = []))
)]
pub async fn get_my_modules(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let modules = app_state.access_service.allowed_modules(&user).await;

    Ok(Json(modules))
}

// GET /api/navigation — menu lateral já composto para o usuário atual
#[utoipa::path(
    get,
    path = "/api/navigation",
    responses((status = 200, description = "Menu composto, sem urls duplicadas", body = [crate::models::navigation::NavigationItem])),
    security(("bearer_auth" = []))
)]
pub async fn get_navigation(
    State(app_state): State<AppState>,
    _guard: RequireRoles<AnyAuthenticated>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let allowed = app_state.access_service.allowed_modules(&user).await;
    let items = compose_navigation(&user.role, &allowed);

    Ok(Json(items))
}
