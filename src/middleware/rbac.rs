// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{auth::User, rbac::SystemRole},
    services::access_service::AccessDecision,
};

/// 1. O Trait que define a lista de cargos aceitos por um grupo de rotas.
/// Lista vazia libera qualquer usuário autenticado; cargo fora da lista cai
/// na resolução de "view" do módulo correspondente à rota.
pub trait RoleSet: Send + Sync + 'static {
    fn allowed_roles() -> &'static [&'static str];
}

/// 2. O Extractor (Guardião). Pendente enquanto resolve; termina em
/// concedido (segue o handler) ou negado (resposta 403).
pub struct RequireRoles<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts

impl<T, S> FromRequestParts<S> for RequireRoles<T>
where
    T: RoleSet,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // A. Extrai o usuário resolvido pelo auth_guard
        let user = parts
            .extensions
            .get::<User>()
            .cloned()
            .ok_or(AppError::InvalidToken)?;

        // B. Decide: lista de cargos, senão "view" do módulo da rota.
        // Qualquer erro na resolução nega, nunca concede.
        let route = parts.uri.path().to_owned();
        let decision = app_state
            .access_service
            .check_route(&user, &route, T::allowed_roles())
            .await;

        match decision {
            AccessDecision::Granted => Ok(RequireRoles(PhantomData)),
            AccessDecision::Denied => {
                tracing::warn!(
                    "Acesso negado: usuário '{}' (cargo '{}') na rota '{}'",
                    user.email,
                    user.role,
                    route
                );
                Err(AppError::AccessDenied)
            }
        }
    }
}

// ---
// DEFINIÇÃO DOS CONJUNTOS DE CARGOS
// ---

// Administração da plataforma (catálogos de cargos e módulos)
pub struct AdminRoles;
impl RoleSet for AdminRoles {
    fn allowed_roles() -> &'static [&'static str] {
        &["admin_master", "admin"]
    }
}

// Ações reservadas ao cargo de maior privilégio
pub struct AdminMasterOnly;
impl RoleSet for AdminMasterOnly {
    fn allowed_roles() -> &'static [&'static str] {
        const ROLES: &[&str] = &[SystemRole::AdminMaster.as_str()];
        ROLES
    }
}

// Qualquer autenticado (rotas públicas-para-autenticados)
pub struct AnyAuthenticated;
impl RoleSet for AnyAuthenticated {
    fn allowed_roles() -> &'static [&'static str] {
        &[]
    }
}
