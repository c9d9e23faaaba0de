// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth / Usuários ---
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::get_me,
        crate::handlers::auth::change_role,
        crate::handlers::auth::deactivate_user,

        // --- RBAC ---
        crate::handlers::rbac::create_role,
        crate::handlers::rbac::list_roles,
        crate::handlers::rbac::get_role,
        crate::handlers::rbac::update_role,
        crate::handlers::rbac::delete_role,
        crate::handlers::rbac::replace_role_permissions,
        crate::handlers::rbac::list_permissions,

        // --- Módulos ---
        crate::handlers::modules::list_modules,
        crate::handlers::modules::get_module,
        crate::handlers::modules::create_module,
        crate::handlers::modules::update_module,
        crate::handlers::modules::archive_module,
        crate::handlers::modules::get_module_matrix,
        crate::handlers::modules::save_module_matrix,
        crate::handlers::modules::list_versions,
        crate::handlers::modules::create_version,
        crate::handlers::modules::mark_version_stable,

        // --- Navegação ---
        crate::handlers::navigation::get_my_modules,
        crate::handlers::navigation::get_navigation,
    ),
    components(schemas(
        models::auth::User,
        models::auth::RegisterUserPayload,
        models::auth::LoginUserPayload,
        models::auth::ChangeRolePayload,
        models::auth::AuthResponse,
        models::rbac::Role,
        models::rbac::Permission,
        models::rbac::CreateRolePayload,
        models::rbac::UpdateRolePayload,
        models::rbac::ReplacePermissionsPayload,
        models::rbac::RoleResponse,
        models::modules::Module,
        models::modules::CreateModulePayload,
        models::modules::UpdateModulePayload,
        models::modules::ModuleVersion,
        models::modules::CreateVersionPayload,
        models::modules::ModulePermissionEntry,
        models::modules::SaveMatrixPayload,
        models::modules::AllowedModule,
        models::navigation::Icon,
        models::navigation::NavigationItem,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "chamados-backend", description = "Gestão de acesso, módulos e navegação")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
