// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Json, Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas de usuário: perfil, módulos permitidos e ações administrativas
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/me/modules", get(handlers::navigation::get_my_modules))
        .route("/{id}/role", patch(handlers::auth::change_role))
        .route("/{id}", axum::routing::delete(handlers::auth::deactivate_user))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Catálogo de cargos e permissões (administração)
    let role_routes = Router::new()
        .route(
            "/",
            post(handlers::rbac::create_role).get(handlers::rbac::list_roles),
        )
        .route(
            "/{name}",
            get(handlers::rbac::get_role)
                .patch(handlers::rbac::update_role)
                .delete(handlers::rbac::delete_role),
        )
        .route(
            "/{name}/permissions",
            put(handlers::rbac::replace_role_permissions),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Registro de módulos: catálogo, matriz de permissões e versões
    let module_routes = Router::new()
        .route(
            "/",
            post(handlers::modules::create_module).get(handlers::modules::list_modules),
        )
        .route(
            "/{id}",
            get(handlers::modules::get_module).patch(handlers::modules::update_module),
        )
        .route("/{id}/archive", post(handlers::modules::archive_module))
        .route(
            "/{id}/permissions",
            get(handlers::modules::get_module_matrix).put(handlers::modules::save_module_matrix),
        )
        .route(
            "/{id}/versions",
            get(handlers::modules::list_versions).post(handlers::modules::create_version),
        )
        .route(
            "/{id}/versions/{version_id}/stable",
            post(handlers::modules::mark_version_stable),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Menu lateral composto por requisição
    let navigation_routes = Router::new()
        .route("/", get(handlers::navigation::get_navigation))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let permissions_route = Router::new()
        .route("/", get(handlers::rbac::list_permissions))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route(
            "/api/docs/openapi.json",
            get(|| async { Json(docs::ApiDoc::openapi()) }),
        )
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/roles", role_routes)
        .nest("/api/permissions", permissions_route)
        .nest("/api/modules", module_routes)
        .nest("/api/navigation", navigation_routes)
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
