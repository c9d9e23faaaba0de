// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{ModuleRepository, PgAccessRepository, PgVersionRepository, RbacRepository, UserRepository},
    services::{
        access_service::AccessService, auth::AuthService, module_service::ModuleService,
        rbac_service::RbacService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub user_repo: UserRepository,
    pub auth_service: AuthService,
    pub rbac_service: RbacService,
    pub module_service: ModuleService,
    pub access_service: AccessService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let rbac_repo = RbacRepository::new(db_pool.clone());
        let module_repo = ModuleRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret);
        let rbac_service = RbacService::new(rbac_repo.clone(), db_pool.clone());
        let version_repo = Arc::new(PgVersionRepository::new(db_pool.clone()));
        let module_service =
            ModuleService::new(module_repo, rbac_repo, version_repo, db_pool.clone());
        let access_service =
            AccessService::new(Arc::new(PgAccessRepository::new(db_pool.clone())));

        Ok(Self {
            db_pool,
            user_repo,
            auth_service,
            rbac_service,
            module_service,
            access_service,
        })
    }
}
