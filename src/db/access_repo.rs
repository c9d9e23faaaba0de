// src/db/access_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError, models::modules::Module, services::access_service::AccessRepository,
};

// Implementação Postgres do port de resolução de acesso. Sem cache: cada
// resolução relê o estado, como o resto dos repositórios.
#[derive(Clone)]
pub struct PgAccessRepository {
    pool: PgPool,
}

impl PgAccessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessRepository for PgAccessRepository {
    // Módulos candidatos à navegação: ativos, mais os "core", que nunca
    // podem ser totalmente ocultados.
    async fn list_navigable_modules(&self) -> Result<Vec<Module>, AppError> {
        let modules = sqlx::query_as::<_, Module>(
            "SELECT * FROM modules WHERE status = 'active' OR is_core ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(modules)
    }

    // Mesmo filtro da navegação: rota de módulo inativo ou arquivado não
    // resolve (e portanto nega), a menos que o módulo seja "core".
    async fn find_module_by_route(&self, route: &str) -> Result<Option<Module>, AppError> {
        let module = sqlx::query_as::<_, Module>(
            "SELECT * FROM modules WHERE route = $1 AND (status = 'active' OR is_core)",
        )
        .bind(route)
        .fetch_optional(&self.pool)
        .await?;

        Ok(module)
    }

    // Sobrescrita explícita (módulo, cargo, ação), se houver
    async fn module_override(
        &self,
        module_id: Uuid,
        role: &str,
        action: &str,
    ) -> Result<Option<bool>, AppError> {
        let allowed = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT allowed
            FROM module_permissions
            WHERE module_id = $1 AND role_name = $2 AND action = $3
            "#,
        )
        .bind(module_id)
        .bind(role)
        .bind(action)
        .fetch_optional(&self.pool)
        .await?;

        Ok(allowed)
    }

    // Concessão geral do cargo para (resource, action)
    async fn role_has_grant(
        &self,
        role: &str,
        resource: &str,
        action: &str,
    ) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM role_permissions rp
                JOIN permissions p ON p.id = rp.permission_id
                WHERE rp.role_name = $1
                  AND p.resource = $2
                  AND p.action = $3
            )
            "#,
        )
        .bind(role)
        .bind(resource)
        .bind(action)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
