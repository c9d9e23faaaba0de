// src/db/rbac_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::rbac::{Permission, Role},
};

#[derive(Clone)]
pub struct RbacRepository {
    pool: PgPool,
}

impl RbacRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(roles)
    }

    pub async fn list_role_names(&self) -> Result<Vec<String>, AppError> {
        let names = sqlx::query_scalar::<_, String>("SELECT name FROM roles ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(names)
    }

    pub async fn find_role(&self, name: &str) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(role)
    }

    // 1. Criar o Cargo
    pub async fn create_role<'e, E>(
        &self,
        executor: E,
        name: &str,
        display_name: &str,
        description: Option<&str>,
        color: Option<&str>,
    ) -> Result<Role, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let role = sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (name, display_name, description, color, is_system_role)
            VALUES ($1, $2, $3, $4, FALSE)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(display_name)
        .bind(description)
        .bind(color)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(
                        "Já existe um cargo com esse nome.".into(),
                    );
                }
            }
            e.into()
        })?;

        Ok(role)
    }

    pub async fn update_role(
        &self,
        name: &str,
        display_name: Option<&str>,
        description: Option<&str>,
        color: Option<&str>,
    ) -> Result<Role, AppError> {
        sqlx::query_as::<_, Role>(
            r#"
            UPDATE roles
            SET display_name = COALESCE($2, display_name),
                description  = COALESCE($3, description),
                color        = COALESCE($4, color),
                updated_at   = now()
            WHERE name = $1
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(display_name)
        .bind(description)
        .bind(color)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::RoleNotFound)
    }

    // O serviço já barrou cargos de sistema antes de chegar aqui
    pub async fn delete_role(&self, name: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM roles WHERE name = $1 AND is_system_role = FALSE")
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    // 2. Buscar permissões do catálogo baseado nas chaves ("ordens:create")
    pub async fn find_permissions_by_keys<'e, E>(
        &self,
        executor: E,
        keys: &[String],
    ) -> Result<Vec<Permission>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // O SQLx lida bem com arrays usando ANY
        let permissions = sqlx::query_as::<_, Permission>(
            r#"
            SELECT id, resource, action
            FROM permissions
            WHERE (resource || ':' || action) = ANY($1)
            "#,
        )
        .bind(keys)
        .fetch_all(executor)
        .await?;

        Ok(permissions)
    }

    // 3. Vincular Cargo <-> Permissão
    pub async fn assign_permissions<'e, E>(
        &self,
        executor: E,
        role_name: &str,
        permission_ids: &[uuid::Uuid],
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Inserção em massa usando UNNEST para performance
        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_name, permission_id)
            SELECT $1, unnest($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(role_name)
        .bind(permission_ids)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn clear_permissions<'e, E>(
        &self,
        executor: E,
        role_name: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM role_permissions WHERE role_name = $1")
            .bind(role_name)
            .execute(executor)
            .await?;

        Ok(())
    }

    // 4. Listar todas as permissões disponíveis (para o frontend montar o checklist)
    pub async fn list_all_permissions(&self) -> Result<Vec<Permission>, AppError> {
        let permissions = sqlx::query_as::<_, Permission>(
            "SELECT id, resource, action FROM permissions ORDER BY resource, action",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(permissions)
    }

    // Chaves "resource:action" concedidas a um cargo
    pub async fn list_role_permission_keys(&self, role_name: &str) -> Result<Vec<String>, AppError> {
        let keys = sqlx::query_scalar::<_, String>(
            r#"
            SELECT p.resource || ':' || p.action
            FROM role_permissions rp
            JOIN permissions p ON p.id = rp.permission_id
            WHERE rp.role_name = $1
            ORDER BY 1
            "#,
        )
        .bind(role_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(keys)
    }
}
