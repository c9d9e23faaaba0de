// src/db/module_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::modules::{Module, ModulePermissionEntry},
};

#[derive(Clone)]
pub struct ModuleRepository {
    pool: PgPool,
}

impl ModuleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Visão administrativa: todos os módulos, inclusive arquivados
    pub async fn list_all(&self) -> Result<Vec<Module>, AppError> {
        let modules = sqlx::query_as::<_, Module>("SELECT * FROM modules ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(modules)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Module>, AppError> {
        let module = sqlx::query_as::<_, Module>("SELECT * FROM modules WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(module)
    }

    pub async fn create(
        &self,
        name: &str,
        slug: &str,
        description: Option<&str>,
        category: Option<&str>,
        status: &str,
        visibility: &str,
        is_core: bool,
        route: &str,
        icon: &str,
    ) -> Result<Module, AppError> {
        sqlx::query_as::<_, Module>(
            r#"
            INSERT INTO modules (name, slug, description, category, status, visibility, is_core, route, icon)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(slug)
        .bind(description)
        .bind(category)
        .bind(status)
        .bind(visibility)
        .bind(is_core)
        .bind(route)
        .bind(icon)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(
                        "Já existe um módulo com esse nome.".into(),
                    );
                }
            }
            e.into()
        })
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        slug: Option<&str>,
        description: Option<&str>,
        category: Option<&str>,
        status: Option<&str>,
        visibility: Option<&str>,
        is_core: Option<bool>,
        route: Option<&str>,
        icon: Option<&str>,
    ) -> Result<Module, AppError> {
        sqlx::query_as::<_, Module>(
            r#"
            UPDATE modules
            SET name        = COALESCE($2, name),
                slug        = COALESCE($3, slug),
                description = COALESCE($4, description),
                category    = COALESCE($5, category),
                status      = COALESCE($6, status),
                visibility  = COALESCE($7, visibility),
                is_core     = COALESCE($8, is_core),
                route       = COALESCE($9, route),
                icon        = COALESCE($10, icon),
                updated_at  = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(slug)
        .bind(description)
        .bind(category)
        .bind(status)
        .bind(visibility)
        .bind(is_core)
        .bind(route)
        .bind(icon)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::ModuleNotFound)
    }

    // --- Matriz de permissões por módulo ---

    pub async fn list_matrix(&self, module_id: Uuid) -> Result<Vec<ModulePermissionEntry>, AppError> {
        let entries = sqlx::query_as::<_, ModulePermissionEntry>(
            r#"
            SELECT role_name, action, allowed
            FROM module_permissions
            WHERE module_id = $1
            ORDER BY role_name, action
            "#,
        )
        .bind(module_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn clear_matrix<'e, E>(&self, executor: E, module_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM module_permissions WHERE module_id = $1")
            .bind(module_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    // Inserção em massa da matriz usando UNNEST (uma ida ao banco)
    pub async fn insert_matrix<'e, E>(
        &self,
        executor: E,
        module_id: Uuid,
        entries: &[ModulePermissionEntry],
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let roles: Vec<String> = entries.iter().map(|e| e.role_name.clone()).collect();
        let actions: Vec<String> = entries.iter().map(|e| e.action.clone()).collect();
        let allowed: Vec<bool> = entries.iter().map(|e| e.allowed).collect();

        sqlx::query(
            r#"
            INSERT INTO module_permissions (module_id, role_name, action, allowed)
            SELECT $1, r, a, al
            FROM unnest($2::text[], $3::text[], $4::bool[]) AS t(r, a, al)
            "#,
        )
        .bind(module_id)
        .bind(&roles)
        .bind(&actions)
        .bind(&allowed)
        .execute(executor)
        .await?;

        Ok(())
    }
}
