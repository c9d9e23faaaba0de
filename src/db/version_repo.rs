// src/db/version_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::modules::ModuleVersion,
    services::module_service::VersionRepository,
};

#[derive(Clone)]
pub struct PgVersionRepository {
    pool: PgPool,
}

impl PgVersionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VersionRepository for PgVersionRepository {
    async fn module_exists(&self, module_id: Uuid) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM modules WHERE id = $1)")
                .bind(module_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn list_versions(&self, module_id: Uuid) -> Result<Vec<ModuleVersion>, AppError> {
        let versions = sqlx::query_as::<_, ModuleVersion>(
            "SELECT * FROM module_versions WHERE module_id = $1 ORDER BY created_at DESC",
        )
        .bind(module_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(versions)
    }

    async fn insert_version(
        &self,
        module_id: Uuid,
        version: &str,
        changelog: Option<&str>,
    ) -> Result<ModuleVersion, AppError> {
        sqlx::query_as::<_, ModuleVersion>(
            r#"
            INSERT INTO module_versions (module_id, version, changelog)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(module_id)
        .bind(version)
        .bind(changelog)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(
                        "Esta versão já foi registrada para o módulo.".into(),
                    );
                }
            }
            e.into()
        })
    }

    async fn unmark_stable(&self, module_id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE module_versions SET is_stable = FALSE WHERE module_id = $1")
            .bind(module_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn mark_stable(
        &self,
        module_id: Uuid,
        version_id: Uuid,
    ) -> Result<ModuleVersion, AppError> {
        sqlx::query_as::<_, ModuleVersion>(
            r#"
            UPDATE module_versions
            SET is_stable = TRUE
            WHERE id = $1 AND module_id = $2
            RETURNING *
            "#,
        )
        .bind(version_id)
        .bind(module_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::VersionNotFound)
    }
}
