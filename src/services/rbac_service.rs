// src/services/rbac_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::RbacRepository,
    models::rbac::{Permission, Role, RoleResponse},
};

#[derive(Clone)]
pub struct RbacService {
    repo: RbacRepository,
    pool: PgPool,
}

impl RbacService {
    pub fn new(repo: RbacRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn create_role_with_permissions(
        &self,
        name: String,
        display_name: String,
        description: Option<String>,
        color: Option<String>,
        permission_keys: Vec<String>,
    ) -> Result<RoleResponse, AppError> {
        // 1. Inicia Transação
        let mut tx = self.pool.begin().await?;

        // 2. Cria o Cargo
        let role = self
            .repo
            .create_role(
                &mut *tx,
                &name,
                &display_name,
                description.as_deref(),
                color.as_deref(),
            )
            .await?;

        // 3. Resolve chaves ("ordens:create") para IDs do catálogo
        let permissions = self.repo.find_permissions_by_keys(&mut *tx, &permission_keys).await?;

        let permission_ids: Vec<uuid::Uuid> = permissions.iter().map(|p| p.id).collect();
        let valid_keys: Vec<String> = permissions
            .into_iter()
            .map(|p| format!("{}:{}", p.resource, p.action))
            .collect();

        // 4. Salva o Vínculo
        if !permission_ids.is_empty() {
            self.repo.assign_permissions(&mut *tx, role.name.as_str(), &permission_ids).await?;
        }

        // 5. Commit
        tx.commit().await?;

        Ok(RoleResponse {
            role,
            permissions: valid_keys,
        })
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        self.repo.list_roles().await
    }

    pub async fn get_role(&self, name: &str) -> Result<RoleResponse, AppError> {
        let role = self.repo.find_role(name).await?.ok_or(AppError::RoleNotFound)?;
        let permissions = self.repo.list_role_permission_keys(name).await?;

        Ok(RoleResponse { role, permissions })
    }

    pub async fn update_role(
        &self,
        name: &str,
        display_name: Option<String>,
        description: Option<String>,
        color: Option<String>,
    ) -> Result<Role, AppError> {
        self.repo
            .update_role(
                name,
                display_name.as_deref(),
                description.as_deref(),
                color.as_deref(),
            )
            .await
    }

    // Cargos de sistema nunca são removidos
    pub async fn delete_role(&self, name: &str) -> Result<(), AppError> {
        let role = self.repo.find_role(name).await?.ok_or(AppError::RoleNotFound)?;

        if role.is_system_role {
            return Err(AppError::SystemRoleProtected);
        }

        let deleted = self.repo.delete_role(name).await?;
        if deleted == 0 {
            return Err(AppError::RoleNotFound);
        }

        Ok(())
    }

    // Substitui o checklist inteiro do cargo em uma transação
    pub async fn replace_role_permissions(
        &self,
        name: &str,
        permission_keys: Vec<String>,
    ) -> Result<RoleResponse, AppError> {
        let role = self.repo.find_role(name).await?.ok_or(AppError::RoleNotFound)?;

        let mut tx = self.pool.begin().await?;

        self.repo.clear_permissions(&mut *tx, name).await?;

        let permissions = self.repo.find_permissions_by_keys(&mut *tx, &permission_keys).await?;
        let permission_ids: Vec<uuid::Uuid> = permissions.iter().map(|p| p.id).collect();
        let valid_keys: Vec<String> = permissions
            .into_iter()
            .map(|p| format!("{}:{}", p.resource, p.action))
            .collect();

        if !permission_ids.is_empty() {
            self.repo.assign_permissions(&mut *tx, name, &permission_ids).await?;
        }

        tx.commit().await?;

        Ok(RoleResponse {
            role,
            permissions: valid_keys,
        })
    }

    pub async fn list_system_permissions(&self) -> Result<Vec<Permission>, AppError> {
        self.repo.list_all_permissions().await
    }
}
