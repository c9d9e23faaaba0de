// src/services/module_service.rs

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ModuleRepository, RbacRepository},
    models::{
        modules::{
            slugify, CreateModulePayload, CreateVersionPayload, Module, ModulePermissionEntry,
            ModuleStatus, ModuleVersion, ModuleVisibility, UpdateModulePayload,
        },
        navigation::Icon,
        rbac::PermissionAction,
    },
};

/// Port de escrita/leitura do histórico de versões. A implementação Postgres
/// vive em `db::version_repo`; os testes usam uma versão em memória.
#[async_trait]
pub trait VersionRepository: Send + Sync {
    async fn module_exists(&self, module_id: Uuid) -> Result<bool, AppError>;

    async fn list_versions(&self, module_id: Uuid) -> Result<Vec<ModuleVersion>, AppError>;

    async fn insert_version(
        &self,
        module_id: Uuid,
        version: &str,
        changelog: Option<&str>,
    ) -> Result<ModuleVersion, AppError>;

    async fn unmark_stable(&self, module_id: Uuid) -> Result<(), AppError>;

    async fn mark_stable(
        &self,
        module_id: Uuid,
        version_id: Uuid,
    ) -> Result<ModuleVersion, AppError>;
}

#[derive(Clone)]
pub struct ModuleService {
    repo: ModuleRepository,
    rbac_repo: RbacRepository,
    versions: Arc<dyn VersionRepository>,
    pool: PgPool,
}

impl ModuleService {
    pub fn new(
        repo: ModuleRepository,
        rbac_repo: RbacRepository,
        versions: Arc<dyn VersionRepository>,
        pool: PgPool,
    ) -> Self {
        Self { repo, rbac_repo, versions, pool }
    }

    pub async fn list_modules(&self) -> Result<Vec<Module>, AppError> {
        self.repo.list_all().await
    }

    pub async fn get_module(&self, id: Uuid) -> Result<Module, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::ModuleNotFound)
    }

    pub async fn create_module(&self, payload: CreateModulePayload) -> Result<Module, AppError> {
        let slug = slugify(&payload.name);
        let status = payload.status.as_deref().unwrap_or(ModuleStatus::Active.as_str());
        let visibility = payload
            .visibility
            .as_deref()
            .unwrap_or(ModuleVisibility::Internal.as_str());
        let icon = payload.icon.as_deref().unwrap_or(Icon::LayoutDashboard.as_str());

        self.repo
            .create(
                &payload.name,
                &slug,
                payload.description.as_deref(),
                payload.category.as_deref(),
                status,
                visibility,
                payload.is_core.unwrap_or(false),
                &payload.route,
                icon,
            )
            .await
    }

    // PATCH: campos ausentes ficam como estão. Renomear o módulo rederiva o slug.
    pub async fn update_module(
        &self,
        id: Uuid,
        payload: UpdateModulePayload,
    ) -> Result<Module, AppError> {
        let slug = payload.name.as_deref().map(slugify);

        self.repo
            .update(
                id,
                payload.name.as_deref(),
                slug.as_deref(),
                payload.description.as_deref(),
                payload.category.as_deref(),
                payload.status.as_deref(),
                payload.visibility.as_deref(),
                payload.is_core,
                payload.route.as_deref(),
                payload.icon.as_deref(),
            )
            .await
    }

    // Módulos em uso não são removidos, são arquivados
    pub async fn archive_module(&self, id: Uuid) -> Result<Module, AppError> {
        self.repo
            .update(
                id,
                None,
                None,
                None,
                None,
                Some(ModuleStatus::Archived.as_str()),
                None,
                None,
                None,
                None,
            )
            .await
    }

    // --- Matriz de permissões ---

    pub async fn get_matrix(&self, module_id: Uuid) -> Result<Vec<ModulePermissionEntry>, AppError> {
        self.repo.find_by_id(module_id).await?.ok_or(AppError::ModuleNotFound)?;
        self.repo.list_matrix(module_id).await
    }

    // Grava a matriz completa (todos os cargos × todas as ações) de uma vez,
    // substituindo o que havia. Matrizes parciais são rejeitadas para não
    // criar estado misto entre sobrescrita e padrão do cargo.
    pub async fn save_matrix(
        &self,
        module_id: Uuid,
        entries: Vec<ModulePermissionEntry>,
    ) -> Result<Vec<ModulePermissionEntry>, AppError> {
        self.repo.find_by_id(module_id).await?.ok_or(AppError::ModuleNotFound)?;

        let roles = self.rbac_repo.list_role_names().await?;
        validate_full_matrix(&roles, &entries)?;

        let mut tx = self.pool.begin().await?;
        self.repo.clear_matrix(&mut *tx, module_id).await?;
        self.repo.insert_matrix(&mut *tx, module_id, &entries).await?;
        tx.commit().await?;

        self.repo.list_matrix(module_id).await
    }

    // --- Versões ---

    pub async fn list_versions(&self, module_id: Uuid) -> Result<Vec<ModuleVersion>, AppError> {
        if !self.versions.module_exists(module_id).await? {
            return Err(AppError::ModuleNotFound);
        }
        self.versions.list_versions(module_id).await
    }

    pub async fn create_version(
        &self,
        module_id: Uuid,
        payload: CreateVersionPayload,
    ) -> Result<ModuleVersion, AppError> {
        if !self.versions.module_exists(module_id).await? {
            return Err(AppError::ModuleNotFound);
        }
        self.versions
            .insert_version(module_id, &payload.version, payload.changelog.as_deref())
            .await
    }

    // Desmarca as demais antes de marcar a nova; o índice parcial único em
    // module_versions garante que nunca existem duas estáveis ao mesmo tempo.
    pub async fn mark_version_stable(
        &self,
        module_id: Uuid,
        version_id: Uuid,
    ) -> Result<ModuleVersion, AppError> {
        if !self.versions.module_exists(module_id).await? {
            return Err(AppError::ModuleNotFound);
        }

        self.versions.unmark_stable(module_id).await?;
        self.versions.mark_stable(module_id, version_id).await
    }
}

// A matriz é válida quando cobre exatamente cargos × ações, sem faltas nem
// sobras nem duplicatas.
pub fn validate_full_matrix(
    roles: &[String],
    entries: &[ModulePermissionEntry],
) -> Result<(), AppError> {
    let expected = roles.len() * PermissionAction::ALL.len();
    if entries.len() != expected {
        return Err(AppError::IncompleteMatrix(format!(
            "esperadas {} linhas, recebidas {}",
            expected,
            entries.len()
        )));
    }

    let mut seen: HashSet<(&str, &str)> = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !roles.iter().any(|r| r == &entry.role_name) {
            return Err(AppError::IncompleteMatrix(format!(
                "cargo desconhecido '{}'",
                entry.role_name
            )));
        }
        if PermissionAction::parse(&entry.action).is_none() {
            return Err(AppError::IncompleteMatrix(format!(
                "ação desconhecida '{}'",
                entry.action
            )));
        }
        if !seen.insert((entry.role_name.as_str(), entry.action.as_str())) {
            return Err(AppError::IncompleteMatrix(format!(
                "linha duplicada ({}, {})",
                entry.role_name, entry.action
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;
    use sqlx::postgres::PgPoolOptions;

    use super::*;

    // Guarda as versões em memória; o serviço nunca chega a tocar o pool
    // nestes testes (connect_lazy não abre conexão).
    struct FakeVersionRepository {
        module_id: Uuid,
        versions: Mutex<Vec<ModuleVersion>>,
    }

    impl FakeVersionRepository {
        fn with_versions(module_id: Uuid, versions: Vec<ModuleVersion>) -> Self {
            Self {
                module_id,
                versions: Mutex::new(versions),
            }
        }

        fn stable_versions(&self) -> Vec<ModuleVersion> {
            self.versions
                .lock()
                .unwrap()
                .iter()
                .filter(|v| v.is_stable)
                .cloned()
                .collect()
        }
    }

    #[async_trait]
    impl VersionRepository for FakeVersionRepository {
        async fn module_exists(&self, module_id: Uuid) -> Result<bool, AppError> {
            Ok(module_id == self.module_id)
        }

        async fn list_versions(&self, module_id: Uuid) -> Result<Vec<ModuleVersion>, AppError> {
            Ok(self
                .versions
                .lock()
                .unwrap()
                .iter()
                .filter(|v| v.module_id == module_id)
                .cloned()
                .collect())
        }

        async fn insert_version(
            &self,
            module_id: Uuid,
            version: &str,
            changelog: Option<&str>,
        ) -> Result<ModuleVersion, AppError> {
            let created = ModuleVersion {
                id: Uuid::new_v4(),
                module_id,
                version: version.to_string(),
                changelog: changelog.map(str::to_string),
                is_stable: false,
                created_at: Utc::now(),
            };
            self.versions.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn unmark_stable(&self, module_id: Uuid) -> Result<(), AppError> {
            for v in self.versions.lock().unwrap().iter_mut() {
                if v.module_id == module_id {
                    v.is_stable = false;
                }
            }
            Ok(())
        }

        async fn mark_stable(
            &self,
            module_id: Uuid,
            version_id: Uuid,
        ) -> Result<ModuleVersion, AppError> {
            let mut versions = self.versions.lock().unwrap();
            let version = versions
                .iter_mut()
                .find(|v| v.id == version_id && v.module_id == module_id)
                .ok_or(AppError::VersionNotFound)?;
            version.is_stable = true;
            Ok(version.clone())
        }
    }

    fn version(module_id: Uuid, number: &str, is_stable: bool) -> ModuleVersion {
        ModuleVersion {
            id: Uuid::new_v4(),
            module_id,
            version: number.to_string(),
            changelog: None,
            is_stable,
            created_at: Utc::now(),
        }
    }

    fn service_with(versions: Arc<FakeVersionRepository>) -> ModuleService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/nunca-conecta")
            .unwrap();
        ModuleService::new(
            ModuleRepository::new(pool.clone()),
            RbacRepository::new(pool.clone()),
            versions,
            pool,
        )
    }

    #[tokio::test]
    async fn marking_stable_leaves_exactly_one_stable_version() {
        let module_id = Uuid::new_v4();
        let v1 = version(module_id, "1.0.0", true);
        let v2 = version(module_id, "2.0.0", false);
        let v2_id = v2.id;

        let fake = Arc::new(FakeVersionRepository::with_versions(module_id, vec![v1, v2]));
        let service = service_with(fake.clone());

        let marked = service.mark_version_stable(module_id, v2_id).await.unwrap();
        assert!(marked.is_stable);
        assert_eq!(marked.version, "2.0.0");

        let stable = fake.stable_versions();
        assert_eq!(stable.len(), 1);
        assert_eq!(stable[0].version, "2.0.0");
    }

    #[tokio::test]
    async fn marking_stable_on_unknown_module_or_version_fails() {
        let module_id = Uuid::new_v4();
        let v1 = version(module_id, "1.0.0", false);
        let v1_id = v1.id;

        let fake = Arc::new(FakeVersionRepository::with_versions(module_id, vec![v1]));
        let service = service_with(fake);

        let err = service
            .mark_version_stable(Uuid::new_v4(), v1_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ModuleNotFound));

        let err = service
            .mark_version_stable(module_id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::VersionNotFound));
    }

    fn roles() -> Vec<String> {
        vec!["admin".to_string(), "tecnico".to_string()]
    }

    fn full_matrix(roles: &[String]) -> Vec<ModulePermissionEntry> {
        let mut entries = Vec::new();
        for role in roles {
            for action in PermissionAction::ALL {
                entries.push(ModulePermissionEntry {
                    role_name: role.clone(),
                    action: action.as_str().to_string(),
                    allowed: false,
                });
            }
        }
        entries
    }

    #[test]
    fn accepts_complete_matrix() {
        let roles = roles();
        let entries = full_matrix(&roles);
        assert!(validate_full_matrix(&roles, &entries).is_ok());
    }

    #[test]
    fn rejects_missing_rows() {
        let roles = roles();
        let mut entries = full_matrix(&roles);
        entries.pop();
        assert!(validate_full_matrix(&roles, &entries).is_err());
    }

    #[test]
    fn rejects_duplicates_and_unknown_values() {
        let roles = roles();

        let mut duplicated = full_matrix(&roles);
        duplicated.pop();
        duplicated.push(duplicated[0].clone());
        assert!(validate_full_matrix(&roles, &duplicated).is_err());

        let mut unknown_role = full_matrix(&roles);
        unknown_role[0].role_name = "fantasma".to_string();
        assert!(validate_full_matrix(&roles, &unknown_role).is_err());

        let mut unknown_action = full_matrix(&roles);
        unknown_action[0].action = "explodir".to_string();
        assert!(validate_full_matrix(&roles, &unknown_action).is_err());
    }

    // A gravação substitui tudo e a leitura devolve as mesmas linhas: a
    // conversão payload -> linhas é identidade, então a propriedade de
    // ida-e-volta se reduz a validar + ordenar.
    #[test]
    fn matrix_round_trip_preserves_every_row() {
        let roles = roles();
        let mut entries = full_matrix(&roles);
        entries[3].allowed = true;
        entries[6].allowed = true;

        assert!(validate_full_matrix(&roles, &entries).is_ok());

        let mut reloaded = entries.clone();
        reloaded.sort_by(|a, b| (&a.role_name, &a.action).cmp(&(&b.role_name, &b.action)));

        let mut expected = entries;
        expected.sort_by(|a, b| (&a.role_name, &a.action).cmp(&(&b.role_name, &b.action)));
        assert_eq!(reloaded, expected);
    }
}
