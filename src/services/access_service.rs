// src/services/access_service.rs

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::User,
        modules::{AllowedModule, Module},
        rbac::PermissionAction,
    },
};

/// Port de leitura para a resolução de acesso. A implementação Postgres vive
/// em `db::access_repo`; os testes usam uma versão em memória.
#[async_trait]
pub trait AccessRepository: Send + Sync {
    async fn list_navigable_modules(&self) -> Result<Vec<Module>, AppError>;

    /// Resolve apenas módulos navegáveis (mesmo recorte de
    /// `list_navigable_modules`): rota de módulo inativo não resolve.
    async fn find_module_by_route(&self, route: &str) -> Result<Option<Module>, AppError>;

    async fn module_override(
        &self,
        module_id: Uuid,
        role: &str,
        action: &str,
    ) -> Result<Option<bool>, AppError>;

    async fn role_has_grant(
        &self,
        role: &str,
        resource: &str,
        action: &str,
    ) -> Result<bool, AppError>;
}

/// Decisão do guardião de rota. O estado "pendente" é implícito: é o
/// intervalo entre a chamada e o retorno.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Granted,
    Denied,
}

/// Resolve permissões efetivas por (cargo, módulo, ação), combinando a
/// concessão geral do cargo com a sobrescrita granular por módulo.
/// Sem estado próprio: cada chamada relê o que precisa do repositório.
#[derive(Clone)]
pub struct AccessService {
    repo: Arc<dyn AccessRepository>,
}

impl AccessService {
    pub fn new(repo: Arc<dyn AccessRepository>) -> Self {
        Self { repo }
    }

    /// Precedência, da maior para a menor:
    /// 1. módulo "core" + ação "view": sempre permitido;
    /// 2. sobrescrita explícita do módulo (vale tanto para
    ///    permitir quanto para negar o que o cargo teria por padrão);
    /// 3. concessão geral do cargo para (slug do módulo, ação);
    /// 4. negado.
    pub async fn resolve(
        &self,
        role: &str,
        module: &Module,
        action: PermissionAction,
    ) -> Result<bool, AppError> {
        if module.is_core && action == PermissionAction::View {
            return Ok(true);
        }

        if let Some(allowed) = self
            .repo
            .module_override(module.id, role, action.as_str())
            .await?
        {
            return Ok(allowed);
        }

        self.repo
            .role_has_grant(role, &module.slug, action.as_str())
            .await
    }

    /// Módulos com "view" permitido para o usuário. Falhas de leitura viram
    /// conjunto vazio (nunca acesso indevido) e são apenas logadas; quem
    /// disparou pode tentar de novo manualmente.
    pub async fn allowed_modules(&self, user: &User) -> Vec<AllowedModule> {
        match self.resolve_allowed_modules(&user.role).await {
            Ok(modules) => modules,
            Err(e) => {
                tracing::error!(
                    "Falha ao resolver módulos permitidos para o cargo '{}': {}",
                    user.role,
                    e
                );
                Vec::new()
            }
        }
    }

    async fn resolve_allowed_modules(&self, role: &str) -> Result<Vec<AllowedModule>, AppError> {
        let modules = self.repo.list_navigable_modules().await?;

        let mut allowed = Vec::with_capacity(modules.len());
        for module in &modules {
            let is_allowed = self.resolve(role, module, PermissionAction::View).await?;
            if is_allowed {
                allowed.push(AllowedModule {
                    module_name: module.slug.clone(),
                    module_title: module.name.clone(),
                    module_url: module.route.clone(),
                    module_icon: module.icon.clone(),
                    is_allowed,
                });
            }
        }

        Ok(allowed)
    }

    /// Guardião de rota: lista explícita de cargos primeiro; lista vazia
    /// libera qualquer autenticado; senão, cai na resolução de "view" do
    /// módulo correspondente à rota. Qualquer erro nega.
    pub async fn check_route(
        &self,
        user: &User,
        route: &str,
        allowed_roles: &[&str],
    ) -> AccessDecision {
        if !user.active {
            return AccessDecision::Denied;
        }

        if allowed_roles.is_empty() {
            return AccessDecision::Granted;
        }

        if allowed_roles.contains(&user.role.as_str()) {
            return AccessDecision::Granted;
        }

        match self.repo.find_module_by_route(route).await {
            Ok(Some(module)) => {
                match self.resolve(&user.role, &module, PermissionAction::View).await {
                    Ok(true) => AccessDecision::Granted,
                    Ok(false) => AccessDecision::Denied,
                    Err(e) => {
                        tracing::error!("Falha ao resolver acesso à rota '{}': {}", route, e);
                        AccessDecision::Denied
                    }
                }
            }
            Ok(None) => AccessDecision::Denied,
            Err(e) => {
                tracing::error!("Falha ao localizar módulo da rota '{}': {}", route, e);
                AccessDecision::Denied
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Utc;
    use uuid::Uuid;

    use super::{AccessDecision, AccessRepository, AccessService};
    use crate::common::error::AppError;
    use crate::models::{auth::User, modules::Module, rbac::PermissionAction};

    #[derive(Default)]
    struct FakeAccessRepository {
        modules: Vec<Module>,
        overrides: HashMap<(Uuid, String, String), bool>,
        grants: Vec<(String, String, String)>,
        fail: bool,
    }

    #[async_trait]
    impl AccessRepository for FakeAccessRepository {
        async fn list_navigable_modules(&self) -> Result<Vec<Module>, AppError> {
            if self.fail {
                return Err(AppError::InternalServerError(anyhow::anyhow!("indisponível")));
            }
            Ok(self
                .modules
                .iter()
                .filter(|m| m.status == "active" || m.is_core)
                .cloned()
                .collect())
        }

        async fn find_module_by_route(&self, route: &str) -> Result<Option<Module>, AppError> {
            if self.fail {
                return Err(AppError::InternalServerError(anyhow::anyhow!("indisponível")));
            }
            Ok(self
                .modules
                .iter()
                .find(|m| m.route == route && (m.status == "active" || m.is_core))
                .cloned())
        }

        async fn module_override(
            &self,
            module_id: Uuid,
            role: &str,
            action: &str,
        ) -> Result<Option<bool>, AppError> {
            if self.fail {
                return Err(AppError::InternalServerError(anyhow::anyhow!("indisponível")));
            }
            Ok(self
                .overrides
                .get(&(module_id, role.to_owned(), action.to_owned()))
                .copied())
        }

        async fn role_has_grant(
            &self,
            role: &str,
            resource: &str,
            action: &str,
        ) -> Result<bool, AppError> {
            if self.fail {
                return Err(AppError::InternalServerError(anyhow::anyhow!("indisponível")));
            }
            Ok(self
                .grants
                .iter()
                .any(|(r, res, a)| r == role && res == resource && a == action))
        }
    }

    fn module(name: &str, slug: &str, route: &str, is_core: bool) -> Module {
        Module {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            category: None,
            status: "active".to_string(),
            visibility: "internal".to_string(),
            is_core,
            route: route.to_string(),
            icon: "wrench".to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    fn user(role: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Maria".to_string(),
            email: "maria@teste.com".to_string(),
            password_hash: String::new(),
            role: role.to_string(),
            company_id: None,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn grant(role: &str, resource: &str, action: &str) -> (String, String, String) {
        (role.to_string(), resource.to_string(), action.to_string())
    }

    #[tokio::test]
    async fn core_module_view_is_always_allowed() {
        let core = module("Início", "inicio", "/", true);
        let repo = FakeAccessRepository {
            modules: vec![core.clone()],
            // Sobrescrita negando explicitamente: "view" de módulo core ganha mesmo assim
            overrides: HashMap::from([(
                (core.id, "cliente_final".to_string(), "view".to_string()),
                false,
            )]),
            ..Default::default()
        };
        let service = AccessService::new(Arc::new(repo));

        let allowed = service
            .resolve("cliente_final", &core, PermissionAction::View)
            .await
            .unwrap();
        assert!(allowed);
    }

    #[tokio::test]
    async fn explicit_override_wins_over_role_grant_both_ways() {
        let equip = module("Equipamentos", "equipamentos", "/equipamentos", false);
        let repo = FakeAccessRepository {
            modules: vec![equip.clone()],
            overrides: HashMap::from([
                // O cargo teria "view" pela concessão geral, mas a sobrescrita nega
                ((equip.id, "gestor".to_string(), "view".to_string()), false),
                // O cargo não teria "delete", mas a sobrescrita permite
                ((equip.id, "tecnico".to_string(), "delete".to_string()), true),
            ]),
            grants: vec![grant("gestor", "equipamentos", "view")],
            ..Default::default()
        };
        let service = AccessService::new(Arc::new(repo));

        let gestor_view = service
            .resolve("gestor", &equip, PermissionAction::View)
            .await
            .unwrap();
        assert!(!gestor_view);

        let tecnico_delete = service
            .resolve("tecnico", &equip, PermissionAction::Delete)
            .await
            .unwrap();
        assert!(tecnico_delete);
    }

    #[tokio::test]
    async fn falls_back_to_role_grant_when_no_override() {
        let equip = module("Equipamentos", "equipamentos", "/equipamentos", false);
        let repo = FakeAccessRepository {
            modules: vec![equip.clone()],
            grants: vec![grant("tecnico", "equipamentos", "edit")],
            ..Default::default()
        };
        let service = AccessService::new(Arc::new(repo));

        assert!(service
            .resolve("tecnico", &equip, PermissionAction::Edit)
            .await
            .unwrap());
        // Sem linha de sobrescrita e sem concessão geral: negado
        assert!(!service
            .resolve("tecnico", &equip, PermissionAction::Delete)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn fresh_module_without_matrix_denies_everything() {
        let novo = module("Relatórios", "relatorios", "/relatorios", false);
        let repo = FakeAccessRepository {
            modules: vec![novo.clone()],
            ..Default::default()
        };
        let service = AccessService::new(Arc::new(repo));

        for action in PermissionAction::ALL {
            let allowed = service.resolve("admin", &novo, action).await.unwrap();
            assert!(!allowed, "ação {:?} deveria ser negada", action);
        }
    }

    #[tokio::test]
    async fn allowed_modules_is_empty_on_fetch_failure() {
        let repo = FakeAccessRepository {
            fail: true,
            ..Default::default()
        };
        let service = AccessService::new(Arc::new(repo));

        let modules = service.allowed_modules(&user("admin")).await;
        assert!(modules.is_empty());
    }

    #[tokio::test]
    async fn allowed_modules_includes_core_even_without_grants() {
        let core = module("Início", "inicio", "/", true);
        let equip = module("Equipamentos", "equipamentos", "/equipamentos", false);
        let repo = FakeAccessRepository {
            modules: vec![core, equip],
            ..Default::default()
        };
        let service = AccessService::new(Arc::new(repo));

        let modules = service.allowed_modules(&user("cliente_final")).await;
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].module_url, "/");
        assert!(modules[0].is_allowed);
    }

    #[tokio::test]
    async fn route_guard_grants_role_in_allow_list() {
        let service = AccessService::new(Arc::new(FakeAccessRepository::default()));

        let decision = service
            .check_route(&user("admin_master"), "/configuracoes", &["admin_master"])
            .await;
        assert_eq!(decision, AccessDecision::Granted);
    }

    #[tokio::test]
    async fn route_guard_grants_any_authenticated_on_empty_list() {
        let service = AccessService::new(Arc::new(FakeAccessRepository::default()));

        let decision = service.check_route(&user("cliente_final"), "/faq", &[]).await;
        assert_eq!(decision, AccessDecision::Granted);
    }

    #[tokio::test]
    async fn route_guard_falls_back_to_module_view() {
        let equip = module("Equipamentos", "equipamentos", "/equipamentos", false);
        let repo = FakeAccessRepository {
            modules: vec![equip.clone()],
            grants: vec![grant("tecnico", "equipamentos", "view")],
            ..Default::default()
        };
        let service = AccessService::new(Arc::new(repo));

        let granted = service
            .check_route(&user("tecnico"), "/equipamentos", &["admin"])
            .await;
        assert_eq!(granted, AccessDecision::Granted);

        let denied = service
            .check_route(&user("cliente_final"), "/equipamentos", &["admin"])
            .await;
        assert_eq!(denied, AccessDecision::Denied);
    }

    #[tokio::test]
    async fn route_guard_denies_on_error_and_unknown_route() {
        let failing = AccessService::new(Arc::new(FakeAccessRepository {
            fail: true,
            ..Default::default()
        }));
        let decision = failing
            .check_route(&user("admin"), "/equipamentos", &["outro"])
            .await;
        assert_eq!(decision, AccessDecision::Denied);

        let empty = AccessService::new(Arc::new(FakeAccessRepository::default()));
        let decision = empty
            .check_route(&user("admin"), "/nao-existe", &["outro"])
            .await;
        assert_eq!(decision, AccessDecision::Denied);
    }

    #[tokio::test]
    async fn route_guard_denies_route_of_inactive_module() {
        let mut equip = module("Equipamentos", "equipamentos", "/equipamentos", false);
        equip.status = "inactive".to_string();
        let repo = FakeAccessRepository {
            modules: vec![equip],
            // A concessão existe, mas o módulo está fora da navegação
            grants: vec![grant("tecnico", "equipamentos", "view")],
            ..Default::default()
        };
        let service = AccessService::new(Arc::new(repo));

        let decision = service
            .check_route(&user("tecnico"), "/equipamentos", &["admin"])
            .await;
        assert_eq!(decision, AccessDecision::Denied);
    }

    #[tokio::test]
    async fn route_guard_denies_inactive_user() {
        let service = AccessService::new(Arc::new(FakeAccessRepository::default()));

        let mut u = user("admin_master");
        u.active = false;
        let decision = service.check_route(&u, "/configuracoes", &[]).await;
        assert_eq!(decision, AccessDecision::Denied);
    }
}
