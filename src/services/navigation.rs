// src/services/navigation.rs

use std::collections::HashSet;

use crate::models::{
    modules::AllowedModule,
    navigation::{Icon, NavigationItem},
    rbac::SystemRole,
};

// "/cadastros" é um item estático reservado: o módulo dinâmico homônimo é
// suprimido para não duplicar a entrada no menu.
pub const RESERVED_CADASTROS_URL: &str = "/cadastros";

const SETTINGS_URL: &str = "/configuracoes";

// Itens fixos do menu, sempre presentes e sempre antes dos dinâmicos.
fn base_items() -> Vec<NavigationItem> {
    vec![
        NavigationItem::new("Início", "/", Icon::LayoutDashboard),
        NavigationItem::new("Chamados", "/chamados", Icon::Phone),
        NavigationItem::new("Ordens de Serviço", "/ordens", Icon::ClipboardList),
        NavigationItem::new("Agenda", "/agenda", Icon::Calendar),
        NavigationItem::new("Cadastros", RESERVED_CADASTROS_URL, Icon::FolderOpen),
        NavigationItem::new("Base de Conhecimento", "/faq", Icon::BookOpen),
    ]
}

/// Compõe o menu lateral: base estática, depois os módulos permitidos,
/// sem urls duplicadas. `admin_master` sempre recebe "Configurações" no
/// final, independente de concessões de módulo.
pub fn compose_navigation(role: &str, allowed_modules: &[AllowedModule]) -> Vec<NavigationItem> {
    let mut items = base_items();
    let mut seen: HashSet<String> = items.iter().map(|i| i.url.clone()).collect();

    for module in allowed_modules {
        if !module.is_allowed {
            continue;
        }
        // Itens estáticos ganham de módulos dinâmicos com a mesma url
        if module.module_url == RESERVED_CADASTROS_URL || seen.contains(&module.module_url) {
            continue;
        }
        seen.insert(module.module_url.clone());
        items.push(NavigationItem {
            title: module.module_title.clone(),
            url: module.module_url.clone(),
            icon: Icon::parse(&module.module_icon).unwrap_or_default(),
        });
    }

    if role == SystemRole::AdminMaster.as_str() && !seen.contains(SETTINGS_URL) {
        items.push(NavigationItem::new("Configurações", SETTINGS_URL, Icon::Settings));
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed(title: &str, url: &str, icon: &str) -> AllowedModule {
        AllowedModule {
            module_name: title.to_lowercase(),
            module_title: title.to_string(),
            module_url: url.to_string(),
            module_icon: icon.to_string(),
            is_allowed: true,
        }
    }

    #[test]
    fn output_has_no_duplicate_urls() {
        let modules = vec![
            allowed("Equipamentos", "/equipamentos", "wrench"),
            allowed("Equipamentos 2", "/equipamentos", "wrench"),
            allowed("Chamados", "/chamados", "phone"),
        ];

        let items = compose_navigation("tecnico", &modules);

        let mut urls: Vec<&str> = items.iter().map(|i| i.url.as_str()).collect();
        urls.sort();
        urls.dedup();
        assert_eq!(urls.len(), items.len());
    }

    #[test]
    fn static_items_precede_dynamic_ones() {
        let modules = vec![allowed("Equipamentos", "/equipamentos", "wrench")];

        let items = compose_navigation("tecnico", &modules);

        let base_len = compose_navigation("tecnico", &[]).len();
        assert_eq!(items[..base_len].iter().map(|i| i.url.as_str()).collect::<Vec<_>>(),
                   vec!["/", "/chamados", "/ordens", "/agenda", "/cadastros", "/faq"]);
        assert_eq!(items.last().unwrap().url, "/equipamentos");
    }

    #[test]
    fn admin_master_always_gets_settings_entry() {
        // Zero concessões de módulo, ainda assim "Configurações" aparece
        let items = compose_navigation("admin_master", &[]);
        let settings = items.last().unwrap();
        assert_eq!(settings.title, "Configurações");
        assert_eq!(settings.url, "/configuracoes");
        assert_eq!(settings.icon, Icon::Settings);

        let items = compose_navigation("admin", &[]);
        assert!(items.iter().all(|i| i.url != "/configuracoes"));
    }

    #[test]
    fn reserved_cadastros_route_renders_exactly_once() {
        // O resolvedor devolveu um módulo dinâmico "/cadastros" permitido;
        // só a entrada estática deve aparecer.
        let modules = vec![allowed("Cadastros", "/cadastros", "folder-open")];

        let items = compose_navigation("gestor", &modules);

        let count = items.iter().filter(|i| i.url == "/cadastros").count();
        assert_eq!(count, 1);
    }

    #[test]
    fn disallowed_rows_and_unknown_icons_are_handled() {
        let mut blocked = allowed("Relatórios", "/relatorios", "chart");
        blocked.is_allowed = false;
        let modules = vec![
            blocked,
            allowed("Estoque", "/estoque", "icone-que-nao-existe"),
        ];

        let items = compose_navigation("gestor", &modules);

        assert!(items.iter().all(|i| i.url != "/relatorios"));
        let estoque = items.iter().find(|i| i.url == "/estoque").unwrap();
        // Nome desconhecido em linha já gravada cai no ícone padrão
        assert_eq!(estoque.icon, Icon::LayoutDashboard);
    }
}
