// src/models/navigation.rs

use serde::Serialize;
use utoipa::ToSchema;

// Conjunto fechado de ícones suportados pela interface. Nomes desconhecidos
// são rejeitados no formulário de administração; linhas antigas caem no
// ícone padrão na hora de compor o menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    #[default]
    LayoutDashboard,
    Phone,
    ClipboardList,
    Wrench,
    Calendar,
    FolderOpen,
    BookOpen,
    Users,
    Package,
    Settings,
}

impl Icon {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Icon::LayoutDashboard => "layout-dashboard",
            Icon::Phone => "phone",
            Icon::ClipboardList => "clipboard-list",
            Icon::Wrench => "wrench",
            Icon::Calendar => "calendar",
            Icon::FolderOpen => "folder-open",
            Icon::BookOpen => "book-open",
            Icon::Users => "users",
            Icon::Package => "package",
            Icon::Settings => "settings",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "layout-dashboard" => Some(Icon::LayoutDashboard),
            "phone" => Some(Icon::Phone),
            "clipboard-list" => Some(Icon::ClipboardList),
            "wrench" => Some(Icon::Wrench),
            "calendar" => Some(Icon::Calendar),
            "folder-open" => Some(Icon::FolderOpen),
            "book-open" => Some(Icon::BookOpen),
            "users" => Some(Icon::Users),
            "package" => Some(Icon::Package),
            "settings" => Some(Icon::Settings),
            _ => None,
        }
    }
}

// Item do menu lateral (derivado por requisição, nunca persistido)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NavigationItem {
    #[schema(example = "Chamados")]
    pub title: String,

    #[schema(example = "/chamados")]
    pub url: String,

    #[schema(example = "phone")]
    pub icon: Icon,
}

impl NavigationItem {
    pub fn new(title: &str, url: &str, icon: Icon) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
            icon,
        }
    }
}
