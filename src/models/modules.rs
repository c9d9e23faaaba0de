// src/models/modules.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// O que sai do banco (Tabela Modules). O catálogo de módulos é global.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440010")]
    pub id: Uuid,

    #[schema(example = "Equipamentos")]
    pub name: String,

    // Derivado do nome, url-safe. Também é o "resource" das permissões gerais.
    #[schema(example = "equipamentos")]
    pub slug: String,

    #[schema(example = "Cadastro e manutenção de equipamentos")]
    pub description: Option<String>,

    #[schema(example = "operacional")]
    pub category: Option<String>,

    // active | inactive | archived
    #[schema(example = "active")]
    pub status: String,

    // internal | public
    #[schema(example = "internal")]
    pub visibility: String,

    // Módulos "core" nunca somem da navegação, independente das concessões
    pub is_core: bool,

    #[schema(example = "/equipamentos")]
    pub route: String,

    #[schema(example = "wrench")]
    pub icon: String,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStatus {
    Active,
    Inactive,
    Archived,
}

impl ModuleStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ModuleStatus::Active => "active",
            ModuleStatus::Inactive => "inactive",
            ModuleStatus::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(ModuleStatus::Active),
            "inactive" => Some(ModuleStatus::Inactive),
            "archived" => Some(ModuleStatus::Archived),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleVisibility {
    Internal,
    Public,
}

impl ModuleVisibility {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ModuleVisibility::Internal => "internal",
            ModuleVisibility::Public => "public",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "internal" => Some(ModuleVisibility::Internal),
            "public" => Some(ModuleVisibility::Public),
            _ => None,
        }
    }
}

// Payload de criação de módulo (o slug é derivado do nome no serviço)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateModulePayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    #[schema(example = "Equipamentos")]
    pub name: String,

    pub description: Option<String>,

    #[schema(example = "operacional")]
    pub category: Option<String>,

    #[validate(custom(function = "validate_status"))]
    #[schema(example = "active")]
    pub status: Option<String>,

    #[validate(custom(function = "validate_visibility"))]
    #[schema(example = "internal")]
    pub visibility: Option<String>,

    pub is_core: Option<bool>,

    #[validate(custom(function = "validate_route"))]
    #[schema(example = "/equipamentos")]
    pub route: String,

    // Deve pertencer ao conjunto fechado de ícones suportados
    #[validate(custom(function = "validate_icon"))]
    #[schema(example = "wrench")]
    pub icon: Option<String>,
}

// Payload de atualização parcial (PATCH)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateModulePayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,

    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,

    #[validate(custom(function = "validate_visibility"))]
    pub visibility: Option<String>,

    pub is_core: Option<bool>,

    #[validate(custom(function = "validate_route"))]
    pub route: Option<String>,

    #[validate(custom(function = "validate_icon"))]
    pub icon: Option<String>,
}

// Histórico de versões (Tabela module_versions)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModuleVersion {
    pub id: Uuid,
    pub module_id: Uuid,

    #[schema(example = "2.0.0")]
    pub version: String,

    #[schema(example = "Corrige ordenação da listagem de equipamentos")]
    pub changelog: Option<String>,

    // No máximo uma versão estável por módulo
    pub is_stable: bool,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVersionPayload {
    #[validate(custom(function = "validate_semver"))]
    #[schema(example = "2.0.0")]
    pub version: String,

    pub changelog: Option<String>,
}

// Uma célula da matriz de permissões de um módulo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModulePermissionEntry {
    #[schema(example = "tecnico")]
    pub role_name: String,

    #[schema(example = "delete")]
    pub action: String,

    pub allowed: bool,
}

// A tela de administração sempre grava a matriz completa
// (todos os cargos × todas as ações), nunca linhas avulsas.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveMatrixPayload {
    pub entries: Vec<ModulePermissionEntry>,
}

// Linha do resolvedor de módulos permitidos (derivada, nunca persistida)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllowedModule {
    #[schema(example = "equipamentos")]
    pub module_name: String,

    #[schema(example = "Equipamentos")]
    pub module_title: String,

    #[schema(example = "/equipamentos")]
    pub module_url: String,

    #[schema(example = "wrench")]
    pub module_icon: String,

    pub is_allowed: bool,
}

// Deriva um slug url-safe a partir do nome ("Ordens de Serviço" -> "ordens-de-servico")
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        let mapped = match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => Some('a'),
            'é' | 'è' | 'ê' | 'ë' => Some('e'),
            'í' | 'ì' | 'î' | 'ï' => Some('i'),
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => Some('o'),
            'ú' | 'ù' | 'û' | 'ü' => Some('u'),
            'ç' => Some('c'),
            c if c.is_ascii_alphanumeric() => Some(c.to_ascii_lowercase()),
            _ => None,
        };
        match mapped {
            Some(c) => {
                slug.push(c);
                last_dash = false;
            }
            None => {
                if !last_dash {
                    slug.push('-');
                    last_dash = true;
                }
            }
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
    ModuleStatus::parse(value)
        .map(|_| ())
        .ok_or_else(|| validation_error("status", "Status desconhecido."))
}

fn validate_visibility(value: &str) -> Result<(), ValidationError> {
    ModuleVisibility::parse(value)
        .map(|_| ())
        .ok_or_else(|| validation_error("visibility", "Visibilidade desconhecida."))
}

fn validate_route(value: &str) -> Result<(), ValidationError> {
    if value.starts_with('/') && value.len() > 1 {
        Ok(())
    } else {
        Err(validation_error("route", "A rota deve começar com '/'."))
    }
}

fn validate_icon(value: &str) -> Result<(), ValidationError> {
    crate::models::navigation::Icon::parse(value)
        .map(|_| ())
        .ok_or_else(|| validation_error("icon", "Ícone desconhecido."))
}

// Três componentes numéricos separados por ponto (ex.: "1.20.3")
pub fn validate_semver(value: &str) -> Result<(), ValidationError> {
    let parts: Vec<&str> = value.split('.').collect();
    let ok = parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.len() <= 9 && p.chars().all(|c| c.is_ascii_digit()));
    if ok {
        Ok(())
    } else {
        Err(validation_error(
            "semver",
            "A versão deve seguir o padrão semântico (ex.: 1.2.3).",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_strips_accents_and_spaces() {
        assert_eq!(slugify("Ordens de Serviço"), "ordens-de-servico");
        assert_eq!(slugify("Equipamentos"), "equipamentos");
        assert_eq!(slugify("  FAQ / Base de Conhecimento  "), "faq-base-de-conhecimento");
    }

    #[test]
    fn semver_accepts_three_numeric_components() {
        assert!(validate_semver("1.0.0").is_ok());
        assert!(validate_semver("10.20.30").is_ok());
    }

    #[test]
    fn semver_rejects_malformed_versions() {
        assert!(validate_semver("1.0").is_err());
        assert!(validate_semver("v1.0.0").is_err());
        assert!(validate_semver("1.0.0-beta").is_err());
        assert!(validate_semver("1..0").is_err());
        assert!(validate_semver("").is_err());
    }
}
