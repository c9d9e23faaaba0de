// src/models/rbac.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Cargos de sistema, semeados na carga inicial. Usuários podem apontar para
// cargos criados por administradores além destes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemRole {
    AdminMaster,
    Admin,
    AdminCliente,
    Gestor,
    Tecnico,
    ClienteFinal,
}

impl SystemRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SystemRole::AdminMaster => "admin_master",
            SystemRole::Admin => "admin",
            SystemRole::AdminCliente => "admin_cliente",
            SystemRole::Gestor => "gestor",
            SystemRole::Tecnico => "tecnico",
            SystemRole::ClienteFinal => "cliente_final",
        }
    }
}

// Ações atômicas do catálogo de permissões. Toda matriz de módulo cobre
// exatamente este conjunto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionAction {
    View,
    Create,
    Edit,
    Delete,
}

impl PermissionAction {
    pub const ALL: [PermissionAction; 4] = [
        PermissionAction::View,
        PermissionAction::Create,
        PermissionAction::Edit,
        PermissionAction::Delete,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            PermissionAction::View => "view",
            PermissionAction::Create => "create",
            PermissionAction::Edit => "edit",
            PermissionAction::Delete => "delete",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "view" => Some(PermissionAction::View),
            "create" => Some(PermissionAction::Create),
            "edit" => Some(PermissionAction::Edit),
            "delete" => Some(PermissionAction::Delete),
            _ => None,
        }
    }
}

// O que sai do banco (Tabela Roles)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    // Chave interna única (ex.: "tecnico")
    #[schema(example = "tecnico")]
    pub name: String,

    #[schema(example = "Técnico")]
    pub display_name: String,

    #[schema(example = "Execução de chamados e ordens em campo")]
    pub description: Option<String>,

    // Apenas apresentação
    #[schema(example = "#d97706")]
    pub color: Option<String>,

    // Cargos de sistema não podem ser removidos
    pub is_system_role: bool,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// O que sai do banco (Tabela Permissions) — catálogo imutável
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440001")]
    pub id: Uuid,

    // Corresponde ao slug do módulo equivalente
    #[schema(example = "ordens")]
    pub resource: String,

    #[schema(example = "create")]
    pub action: String,
}

// O Payload para criar um cargo
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRolePayload {
    #[validate(length(min = 2, message = "O nome interno deve ter no mínimo 2 caracteres."))]
    #[schema(example = "auxiliar_campo")]
    pub name: String,

    #[validate(length(min = 2, message = "O nome de exibição deve ter no mínimo 2 caracteres."))]
    #[schema(example = "Auxiliar de Campo")]
    pub display_name: String,

    #[schema(example = "Apoia técnicos em campo, sem poder de exclusão")]
    pub description: Option<String>,

    #[schema(example = "#0ea5e9")]
    pub color: Option<String>,

    // Pares "resource:action" marcados no checklist
    #[schema(example = json!(["chamados:view", "ordens:view"]))]
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRolePayload {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

// Substituição completa do checklist de permissões de um cargo
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplacePermissionsPayload {
    #[schema(example = json!(["chamados:view", "chamados:create"]))]
    pub permissions: Vec<String>,
}

// Resposta completa (Cargo + Lista de Permissões)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    #[serde(flatten)]
    pub role: Role,

    #[schema(example = json!(["chamados:view", "ordens:view"]))]
    pub permissions: Vec<String>,
}
