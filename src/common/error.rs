use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Regra geral: qualquer ambiguidade na resolução de acesso vira "negado",
// nunca "permitido" (fail-closed).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    // Autenticado, mas sem linha de perfil correspondente. Não herda
    // permissões padrão: bloqueia com orientação explícita.
    #[error("Perfil não encontrado")]
    ProfileNotFound,

    #[error("Usuário desativado")]
    InactiveUser,

    #[error("Acesso negado")]
    AccessDenied,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Cargo não encontrado")]
    RoleNotFound,

    #[error("Módulo não encontrado")]
    ModuleNotFound,

    #[error("Versão não encontrada")]
    VersionNotFound,

    // Cargos de sistema não podem ser removidos.
    #[error("Cargo de sistema protegido")]
    SystemRoleProtected,

    // A matriz de permissões de um módulo só é gravada completa
    // (todos os cargos × todas as ações).
    #[error("Matriz de permissões incompleta: {0}")]
    IncompleteMatrix(String),

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "Este e-mail já está em uso.".to_string())
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.".to_string())
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::ProfileNotFound => (
                StatusCode::FORBIDDEN,
                "Seu acesso ainda não foi configurado. Contate o administrador.".to_string(),
            ),
            AppError::InactiveUser => (
                StatusCode::FORBIDDEN,
                "Este usuário está desativado. Contate o administrador.".to_string(),
            ),
            AppError::AccessDenied => (
                StatusCode::FORBIDDEN,
                "Você não tem permissão para acessar este recurso.".to_string(),
            ),
            AppError::UserNotFound => {
                (StatusCode::NOT_FOUND, "Usuário não encontrado.".to_string())
            }
            AppError::RoleNotFound => {
                (StatusCode::NOT_FOUND, "Cargo não encontrado.".to_string())
            }
            AppError::ModuleNotFound => {
                (StatusCode::NOT_FOUND, "Módulo não encontrado.".to_string())
            }
            AppError::VersionNotFound => {
                (StatusCode::NOT_FOUND, "Versão não encontrada.".to_string())
            }
            AppError::SystemRoleProtected => (
                StatusCode::CONFLICT,
                "Cargos de sistema não podem ser removidos.".to_string(),
            ),
            AppError::IncompleteMatrix(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("A matriz de permissões deve ser gravada completa: {detail}"),
            ),
            AppError::UniqueConstraintViolation(msg) => (StatusCode::CONFLICT, msg),

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::AppError;

    // Cargo inexistente é 404; falha de banco na mesma consulta é 500.
    // As duas situações nunca podem colapsar no mesmo status.
    #[test]
    fn missing_role_and_database_failure_map_to_distinct_statuses() {
        let not_found = AppError::RoleNotFound.into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let db_error = AppError::DatabaseError(sqlx::Error::PoolClosed).into_response();
        assert_eq!(db_error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
