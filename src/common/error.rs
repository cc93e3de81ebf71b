use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Corpo que nem chega a ser o JSON esperado (sintaxe, tipo, Content-Type)
    #[error("Corpo JSON inválido: {0}")]
    JsonInvalido(#[from] JsonRejection),

    #[error("O campo tarefas_concluidas deve ser um objeto")]
    TarefasInvalidas,

    #[error("Cliente não encontrado")]
    ClienteNaoEncontrado,

    #[error("Usuário não encontrado")]
    UsuarioNaoEncontrado,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Qualquer outro erro inesperado, com o contexto do anyhow
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Código estável enviado ao cliente junto da mensagem.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDACAO",
            AppError::JsonInvalido(_) => "JSON_INVALIDO",
            AppError::TarefasInvalidas => "TAREFAS_INVALIDAS",
            AppError::ClienteNaoEncontrado => "CLIENTE_NAO_ENCONTRADO",
            AppError::UsuarioNaoEncontrado => "USUARIO_NAO_ENCONTRADO",
            AppError::InvalidCredentials => "CREDENCIAIS_INVALIDAS",
            AppError::InvalidToken => "TOKEN_INVALIDO",
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => "ERRO_INTERNO",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, error_message) = match self {
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
                    "code": code,
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::JsonInvalido(rejection) => {
                tracing::debug!(status = %rejection.status(), "Corpo rejeitado: {}", rejection.body_text());
                let body = Json(json!({
                    "error": "O corpo da requisição não é um JSON válido para esta rota.",
                    "code": code,
                    "details": rejection.body_text(),
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::TarefasInvalidas => (
                StatusCode::BAD_REQUEST,
                "O campo tarefas_concluidas é obrigatório e deve ser um objeto.",
            ),
            AppError::ClienteNaoEncontrado => (StatusCode::NOT_FOUND, "Cliente não encontrado."),
            AppError::UsuarioNaoEncontrado => (StatusCode::NOT_FOUND, "Usuário não encontrado."),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos."),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.",
            ),

            // Banco, bcrypt, JWT e anyhow viram 500. O detalhe fica só no log.
            ref e => {
                tracing::error!(code, "Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        let body = Json(json!({ "error": error_message, "code": code }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_hide_detail_behind_generic_code() {
        let err = AppError::InternalServerError(anyhow::anyhow!("conexão recusada"));
        assert_eq!(err.code(), "ERRO_INTERNO");
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_is_distinct_from_validation() {
        assert_eq!(
            AppError::ClienteNaoEncontrado.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::TarefasInvalidas.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
