use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Os serviços devolvem variantes tipadas; a tradução para HTTP
// acontece uma única vez, aqui.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Arquivo de upload inválido: {0}")]
    InvalidUpload(String),

    #[error("E-mail ou senha inválidos")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Lojista não encontrado")]
    OrganizationNotFound,

    #[error("E-book não encontrado")]
    EbookNotFound,

    // Cross-tenant: o e-book existe, mas pertence a outro lojista
    #[error("E-book indisponível para este lojista")]
    EbookNotVisible,

    #[error("Pontos insuficientes")]
    InsufficientPoints,

    #[error("E-book já resgatado")]
    AlreadyRedeemed,

    #[error("Senha já definida")]
    PasswordAlreadySet,

    // Variante para erros de banco de dados
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

impl AppError {
    // Mantido separado do IntoResponse para poder ser testado sem montar
    // uma Response inteira.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            AppError::InsufficientPoints => StatusCode::BAD_REQUEST,
            AppError::AlreadyRedeemed => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::EbookNotVisible => StatusCode::FORBIDDEN,
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::OrganizationNotFound => StatusCode::NOT_FOUND,
            AppError::EbookNotFound => StatusCode::NOT_FOUND,
            AppError::PasswordAlreadySet => StatusCode::CONFLICT,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Validação devolve todos os detalhes por campo.
        if let AppError::ValidationError(errors) = &self {
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

        let status = self.status_code();

        // Erros inesperados viram 500 com mensagem genérica: o detalhe
        // completo fica só no log do servidor.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {:?}", self);
            "Ocorreu um erro inesperado.".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod status_mapping_tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_expected_status() {
        assert_eq!(AppError::InsufficientPoints.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::AlreadyRedeemed.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::EbookNotVisible.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::EbookNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::PasswordAlreadySet.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn unexpected_errors_map_to_internal_server_error() {
        let err = AppError::InternalServerError(anyhow::anyhow!("detalhe interno"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
