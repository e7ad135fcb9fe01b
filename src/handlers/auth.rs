// src/handlers/auth.rs

use axum::{Json, extract::State};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{AuthResponse, FirstAccessPayload, LoginPayload},
};

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Token de sessão", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(AuthResponse { token }))
}

// Handler do primeiro acesso: membro importado define a senha.
#[utoipa::path(
    post,
    path = "/api/auth/first-access",
    tag = "Auth",
    request_body = FirstAccessPayload,
    responses(
        (status = 200, description = "Senha definida, token de sessão", body = AuthResponse),
        (status = 403, description = "CPF de outro lojista"),
        (status = 404, description = "CPF não encontrado"),
        (status = 409, description = "Senha já definida")
    )
)]
pub async fn first_access(
    State(app_state): State<AppState>,
    Json(payload): Json<FirstAccessPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state
        .auth_service
        .first_access(&payload.cpf, payload.organization_id, &payload.password)
        .await?;

    Ok(Json(AuthResponse { token }))
}
