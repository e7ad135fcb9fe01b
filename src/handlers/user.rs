// src/handlers/user.rs

use axum::{Json, extract::State};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::user::{UpdateProfilePayload, UpdateProfileResponse, UserInfoResponse},
};

// GET /api/user/info — dados do usuário logado + lojista
#[utoipa::path(
    get,
    path = "/api/user/info",
    tag = "Users",
    responses(
        (status = 200, description = "Dados do usuário autenticado", body = UserInfoResponse),
        (status = 404, description = "Lojista do usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_info(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<UserInfoResponse>, AppError> {
    let info = app_state.user_service.get_info(&user).await?;
    Ok(Json(info))
}

// PUT /api/user/profile — nome e e-mail
#[utoipa::path(
    put,
    path = "/api/user/profile",
    tag = "Users",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Perfil atualizado", body = UpdateProfileResponse),
        (status = 400, description = "Nome ou e-mail inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_profile(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<Json<UpdateProfileResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state
        .user_service
        .update_profile(&user, &payload.name, &payload.email)
        .await?;

    Ok(Json(UpdateProfileResponse { success: true, user }))
}
