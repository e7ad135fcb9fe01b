// src/handlers/ebooks.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::ebook::{CreateEbookPayload, Ebook, UpdateEbookPayload},
    models::redemption::{DownloadPayload, DownloadResponse, RedeemPayload, RedeemResponse},
};

// GET /api/ebooks — catálogo completo (só ativos, por título)
#[utoipa::path(
    get,
    path = "/api/ebooks",
    tag = "Ebooks",
    responses(
        (status = 200, description = "Catálogo completo", body = Vec<Ebook>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_ebooks(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<Ebook>>, AppError> {
    let ebooks = app_state.catalog_service.find_all().await?;
    Ok(Json(ebooks))
}

// POST /api/ebooks/redeem — troca pontos por acesso permanente
#[utoipa::path(
    post,
    path = "/api/ebooks/redeem",
    tag = "Ebooks",
    request_body = RedeemPayload,
    responses(
        (status = 200, description = "Resgate registrado", body = RedeemResponse),
        (status = 400, description = "Pontos insuficientes ou e-book já resgatado"),
        (status = 403, description = "E-book de outro lojista"),
        (status = 404, description = "E-book ou lojista não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn redeem_ebook(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<RedeemPayload>,
) -> Result<Json<RedeemResponse>, AppError> {
    let redemption = app_state
        .redemption_service
        .redeem(user.id, payload.ebook_id, payload.organization_id)
        .await?;

    Ok(Json(RedeemResponse {
        success: true,
        redemption,
        message: "E-book resgatado com sucesso.".to_string(),
    }))
}

// POST /api/ebooks/download — cobra só no primeiro resgate; depois é grátis
#[utoipa::path(
    post,
    path = "/api/ebooks/download",
    tag = "Ebooks",
    request_body = DownloadPayload,
    responses(
        (status = 200, description = "Download liberado", body = DownloadResponse),
        (status = 400, description = "Pontos insuficientes"),
        (status = 403, description = "E-book de outro lojista"),
        (status = 404, description = "E-book ou lojista não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn download_ebook(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<DownloadPayload>,
) -> Result<Json<DownloadResponse>, AppError> {
    let outcome = app_state
        .redemption_service
        .download(
            user.id,
            payload.ebook_id,
            payload.organization_id,
            payload.points_cost,
        )
        .await?;

    let message = if outcome.charged {
        format!("Download liberado ({} pontos debitados).", outcome.points_spent)
    } else {
        "Download liberado (e-book já resgatado).".to_string()
    };

    Ok(Json(DownloadResponse {
        success: true,
        charged: outcome.charged,
        file_url: outcome.file_url,
        message,
    }))
}

// --- Rotas administrativas do catálogo ---

// POST /api/ebooks
#[utoipa::path(
    post,
    path = "/api/ebooks",
    tag = "Admin",
    request_body = CreateEbookPayload,
    responses(
        (status = 201, description = "E-book criado", body = Ebook),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Lojista dono não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_ebook(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<CreateEbookPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let ebook = app_state.catalog_service.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(ebook)))
}

// PUT /api/ebooks/{id}
#[utoipa::path(
    put,
    path = "/api/ebooks/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do e-book")),
    request_body = UpdateEbookPayload,
    responses(
        (status = 200, description = "E-book atualizado", body = Ebook),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "E-book não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_ebook(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEbookPayload>,
) -> Result<Json<Ebook>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let ebook = app_state.catalog_service.update(id, &payload).await?;
    Ok(Json(ebook))
}

// DELETE /api/ebooks/{id} — soft-delete, preserva resgates antigos
#[utoipa::path(
    delete,
    path = "/api/ebooks/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do e-book")),
    responses(
        (status = 204, description = "E-book desativado"),
        (status = 404, description = "E-book não encontrado ou já desativado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_ebook(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
