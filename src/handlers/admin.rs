// src/handlers/admin.rs

use axum::{Json, extract::Multipart, extract::State};
use serde::Serialize;
use serde_json::{Value, json};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser,
    services::import_service::ImportOutcome,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadPointsResponse {
    pub success: bool,
    pub result: ImportOutcome,
}

// Só para o Swagger descrever o formulário multipart.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadPointsForm {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub organization_id: String,

    #[schema(value_type = String, format = Binary)]
    pub file: String,
}

// POST /api/upload-points — multipart com o campo de texto
// "organizationId" e o arquivo CSV em "file".
#[utoipa::path(
    post,
    path = "/api/upload-points",
    tag = "Admin",
    request_body(content = UploadPointsForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Resumo da importação", body = UploadPointsResponse),
        (status = 400, description = "Planilha ou formulário inválido"),
        (status = 404, description = "Lojista não encontrado ou inativo")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_points(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<Json<UploadPointsResponse>, AppError> {
    let mut organization_id: Option<Uuid> = None;
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidUpload(e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("organizationId") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidUpload(e.to_string()))?;
                let id = Uuid::parse_str(text.trim()).map_err(|_| {
                    AppError::InvalidUpload("organizationId não é um UUID válido".into())
                })?;
                organization_id = Some(id);
            }
            Some("file") => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidUpload(e.to_string()))?;
                file_bytes = Some(data.to_vec());
            }
            _ => {}
        }
    }

    let organization_id = organization_id
        .ok_or_else(|| AppError::InvalidUpload("o campo organizationId é obrigatório".into()))?;
    let file_bytes =
        file_bytes.ok_or_else(|| AppError::InvalidUpload("o campo file é obrigatório".into()))?;

    let result = app_state
        .import_service
        .import_points(organization_id, &file_bytes)
        .await?;

    Ok(Json(UploadPointsResponse {
        success: true,
        result,
    }))
}

// GET /api/test-db — contagens de diagnóstico
#[utoipa::path(
    get,
    path = "/api/test-db",
    tag = "Admin",
    responses(
        (status = 200, description = "Contagens das tabelas principais")
    )
)]
pub async fn test_db(State(app_state): State<AppState>) -> Result<Json<Value>, AppError> {
    let organizations = app_state.organization_repo.count().await?;
    let users = app_state.user_repo.count().await?;
    let ebooks = app_state.ebook_repo.count().await?;
    let redemptions = app_state.redemption_repo.count().await?;

    Ok(Json(json!({
        "database": "ok",
        "organizations": organizations,
        "users": users,
        "ebooks": ebooks,
        "redemptions": redemptions,
    })))
}
